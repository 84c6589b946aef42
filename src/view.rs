//! Rendering rules for a [`QueryState`] snapshot.
//!
//! The view model is presentation-agnostic: the TUI and text mode both draw
//! from the same [`View`].

use crate::controller::{Phase, QueryState};
use crate::model::{QueryResult, Story};
use std::sync::OnceLock;
use time::{macros::format_description, OffsetDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Capture the viewer's UTC offset. Must run before any other thread is
/// spawned; the lookup is refused once the process is multi-threaded.
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let _ = LOCAL_OFFSET.set(offset);
}

pub fn local_offset() -> UtcOffset {
    LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC)
}

pub const NO_RESULTS_NOTICE: &str = "No stories found matching your query. Try a different search!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub busy: bool,
    pub input_enabled: bool,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub results: Option<ResultsView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub count_line: String,
    pub context_line: Option<String>,
    pub summary: Option<String>,
    pub stories: Vec<StoryView>,
    pub no_results: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryView {
    pub title: String,
    /// Present when the title renders as a link.
    pub link: Option<String>,
    pub score: i64,
    pub by: String,
    pub comments: u64,
    pub date: String,
}

pub fn render(state: &QueryState) -> View {
    render_with_offset(state, local_offset())
}

pub fn render_with_offset(state: &QueryState, offset: UtcOffset) -> View {
    let busy = state.phase.is_loading();
    View {
        busy,
        input_enabled: state.input_enabled(),
        submit_enabled: state.can_submit(),
        error: state.error_message().map(str::to_string),
        results: match &state.phase {
            Phase::Success(result) => Some(results_view(result, offset)),
            Phase::Idle | Phase::Loading | Phase::Error(_) => None,
        },
    }
}

pub fn count_line(count: u64) -> String {
    let noun = if count == 1 { "story" } else { "stories" };
    format!("{count} {noun} found")
}

fn results_view(result: &QueryResult, offset: UtcOffset) -> ResultsView {
    let context_line = match (result.intent.as_deref(), result.topic.as_deref()) {
        (Some(intent), Some(topic)) if !topic.is_empty() => {
            Some(format!("Intent: {intent} · Topic: {topic}"))
        }
        (Some(intent), _) => Some(format!("Intent: {intent}")),
        (None, Some(topic)) if !topic.is_empty() => Some(format!("Topic: {topic}")),
        _ => None,
    };

    ResultsView {
        count_line: count_line(result.stories_count),
        context_line,
        summary: result
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        stories: result
            .stories
            .iter()
            .map(|s| story_view(s, offset))
            .collect(),
        // Decided by the count, even when the service still sent stories.
        no_results: result.stories_count == 0,
    }
}

fn story_view(story: &Story, offset: UtcOffset) -> StoryView {
    StoryView {
        title: story.title.clone(),
        link: story.url.clone().filter(|u| !u.trim().is_empty()),
        score: story.score,
        by: story.by.clone(),
        comments: story.comments,
        date: format_date(story.time, offset),
    }
}

/// Calendar date of a unix timestamp (whole seconds) at `offset`.
pub fn format_date(unix_secs: i64, offset: UtcOffset) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    OffsetDateTime::from_unix_timestamp(unix_secs)
        .ok()
        .and_then(|dt| dt.to_offset(offset).date().format(&fmt).ok())
        .unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::QueryController;

    fn story(id: u64, title: &str, url: Option<&str>, time: i64) -> Story {
        Story {
            id,
            title: title.into(),
            url: url.map(str::to_string),
            score: 10,
            by: "alice".into(),
            comments: 2,
            time,
        }
    }

    fn result(count: u64, summary: Option<&str>, stories: Vec<Story>) -> QueryResult {
        QueryResult {
            stories_count: count,
            summary: summary.map(str::to_string),
            stories,
            query: None,
            intent: None,
            topic: None,
        }
    }

    fn succeeded(r: QueryResult) -> QueryState {
        let mut c = QueryController::with_query("q");
        c.submit();
        c.succeed(r);
        c.state().clone()
    }

    #[test]
    fn idle_shows_nothing() {
        let v = render_with_offset(&QueryState::default(), UtcOffset::UTC);
        assert!(!v.busy);
        assert!(v.input_enabled);
        assert!(!v.submit_enabled);
        assert!(v.error.is_none());
        assert!(v.results.is_none());
    }

    #[test]
    fn loading_disables_controls() {
        let mut c = QueryController::with_query("top 5 stories");
        assert!(render_with_offset(c.state(), UtcOffset::UTC).submit_enabled);
        c.submit();
        let v = render_with_offset(c.state(), UtcOffset::UTC);
        assert!(v.busy);
        assert!(!v.input_enabled);
        assert!(!v.submit_enabled);
        assert!(v.results.is_none());
    }

    #[test]
    fn error_suppresses_results() {
        let mut c = QueryController::with_query("q");
        c.submit();
        c.fail("bad query");
        let v = render_with_offset(c.state(), UtcOffset::UTC);
        assert_eq!(v.error.as_deref(), Some("bad query"));
        assert!(v.results.is_none());
    }

    #[test]
    fn count_line_pluralizes() {
        assert_eq!(count_line(0), "0 stories found");
        assert_eq!(count_line(1), "1 story found");
        assert_eq!(count_line(2), "2 stories found");
        assert_eq!(count_line(17), "17 stories found");
    }

    #[test]
    fn scenario_two_stories_with_summary() {
        let r = result(
            2,
            Some("Two AI stories"),
            vec![
                story(1, "A", Some("http://a"), 1_700_000_000),
                story(2, "B", Some("http://b"), 1_700_003_600),
            ],
        );
        let v = render_with_offset(&succeeded(r), UtcOffset::UTC);
        let res = v.results.expect("results");
        assert_eq!(res.count_line, "2 stories found");
        assert_eq!(res.summary.as_deref(), Some("Two AI stories"));
        let titles: Vec<_> = res.stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(res.stories[0].date, "2023-11-14");
        assert!(!res.no_results);
    }

    #[test]
    fn empty_summary_is_hidden() {
        let v = render_with_offset(&succeeded(result(0, Some("  "), vec![])), UtcOffset::UTC);
        assert_eq!(v.results.expect("results").summary, None);
    }

    #[test]
    fn zero_count_shows_notice_even_with_stories() {
        let v = render_with_offset(
            &succeeded(result(0, None, vec![story(1, "A", None, 0)])),
            UtcOffset::UTC,
        );
        let res = v.results.expect("results");
        assert!(res.no_results);
        assert_eq!(res.count_line, "0 stories found");
    }

    #[test]
    fn count_mismatch_is_tolerated() {
        let v = render_with_offset(
            &succeeded(result(5, None, vec![story(1, "A", None, 0)])),
            UtcOffset::UTC,
        );
        let res = v.results.expect("results");
        assert_eq!(res.count_line, "5 stories found");
        assert_eq!(res.stories.len(), 1);
        assert!(!res.no_results);
    }

    #[test]
    fn title_is_plain_without_url() {
        let v = render_with_offset(
            &succeeded(result(2, None, vec![story(1, "A", None, 0), story(2, "B", Some("http://b"), 0)])),
            UtcOffset::UTC,
        );
        let res = v.results.expect("results");
        assert_eq!(res.stories[0].link, None);
        assert_eq!(res.stories[1].link.as_deref(), Some("http://b"));
    }

    #[test]
    fn dates_follow_the_viewer_offset() {
        // 2023-11-14T22:13:20Z
        let t = 1_700_000_000;
        assert_eq!(format_date(t, UtcOffset::UTC), "2023-11-14");
        let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();
        assert_eq!(format_date(t, plus_two), "2023-11-15");
    }

    #[test]
    fn context_line_from_intent_and_topic() {
        let mut r = result(1, None, vec![story(1, "A", None, 0)]);
        r.intent = Some("search".into());
        r.topic = Some("AI".into());
        let res = render_with_offset(&succeeded(r), UtcOffset::UTC)
            .results
            .expect("results");
        assert_eq!(res.context_line.as_deref(), Some("Intent: search · Topic: AI"));
    }
}
