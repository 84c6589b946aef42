//! Text summary builder for CLI output.
//!
//! Formats a rendered [`View`] into human-readable lines for text mode.

use crate::view::{View, NO_RESULTS_NOTICE};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) fn build_text_summary(view: &View) -> TextSummary {
    let mut lines = Vec::new();

    if let Some(err) = view.error.as_deref() {
        lines.push(format!("Error: {err}"));
    }

    let Some(results) = view.results.as_ref() else {
        return TextSummary { lines };
    };

    lines.push(results.count_line.clone());
    if let Some(ctx) = results.context_line.as_deref() {
        lines.push(ctx.to_string());
    }

    if let Some(summary) = results.summary.as_deref() {
        lines.push(String::new());
        lines.push("Summary:".into());
        lines.extend(summary.lines().map(|l| format!("  {l}")));
    }

    if !results.stories.is_empty() {
        lines.push(String::new());
    }
    for (i, story) in results.stories.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, story.title));
        if let Some(link) = story.link.as_deref() {
            lines.push(format!("    {link}"));
        }
        lines.push(format!(
            "    {} points | by {} | {} comments | {}",
            story.score, story.by, story.comments, story.date
        ));
    }

    if results.no_results {
        lines.push(String::new());
        lines.push(NO_RESULTS_NOTICE.to_string());
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::QueryController;
    use crate::model::{QueryResult, Story};
    use crate::view::render_with_offset;
    use time::UtcOffset;

    #[test]
    fn scenario_lines_keep_server_order() {
        let mut c = QueryController::with_query("find latest 5 news about AI");
        c.submit();
        c.succeed(QueryResult {
            stories_count: 2,
            summary: Some("Two AI stories".into()),
            stories: vec![
                Story {
                    id: 1,
                    title: "A".into(),
                    url: Some("http://a".into()),
                    score: 10,
                    by: "alice".into(),
                    comments: 2,
                    time: 1_700_000_000,
                },
                Story {
                    id: 2,
                    title: "B".into(),
                    url: Some("http://b".into()),
                    score: 5,
                    by: "bob".into(),
                    comments: 0,
                    time: 1_700_003_600,
                },
            ],
            query: None,
            intent: None,
            topic: None,
        });

        let lines = build_text_summary(&render_with_offset(c.state(), UtcOffset::UTC)).lines;
        assert_eq!(lines[0], "2 stories found");
        assert!(lines.iter().any(|l| l.contains("Two AI stories")));
        let a = lines.iter().position(|l| l == " 1. A").expect("first story");
        let b = lines.iter().position(|l| l == " 2. B").expect("second story");
        assert!(a < b);
        assert!(lines.contains(&"    10 points | by alice | 2 comments | 2023-11-14".to_string()));
        assert!(!lines.iter().any(|l| l == NO_RESULTS_NOTICE));
    }

    #[test]
    fn error_line() {
        let mut c = QueryController::with_query("q");
        c.submit();
        c.fail("bad query");
        let lines = build_text_summary(&render_with_offset(c.state(), UtcOffset::UTC)).lines;
        assert_eq!(lines, vec!["Error: bad query".to_string()]);
    }
}
