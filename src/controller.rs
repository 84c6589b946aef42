//! Query submission state machine.
//!
//! `QueryState` is an immutable snapshot; every transition goes through
//! [`reduce`], which returns the next snapshot plus the side effect (if any)
//! the caller must perform. [`QueryController`] owns the current snapshot and
//! is the only place it is replaced.

use crate::model::QueryResult;

/// Lifecycle of a single submission. Result and error payloads live inside
/// the variant so at most one of them exists at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(QueryResult),
    Error(String),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Success(_) => "success",
            Phase::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub phase: Phase,
}

impl QueryState {
    pub fn result(&self) -> Option<&QueryResult> {
        match &self.phase {
            Phase::Success(r) => Some(r),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(m) => Some(m),
            _ => None,
        }
    }

    /// Trimmed query text, if a submission would be accepted right now.
    pub fn submittable_query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        if self.phase.is_loading() || trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn can_submit(&self) -> bool {
        self.submittable_query().is_some()
    }

    pub fn input_enabled(&self) -> bool {
        !self.phase.is_loading()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetQuery(String),
    SelectExample(String),
    Submit,
    Succeeded(QueryResult),
    Failed(String),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one outbound request carrying `query`.
    Fetch { query: String },
}

/// Compute the next state for `action`. Rejected actions return an
/// unchanged copy of `state` and no effect.
pub fn reduce(state: &QueryState, action: Action) -> (QueryState, Option<Effect>) {
    match action {
        Action::SetQuery(text) | Action::SelectExample(text) => {
            if state.phase.is_loading() {
                return (state.clone(), None);
            }
            let next = QueryState {
                query: text,
                phase: state.phase.clone(),
            };
            (next, None)
        }
        Action::Submit => match state.submittable_query() {
            Some(q) => {
                let effect = Effect::Fetch {
                    query: q.to_string(),
                };
                let next = QueryState {
                    query: state.query.clone(),
                    phase: Phase::Loading,
                };
                (next, Some(effect))
            }
            None => (state.clone(), None),
        },
        // Resolutions only land on a pending request.
        Action::Succeeded(result) if state.phase.is_loading() => (
            QueryState {
                query: state.query.clone(),
                phase: Phase::Success(result),
            },
            None,
        ),
        Action::Failed(message) if state.phase.is_loading() => (
            QueryState {
                query: state.query.clone(),
                phase: Phase::Error(message),
            },
            None,
        ),
        Action::Succeeded(_) | Action::Failed(_) => (state.clone(), None),
    }
}

/// Owner of the current [`QueryState`].
#[derive(Debug, Default)]
pub struct QueryController {
    state: QueryState,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            state: QueryState {
                query: query.into(),
                phase: Phase::Idle,
            },
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let (next, effect) = reduce(&self.state, action);
        if next.phase.name() != self.state.phase.name() {
            tracing::debug!(
                from = self.state.phase.name(),
                to = next.phase.name(),
                "phase transition"
            );
        }
        self.state = next;
        effect
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetQuery(text.into()));
    }

    pub fn select_example(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SelectExample(text.into()));
    }

    /// Returns the trimmed query to send when the submission is accepted.
    pub fn submit(&mut self) -> Option<String> {
        match self.dispatch(Action::Submit) {
            Some(Effect::Fetch { query }) => Some(query),
            None => None,
        }
    }

    pub fn succeed(&mut self, result: QueryResult) {
        self.dispatch(Action::Succeeded(result));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.dispatch(Action::Failed(message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Story;

    fn sample_result(count: u64) -> QueryResult {
        QueryResult {
            stories_count: count,
            summary: None,
            stories: (0..count)
                .map(|i| Story {
                    id: i + 1,
                    title: format!("story {i}"),
                    url: None,
                    score: 1,
                    by: "alice".into(),
                    comments: 0,
                    time: 1_700_000_000,
                })
                .collect(),
            query: None,
            intent: None,
            topic: None,
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let c = QueryController::new();
        assert_eq!(c.state().phase, Phase::Idle);
        assert_eq!(c.state().query, "");
        assert!(!c.state().can_submit());
    }

    #[test]
    fn submit_trims_and_enters_loading() {
        let mut c = QueryController::new();
        c.set_query("  find latest 5 news about AI \n");
        let sent = c.submit();
        assert_eq!(sent.as_deref(), Some("find latest 5 news about AI"));
        assert_eq!(c.state().phase, Phase::Loading);
        assert!(!c.state().input_enabled());
    }

    #[test]
    fn whitespace_query_is_ignored() {
        let mut c = QueryController::new();
        c.set_query("   ");
        let before = c.state().clone();
        assert_eq!(c.submit(), None);
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn submit_while_loading_is_a_noop() {
        let mut c = QueryController::with_query("top 5 stories");
        assert!(c.submit().is_some());
        let before = c.state().clone();
        assert_eq!(c.submit(), None);
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn input_is_disregarded_while_loading() {
        let mut c = QueryController::with_query("top 5 stories");
        c.submit();
        c.set_query("something else");
        c.select_example("latest news about startups");
        assert_eq!(c.state().query, "top 5 stories");
    }

    #[test]
    fn submit_clears_previous_result_and_error() {
        let mut c = QueryController::with_query("top 5 stories");
        c.submit();
        c.succeed(sample_result(2));
        assert!(c.state().result().is_some());
        c.submit();
        assert_eq!(c.state().phase, Phase::Loading);
        assert!(c.state().result().is_none());

        c.fail("bad query");
        assert_eq!(c.state().error_message(), Some("bad query"));
        assert!(c.state().result().is_none());
        c.submit();
        assert!(c.state().error_message().is_none());
    }

    #[test]
    fn phase_is_sticky_between_submissions() {
        let mut c = QueryController::with_query("top 5 stories");
        c.submit();
        c.succeed(sample_result(1));
        c.set_query("latest news about startups");
        assert_eq!(c.state().result(), Some(&sample_result(1)));
    }

    #[test]
    fn select_example_matches_set_query() {
        let mut a = QueryController::new();
        let mut b = QueryController::new();
        a.select_example("what's new about programming");
        b.set_query("what's new about programming");
        assert_eq!(a.state(), b.state());
        assert_eq!(a.state().phase, Phase::Idle);
    }

    #[test]
    fn resolution_without_pending_request_is_ignored() {
        let mut c = QueryController::with_query("top 5 stories");
        c.fail("late failure");
        assert_eq!(c.state().phase, Phase::Idle);
        c.succeed(sample_result(1));
        assert_eq!(c.state().phase, Phase::Idle);
    }

    #[test]
    fn reduce_emits_single_fetch_effect() {
        let state = QueryState {
            query: "top 5 stories".into(),
            phase: Phase::Error("previous".into()),
        };
        let (next, effect) = reduce(&state, Action::Submit);
        assert_eq!(
            effect,
            Some(Effect::Fetch {
                query: "top 5 stories".into()
            })
        );
        assert_eq!(next.phase, Phase::Loading);
        let (again, effect) = reduce(&next, Action::Submit);
        assert_eq!(effect, None);
        assert_eq!(again, next);
    }
}
