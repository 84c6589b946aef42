use crate::controller::QueryController;
use crate::model::{QueryEvent, EXAMPLE_QUERIES};
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::time::Instant;

pub const TAB_QUERY: usize = 0;
pub const TAB_HELP: usize = 1;

pub struct UiState {
    pub tab: usize,
    pub controller: QueryController,
    pub info: String,
    /// Index into the current result's stories.
    pub selected_story: usize,
    /// Last example picked with Ctrl-N / Ctrl-P.
    pub example_cursor: Option<usize>,
    pub loading_since: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_QUERY,
            controller: QueryController::new(),
            info: String::new(),
            selected_story: 0,
            example_cursor: None,
            loading_since: None,
        }
    }
}

impl UiState {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            controller: QueryController::with_query(query),
            ..Default::default()
        }
    }

    pub fn story_count(&self) -> usize {
        self.controller
            .state()
            .result()
            .map(|r| r.stories.len())
            .unwrap_or(0)
    }

    pub fn push_char(&mut self, c: char) {
        let mut q = self.controller.state().query.clone();
        q.push(c);
        self.controller.set_query(q);
    }

    pub fn pop_char(&mut self) {
        let mut q = self.controller.state().query.clone();
        q.pop();
        self.controller.set_query(q);
    }

    pub fn clear_query(&mut self) {
        self.controller.set_query(String::new());
    }

    pub fn select_example(&mut self, idx: usize) {
        if self.controller.state().phase.is_loading() {
            return;
        }
        if let Some(example) = EXAMPLE_QUERIES.get(idx) {
            self.example_cursor = Some(idx);
            self.controller.select_example(*example);
        }
    }

    pub fn cycle_example(&mut self, forward: bool) {
        let n = EXAMPLE_QUERIES.len();
        let next = match (self.example_cursor, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        self.select_example(next);
    }

    /// Accept the pending query, returning the text to send.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.controller.submit()?;
        self.loading_since = Some(Instant::now());
        self.selected_story = 0;
        self.info.clear();
        Some(query)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let count = self.story_count();
        if count == 0 {
            self.selected_story = 0;
            return;
        }
        let next = (self.selected_story as isize + delta).clamp(0, count as isize - 1);
        self.selected_story = next as usize;
    }

    pub fn selected_link(&self) -> Option<&str> {
        self.controller
            .state()
            .result()
            .and_then(|r| r.stories.get(self.selected_story))
            .and_then(|s| s.url.as_deref())
    }

    pub fn apply_event(&mut self, ev: QueryEvent) {
        match ev {
            QueryEvent::Started { query } => {
                self.info = format!("Searching: {query}");
            }
            QueryEvent::Completed(result) => {
                self.loading_since = None;
                self.selected_story = 0;
                self.info.clear();
                self.controller.succeed(*result);
            }
            QueryEvent::Failed { message } => {
                self.loading_since = None;
                self.info.clear();
                self.controller.fail(message);
            }
        }
    }
}

/// Break `text` into rows at spaces. The first row holds at most `first`
/// chars and the rest `rest`; words longer than a row are split.
fn wrap_words(text: &str, first: usize, rest: usize) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut row = String::new();
    let mut row_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        loop {
            let limit = if rows.is_empty() { first } else { rest }.max(1);
            let needed = if row_len == 0 {
                chars.len()
            } else {
                row_len + 1 + chars.len()
            };
            if needed <= limit {
                if row_len > 0 {
                    row.push(' ');
                }
                row.extend(chars.iter());
                row_len = needed;
                break;
            }
            if row_len > 0 {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
                continue;
            }
            rows.push(chars.drain(..limit).collect());
        }
    }
    if row_len > 0 {
        rows.push(row);
    }
    rows
}

/// Append `value` to `out` word-wrapped for a bordered block of `area_width`.
/// With a label, the first row starts with `label:` and later rows are indented.
pub fn push_labeled(
    out: &mut Vec<Line<'static>>,
    label: Option<&str>,
    value: &str,
    area_width: u16,
    value_style: Style,
) {
    let inner = usize::from(area_width.saturating_sub(4));
    let prefix = label.map(|l| format!("{l}: "));
    let (first, rest) = match prefix.as_deref() {
        Some(p) => (inner.saturating_sub(p.chars().count()), inner.saturating_sub(2)),
        None => (inner, inner),
    };

    for (i, row) in wrap_words(value, first, rest).into_iter().enumerate() {
        let lead = match (&prefix, i) {
            (Some(p), 0) => Span::styled(p.clone(), Style::default().fg(Color::Gray)),
            (Some(_), _) => Span::raw("  "),
            (None, _) => Span::raw(""),
        };
        out.push(Line::from(vec![lead, Span::styled(row, value_style)]));
    }
}
