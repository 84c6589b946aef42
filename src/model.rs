use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Example queries offered next to the input.
pub const EXAMPLE_QUERIES: [&str; 5] = [
    "find latest 5 news about AI",
    "summarize top 10 headlines today",
    "what's new about programming",
    "top 5 stories",
    "latest news about startups",
];

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default = "unknown_author")]
    pub by: String,
    // Raw upstream items (summarize intent) carry the count as `descendants`.
    #[serde(default, alias = "descendants")]
    pub comments: u64,
    pub time: i64,
}

fn unknown_author() -> String {
    "unknown".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub stories_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Body of a non-2xx response from the query service.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response of the service health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Events emitted by the orchestrator and consumed by the UI thread.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    Started { query: String },
    Completed(Box<QueryResult>),
    Failed { message: String },
}
