mod agent;

pub use agent::AgentClient;

use crate::model::{QueryConfig, QueryResult};
use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the service gives no usable detail.
pub const GENERIC_FAILURE: &str = "Failed to fetch results. Please try again.";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    /// Human-readable message for the UI: the service detail when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

pub struct QueryEngine {
    client: AgentClient,
}

impl QueryEngine {
    pub fn new(cfg: &QueryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: AgentClient::new(cfg)?,
        })
    }

    /// Run one submission. Reporting the outcome is left to the caller so
    /// it can first release its in-flight slot.
    pub async fn run(&self, query: &str) -> Result<QueryResult, QueryError> {
        match self.client.query(query).await {
            Ok(result) => {
                tracing::info!(
                    stories_count = result.stories_count,
                    returned = result.stories.len(),
                    "query succeeded"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                Err(e)
            }
        }
    }

    pub fn client(&self) -> &AgentClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_detail() {
        let e = QueryError::Status {
            status: StatusCode::BAD_REQUEST,
            detail: Some("bad query".into()),
        };
        assert_eq!(e.user_message(), "bad query");
    }

    #[test]
    fn user_message_falls_back_without_detail() {
        let e = QueryError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        };
        assert_eq!(e.user_message(), GENERIC_FAILURE);

        let blank = QueryError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("  ".into()),
        };
        assert_eq!(blank.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn decode_errors_use_generic_message() {
        let e: QueryError = serde_json::from_str::<QueryResult>("not json")
            .unwrap_err()
            .into();
        assert_eq!(e.user_message(), GENERIC_FAILURE);
    }
}
