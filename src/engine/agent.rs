use super::QueryError;
use crate::model::{ErrorBody, HealthStatus, QueryConfig, QueryResult};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// HTTP client for the agent query service.
#[derive(Clone)]
pub struct AgentClient {
    http: Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(cfg: &QueryConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/agent/query?q=<query>`
    pub async fn query(&self, query: &str) -> Result<QueryResult, QueryError> {
        tracing::debug!(base_url = %self.base_url, query, "sending query");
        let res = self
            .http
            .get(format!("{}/api/agent/query", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;
        decode(res).await
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthStatus, QueryError> {
        let res = self
            .http
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, QueryError> {
    let status = res.status();
    let body = res.bytes().await?;
    if !status.is_success() {
        // Bodies that are empty or not JSON simply carry no detail.
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail);
        return Err(QueryError::Status { status, detail });
    }
    Ok(serde_json::from_slice(&body)?)
}
