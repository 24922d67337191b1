//! HTTP client for the game backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::LedgerError;
use crate::model::{Node, Submission, SubmitResponse, WorldMap};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for `/api/map`, `/api/node` and `/api/submit`. Requests are never
/// retried.
pub struct LedgerClient {
    base_url: String,
    client: reqwest::Client,
}

impl LedgerClient {
    pub fn new(base_url: &str) -> Result<Self, LedgerError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LedgerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.base_url)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_map(&self) -> Result<WorldMap, LedgerError> {
        let response = self
            .client
            .get(self.url("map"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_node(&self) -> Result<Node, LedgerError> {
        let response = self
            .client
            .get(self.url("node"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode(response).await
    }

    #[instrument(skip(self, submission), fields(base_url = %self.base_url))]
    pub async fn submit(&self, submission: &Submission) -> Result<SubmitResponse, LedgerError> {
        let response = self
            .client
            .post(self.url("submit"))
            .json(submission)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let result: SubmitResponse = decode(response).await?;
        tracing::debug!(success = result.success, "submission answered");
        Ok(result)
    }

    fn transport_error(&self, e: reqwest::Error) -> LedgerError {
        if e.is_timeout() {
            LedgerError::Network(format!("request timed out after {DEFAULT_TIMEOUT_SECS}s"))
        } else if e.is_connect() {
            LedgerError::Network(format!("game backend not reachable at {}", self.base_url))
        } else {
            LedgerError::Network(e.to_string())
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LedgerError> {
    let status = response.status().as_u16();
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(LedgerError::Api {
            status,
            message: error_detail(&body),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| LedgerError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// The backend reports errors as `{"detail": "..."}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
