//! Raw HTTP client for the bot control API.
//!
//! No controller awareness — just makes API calls via reqwest.

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{ControlReply, FeedReply, LogsReply, StatsReply};

/// Errors from API operations.
///
/// Non-2xx statuses and unparsable bodies are both transport failures as
/// far as the controller is concerned; the distinction only matters for
/// diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Raw HTTP client for the bot control API.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: Client,
    base_url: String,
}

impl BotClient {
    /// Create a client against the given base URL (no trailing slash).
    /// Point it at a mock server for testing.
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// POST /api/start — ask the server to start the bot.
    pub async fn start(&self) -> Result<ControlReply, ApiError> {
        self.post_control("/api/start").await
    }

    /// POST /api/stop — ask the server to stop the bot.
    pub async fn stop(&self) -> Result<ControlReply, ApiError> {
        self.post_control("/api/stop").await
    }

    /// GET /api/stats — latest counters.
    pub async fn stats(&self) -> Result<StatsReply, ApiError> {
        let url = format!("{}/api/stats", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::read_json(response).await
    }

    /// GET /api/tweets — one page of past posts.
    pub async fn tweets(&self, page: u32, per_page: u32) -> Result<FeedReply, ApiError> {
        let url = format!(
            "{}/api/tweets?page={page}&per_page={per_page}",
            self.base_url
        );
        let response = self.http.get(&url).send().await?;
        Self::read_json(response).await
    }

    /// GET /api/logs — the server's own log ring.
    pub async fn logs(&self) -> Result<LogsReply, ApiError> {
        let url = format!("{}/api/logs", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::read_json(response).await
    }

    async fn post_control(&self, path: &str) -> Result<ControlReply, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.post(&url).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(ApiError::Status { status, body });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}
