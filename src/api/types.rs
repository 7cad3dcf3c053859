//! Wire types for the bot's HTTP/JSON control API.
//!
//! Field names follow the server's JSON exactly; anything the server may
//! omit gets a serde default so a sparse reply still parses.

use serde::{Deserialize, Deserializer};

/// Reply from POST /api/start and POST /api/stop.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlReply {
    /// Whether the operation took effect on the server.
    pub success: bool,
    /// Server-provided reason when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply from GET /api/stats.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatsReply {
    pub total_interactions: u64,
    pub today_tweets: u64,
    /// Percentage, already rounded by the server.
    pub response_rate: f64,
}

/// One post in a GET /api/tweets page.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    pub user_name: String,
    pub user_screen_name: String,
    pub tweet_text: String,
    #[serde(default)]
    pub timestamp: String,
    /// "reply" for replies; anything else is an original post.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Id of the post a reply is answering. The server sometimes sends
    /// this as a bare number, so accept either.
    #[serde(default, deserialize_with = "de_id")]
    pub original_tweet_id: Option<String>,
}

/// Reply from GET /api/tweets.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedReply {
    pub tweets: Vec<PostRecord>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    pub has_more: bool,
}

/// One entry in the server's own log ring (GET /api/logs).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerLogRecord {
    /// ISO 8601, server-local.
    pub timestamp: String,
    pub message: String,
    /// "INFO", "WARNING", "ERROR", ...
    #[serde(default)]
    pub level: String,
}

/// Reply from GET /api/logs.
#[derive(Debug, Clone, Deserialize)]
pub struct LogsReply {
    pub logs: Vec<ServerLogRecord>,
}

/// Accept an id as either a JSON string or a bare number; empty strings
/// and nulls become None.
fn de_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}
