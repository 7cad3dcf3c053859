//! Bot control API — wire types and HTTP client.

pub mod client;
pub mod types;

pub use client::{ApiError, BotClient};
pub use types::{ControlReply, FeedReply, LogsReply, PostRecord, ServerLogRecord, StatsReply};
