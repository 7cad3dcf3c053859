//! Activity log — bounded ring of dashboard events, newest first.
//!
//! Entries carry a structured body: a message that announces posted
//! content is classified once, at creation, instead of being re-parsed
//! from rendered text every frame.

use std::collections::VecDeque;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Maximum entries retained; the oldest are evicted past this.
pub const LOG_CAPACITY: usize = 50;

/// Marker the bot engine puts in front of posted content.
const POSTED_MARKER: &str = "Successfully posted tweet:";

/// Log entry severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Map a server log level string ("INFO", "ERROR", ...) to a severity.
    /// Unknown levels fall back to Info.
    pub fn from_level(level: &str) -> Self {
        match level.to_ascii_uppercase().as_str() {
            "ERROR" => Self::Error,
            "WARNING" | "WARN" => Self::Warning,
            "SUCCESS" => Self::Success,
            _ => Self::Info,
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warn",
            Self::Error => "err",
        }
    }
}

/// Structured log body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogBody {
    /// Plain message text.
    Message(String),
    /// The bot posted content; payload is the posted body, rendered in a
    /// distinguished style.
    PostedContent(String),
}

/// A single dashboard log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub body: LogBody,
}

impl LogEntry {
    /// Create an entry timestamped now. Classifies posted-content
    /// messages at this point.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self::at(Local::now(), severity, message)
    }

    /// Create an entry with an explicit timestamp (server log ingest).
    pub fn at(timestamp: DateTime<Local>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            body: classify(message.into()),
        }
    }
}

/// Decide the structured body for a message.
fn classify(message: String) -> LogBody {
    match message.split_once(POSTED_MARKER) {
        Some((_, tail)) => LogBody::PostedContent(tail.trim().to_string()),
        None => LogBody::Message(message),
    }
}

/// Bounded log ring, newest entry at the front.
#[derive(Debug, Clone, Default)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
}

impl LogRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the top; trim the oldest past capacity.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(LOG_CAPACITY);
    }

    /// Entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a server timestamp. The backend emits naive ISO 8601 in its own
/// local time; accept an explicit offset too.
pub fn parse_server_timestamp(ts: &str) -> Option<DateTime<Local>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local.from_local_datetime(&naive).earliest();
    }
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}
