//! TUI messages — everything that drives the update loop.
//!
//! Keyboard input, resolved API outcomes, and poll ticks all arrive
//! through a single mpsc channel as DashMessages, so the controller is
//! only ever mutated from one task.

use crossterm::event::KeyEvent;

use crate::api::{ApiError, ControlReply, FeedReply, ServerLogRecord, StatsReply};

/// Messages that drive the dashboard update loop.
#[derive(Debug)]
pub enum DashMessage {
    /// Keyboard input.
    Key(KeyEvent),
    /// A start request resolved (any path: success, logical failure,
    /// transport failure).
    StartResolved {
        generation: u64,
        outcome: Result<ControlReply, ApiError>,
    },
    /// A stop request resolved.
    StopResolved {
        generation: u64,
        outcome: Result<ControlReply, ApiError>,
    },
    /// A stats refresh resolved.
    StatsResolved {
        generation: u64,
        outcome: Result<StatsReply, ApiError>,
    },
    /// A feed page fetch resolved.
    FeedResolved {
        generation: u64,
        page: u32,
        outcome: Result<FeedReply, ApiError>,
    },
    /// A server log fetch resolved.
    LogsResolved {
        generation: u64,
        outcome: Result<Vec<ServerLogRecord>, ApiError>,
    },
    /// Periodic refresh fired.
    PollTick,
    /// Quit the TUI.
    Quit,
}
