//! DashApp — the TEA model.
//!
//! Wraps the dashboard controller with view-only state (scroll offsets,
//! quit flag). Update receives DashMessages, mutates state, and returns
//! the API requests the runtime should now perform. View reads state to
//! produce ratatui widgets. No side effects in view.

use crate::controller::{ApiRequest, Dashboard};

use super::event::DashMessage;
use super::input;

/// The main TUI application state.
pub struct DashApp {
    /// The dashboard controller — all domain state lives here.
    pub dash: Dashboard,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Scroll offset for the feed pane.
    pub feed_scroll: u16,
    /// Scroll offset for the log pane.
    pub log_scroll: u16,
}

impl DashApp {
    pub fn new() -> Self {
        Self {
            dash: Dashboard::new(),
            should_quit: false,
            feed_scroll: 0,
            log_scroll: 0,
        }
    }

    /// Handle one message; returns requests for the runtime to execute.
    pub fn update(&mut self, msg: DashMessage) -> Vec<ApiRequest> {
        match msg {
            DashMessage::Key(key) => input::handle_key(self, key),
            DashMessage::StartResolved { generation, outcome } => {
                self.dash.resolve_start(generation, outcome);
                Vec::new()
            }
            DashMessage::StopResolved { generation, outcome } => {
                self.dash.resolve_stop(generation, outcome);
                Vec::new()
            }
            DashMessage::StatsResolved { generation, outcome } => {
                self.dash.resolve_stats(generation, outcome);
                Vec::new()
            }
            DashMessage::FeedResolved {
                generation,
                page,
                outcome,
            } => {
                self.dash.resolve_feed(generation, page, outcome);
                Vec::new()
            }
            DashMessage::LogsResolved { generation, outcome } => {
                self.dash.resolve_logs(generation, outcome);
                Vec::new()
            }
            DashMessage::PollTick => self.dash.poll_tick(),
            DashMessage::Quit => {
                self.should_quit = true;
                Vec::new()
            }
        }
    }

    /// Scroll the feed pane down.
    pub fn scroll_feed_down(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_add(1);
    }

    /// Scroll the feed pane up.
    pub fn scroll_feed_up(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_sub(1);
    }

    /// Scroll the log pane down.
    pub fn scroll_log_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_add(5);
    }

    /// Scroll the log pane up.
    pub fn scroll_log_up(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(5);
    }
}

impl Default for DashApp {
    fn default() -> Self {
        Self::new()
    }
}
