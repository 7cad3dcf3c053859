//! Keyboard handling.
//!
//! Control keys go through the controller's intent methods, which
//! already enforce the affordance guards — a key press on a disabled
//! affordance is simply ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::ApiRequest;

use super::app::DashApp;

/// Handle one key event; returns requests for the runtime to execute.
pub fn handle_key(app: &mut DashApp, key: KeyEvent) -> Vec<ApiRequest> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('s') => app.dash.request_start().into_iter().collect(),
        KeyCode::Char('x') => app.dash.request_stop().into_iter().collect(),
        KeyCode::Char('m') => app.dash.request_more_feed().into_iter().collect(),
        KeyCode::Char('r') => {
            // Manual refresh: stats plus a page-1 feed reset
            vec![app.dash.request_stats(), app.dash.request_feed(1)]
        }
        KeyCode::Down => {
            app.scroll_feed_down();
            Vec::new()
        }
        KeyCode::Up => {
            app.scroll_feed_up();
            Vec::new()
        }
        KeyCode::PageDown => {
            app.scroll_log_down();
            Vec::new()
        }
        KeyCode::PageUp => {
            app.scroll_log_up();
            Vec::new()
        }
        _ => Vec::new(),
    }
}
