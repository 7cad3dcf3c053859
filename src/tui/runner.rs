//! TUI runner — main loop that wires everything together.
//!
//! Creates the terminal, then multiplexes in one `select!` loop:
//! - crossterm keyboard events
//! - resolved API outcomes (mpsc from spawned request tasks)
//! - poll interval (stats + page-1 feed + server logs)
//! - render interval (10fps — plenty for a control panel)
//!
//! Requests returned by the controller are executed on spawned tasks;
//! each sends its outcome back through the channel, so the controller
//! itself is only ever touched from this loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::api::BotClient;
use crate::controller::{ApiRequest, FEED_PAGE_SIZE};

use super::app::DashApp;
use super::event::DashMessage;
use super::layout;

/// Execute requests on spawned tasks; outcomes come back as messages.
pub fn dispatch(
    requests: Vec<ApiRequest>,
    client: &BotClient,
    tx: &mpsc::UnboundedSender<DashMessage>,
) {
    for request in requests {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let msg = match request {
                ApiRequest::Start { generation } => DashMessage::StartResolved {
                    generation,
                    outcome: client.start().await,
                },
                ApiRequest::Stop { generation } => DashMessage::StopResolved {
                    generation,
                    outcome: client.stop().await,
                },
                ApiRequest::Stats { generation } => DashMessage::StatsResolved {
                    generation,
                    outcome: client.stats().await,
                },
                ApiRequest::Feed { generation, page } => DashMessage::FeedResolved {
                    generation,
                    page,
                    outcome: client.tweets(page, FEED_PAGE_SIZE).await,
                },
                ApiRequest::Logs { generation } => DashMessage::LogsResolved {
                    generation,
                    outcome: client.logs().await.map(|r| r.logs),
                },
            };
            // Receiver gone means the TUI is shutting down
            let _ = tx.send(msg);
        });
    }
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(client: BotClient, poll_every: Duration) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashApp::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut poll_interval = interval(poll_every);
    let mut render_interval = interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                // The first tick fires immediately — that is the
                // initial stats/feed/log load.
                dispatch(app.update(DashMessage::PollTick), &client, &tx);
            }
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, &mut app))?;
            }
            Some(msg) = rx.recv() => {
                dispatch(app.update(msg), &client, &tx);
            }
            // Poll crossterm events (non-blocking via tokio::task::spawn_blocking)
            result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            }) => {
                if let Ok(Some(Event::Key(key))) = result {
                    dispatch(app.update(DashMessage::Key(key)), &client, &tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A client pointed at a port nothing listens on: every request
    /// resolves quickly as a transport failure.
    fn dead_client() -> BotClient {
        BotClient::new("http://127.0.0.1:9".into())
    }

    #[tokio::test]
    async fn start_against_dead_server_rolls_back() {
        let mut app = DashApp::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let requests = app.update(DashMessage::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('s'),
            crossterm::event::KeyModifiers::NONE,
        )));
        assert_eq!(requests.len(), 1);
        assert!(!app.dash.start_enabled());

        dispatch(requests, &dead_client(), &tx);
        let msg = rx.recv().await.expect("outcome should arrive");
        assert!(matches!(msg, DashMessage::StartResolved { .. }));

        app.update(msg);
        assert!(!app.dash.running());
        assert!(app.dash.start_enabled(), "affordance must never stick disabled");
        assert_eq!(app.dash.log.len(), 1);
    }

    #[tokio::test]
    async fn poll_dispatch_resolves_every_category() {
        let mut app = DashApp::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(app.update(DashMessage::PollTick), &dead_client(), &tx);

        let mut saw_stats = false;
        let mut saw_logs = false;
        let mut saw_feed = false;
        for _ in 0..3 {
            match rx.recv().await.expect("outcome should arrive") {
                DashMessage::StatsResolved { .. } => saw_stats = true,
                DashMessage::LogsResolved { .. } => saw_logs = true,
                DashMessage::FeedResolved { page, .. } => {
                    assert_eq!(page, 1);
                    saw_feed = true;
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert!(saw_stats && saw_logs && saw_feed);
    }

    #[tokio::test]
    async fn advisory_failures_never_touch_the_log() {
        let mut app = DashApp::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(app.update(DashMessage::PollTick), &dead_client(), &tx);
        for _ in 0..3 {
            let msg = rx.recv().await.expect("outcome should arrive");
            app.update(msg);
        }
        assert!(app.dash.log.is_empty());
        assert!(app.dash.feed.is_empty());
    }
}
