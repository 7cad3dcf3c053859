//! Dashboard controller — the state machine behind the panel.
//!
//! Owns all view state: bot running flag, feed pages, stats snapshot,
//! activity log. User intents and poll ticks produce [`ApiRequest`]
//! descriptors for the runtime to execute; resolved outcomes come back
//! through the `resolve_*` methods. No I/O happens here, which is what
//! makes the start/stop/poll races unit-testable without a server.
//!
//! Every request category carries a generation counter. A resolution
//! whose generation is stale (a newer request superseded it in flight)
//! is discarded, so the displayed state follows the last request
//! *issued*, not the last response to *arrive*.

pub mod log;

use chrono::Local;

use crate::api::{ApiError, ControlReply, FeedReply, PostRecord, ServerLogRecord, StatsReply};

pub use log::{LogBody, LogEntry, LogRing, Severity};

/// Fixed feed page size.
pub const FEED_PAGE_SIZE: u32 = 10;

/// A request the controller wants performed against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRequest {
    Start { generation: u64 },
    Stop { generation: u64 },
    Stats { generation: u64 },
    Feed { generation: u64, page: u32 },
    Logs { generation: u64 },
}

/// Post kind — original post or a reply to someone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    Original,
    Reply { original_id: String },
}

/// A post in the displayed feed (view model over the wire record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub author: String,
    pub handle: String,
    pub body: String,
    pub timestamp: String,
    pub kind: PostKind,
}

impl From<PostRecord> for Post {
    fn from(r: PostRecord) -> Self {
        let kind = if r.kind == "reply" {
            PostKind::Reply {
                original_id: r.original_tweet_id.unwrap_or_default(),
            }
        } else {
            PostKind::Original
        };
        Self {
            author: r.user_name,
            handle: r.user_screen_name,
            body: r.tweet_text,
            timestamp: r.timestamp,
            kind,
        }
    }
}

/// All dashboard state. One instance per panel, owned by the TUI app and
/// passed by reference to render functions.
#[derive(Debug, Default)]
pub struct Dashboard {
    /// Last confirmed (or optimistically rolled-back) running state.
    running: bool,
    /// Generation of the in-flight start request, if any. While set, the
    /// start affordance is disabled.
    start_in_flight: Option<u64>,
    /// Same for stop.
    stop_in_flight: Option<u64>,
    /// Shared by start and stop: whichever control request was issued
    /// last wins, the earlier one resolves stale.
    control_generation: u64,

    /// Displayed feed, page 1 first.
    pub feed: Vec<Post>,
    /// 1-based page the feed currently ends at.
    current_page: u32,
    /// Whether the server reported more pages.
    pub load_more: bool,
    feed_generation: u64,

    /// Latest counters; stale values stay displayed on refresh failure.
    pub stats: StatsReply,
    stats_generation: u64,

    /// Activity log ring, newest first.
    pub log: LogRing,
    logs_generation: u64,
    /// Newest server log timestamp already ingested (raw ISO string;
    /// lexicographic order matches chronological for this format).
    last_server_log_ts: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            ..Self::default()
        }
    }

    /// Displayed running state.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Page the feed currently ends at.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Start is clickable iff the bot is stopped and no start is in flight.
    pub fn start_enabled(&self) -> bool {
        !self.running && self.start_in_flight.is_none()
    }

    /// Stop is clickable iff the bot is running and no stop is in flight.
    pub fn stop_enabled(&self) -> bool {
        self.running && self.stop_in_flight.is_none()
    }

    /// Reconcile the running flag. Affordances derive from it, so start
    /// is disabled exactly when running once nothing is in flight.
    fn apply_running(&mut self, running: bool) {
        self.running = running;
    }

    // ── start / stop ──

    /// User asked to start the bot. Disables the start affordance
    /// synchronously; returns None when it is already disabled
    /// (debounce-by-disable, not a queue).
    pub fn request_start(&mut self) -> Option<ApiRequest> {
        if !self.start_enabled() {
            return None;
        }
        self.control_generation += 1;
        self.start_in_flight = Some(self.control_generation);
        Some(ApiRequest::Start {
            generation: self.control_generation,
        })
    }

    /// A start request resolved. Clears the in-flight marker on every
    /// path so the affordance never sticks disabled.
    pub fn resolve_start(&mut self, generation: u64, outcome: Result<ControlReply, ApiError>) {
        if self.start_in_flight == Some(generation) {
            self.start_in_flight = None;
        }
        if generation != self.control_generation {
            // Superseded while in flight; nothing else to apply.
            return;
        }
        match outcome {
            Ok(reply) if reply.success => {
                self.apply_running(true);
                self.log
                    .push(LogEntry::new(Severity::Success, "Bot started successfully"));
            }
            Ok(reply) => {
                self.apply_running(false);
                let reason = reply.message.unwrap_or_else(|| "unknown error".into());
                self.log.push(LogEntry::new(
                    Severity::Error,
                    format!("Failed to start bot: {reason}"),
                ));
            }
            Err(err) => {
                tracing::warn!("start request failed: {err}");
                self.apply_running(false);
                self.log.push(LogEntry::new(
                    Severity::Error,
                    "Failed to start bot: network error",
                ));
            }
        }
    }

    /// User asked to stop the bot. Symmetric to start.
    pub fn request_stop(&mut self) -> Option<ApiRequest> {
        if !self.stop_enabled() {
            return None;
        }
        self.control_generation += 1;
        self.stop_in_flight = Some(self.control_generation);
        Some(ApiRequest::Stop {
            generation: self.control_generation,
        })
    }

    /// A stop request resolved. One asymmetry with start: on transport
    /// failure the displayed running state keeps its prior value — the
    /// true server state is unknown and flipping it could mislead the
    /// operator.
    pub fn resolve_stop(&mut self, generation: u64, outcome: Result<ControlReply, ApiError>) {
        if self.stop_in_flight == Some(generation) {
            self.stop_in_flight = None;
        }
        if generation != self.control_generation {
            return;
        }
        match outcome {
            Ok(reply) if reply.success => {
                self.apply_running(false);
                self.log
                    .push(LogEntry::new(Severity::Warning, "Bot stopped successfully"));
            }
            Ok(reply) => {
                self.apply_running(true);
                let reason = reply.message.unwrap_or_else(|| "unknown error".into());
                self.log.push(LogEntry::new(
                    Severity::Error,
                    format!("Failed to stop bot: {reason}"),
                ));
            }
            Err(err) => {
                tracing::warn!("stop request failed: {err}");
                self.log.push(LogEntry::new(
                    Severity::Error,
                    "Failed to stop bot: network error",
                ));
            }
        }
    }

    // ── feed ──

    /// Load one feed page. Page 1 is full-refresh, later pages append.
    pub fn request_feed(&mut self, page: u32) -> ApiRequest {
        let page = page.max(1);
        self.feed_generation += 1;
        ApiRequest::Feed {
            generation: self.feed_generation,
            page,
        }
    }

    /// Request the page after the currently loaded one.
    pub fn request_more_feed(&mut self) -> Option<ApiRequest> {
        if !self.load_more {
            return None;
        }
        Some(self.request_feed(self.current_page + 1))
    }

    /// A feed fetch resolved. Failures are diagnostic only — no visible
    /// error state, no retry.
    pub fn resolve_feed(&mut self, generation: u64, page: u32, outcome: Result<FeedReply, ApiError>) {
        if generation != self.feed_generation {
            return;
        }
        match outcome {
            Ok(reply) => {
                if page == 1 {
                    self.feed.clear();
                }
                self.feed.extend(reply.tweets.into_iter().map(Post::from));
                self.load_more = reply.has_more;
                self.current_page = page;
            }
            Err(err) => tracing::warn!("feed load failed (page {page}): {err}"),
        }
    }

    // ── stats ──

    pub fn request_stats(&mut self) -> ApiRequest {
        self.stats_generation += 1;
        ApiRequest::Stats {
            generation: self.stats_generation,
        }
    }

    /// Overwrite the snapshot; on failure stale values stay displayed.
    pub fn resolve_stats(&mut self, generation: u64, outcome: Result<StatsReply, ApiError>) {
        if generation != self.stats_generation {
            return;
        }
        match outcome {
            Ok(reply) => self.stats = reply,
            Err(err) => tracing::warn!("stats refresh failed: {err}"),
        }
    }

    // ── server logs ──

    pub fn request_logs(&mut self) -> ApiRequest {
        self.logs_generation += 1;
        ApiRequest::Logs {
            generation: self.logs_generation,
        }
    }

    /// Merge unseen server log entries into the local ring.
    pub fn resolve_logs(
        &mut self,
        generation: u64,
        outcome: Result<Vec<ServerLogRecord>, ApiError>,
    ) {
        if generation != self.logs_generation {
            return;
        }
        match outcome {
            Ok(records) => self.ingest_server_logs(records),
            Err(err) => tracing::warn!("server log fetch failed: {err}"),
        }
    }

    fn ingest_server_logs(&mut self, records: Vec<ServerLogRecord>) {
        // Server sends newest first; take what is newer than the last
        // ingested timestamp, then push oldest first so the newest ends
        // up on top of the ring.
        let cutoff = self.last_server_log_ts.clone();
        let unseen: Vec<_> = records
            .into_iter()
            .take_while(|r| {
                cutoff
                    .as_deref()
                    .map_or(true, |seen| r.timestamp.as_str() > seen)
            })
            .collect();
        if let Some(newest) = unseen.first() {
            self.last_server_log_ts = Some(newest.timestamp.clone());
        }
        for record in unseen.into_iter().rev() {
            let timestamp =
                log::parse_server_timestamp(&record.timestamp).unwrap_or_else(Local::now);
            self.log.push(LogEntry::at(
                timestamp,
                Severity::from_level(&record.level),
                record.message,
            ));
        }
    }

    // ── polling ──

    /// Periodic refresh: always stats and server logs; feed page 1 only
    /// while the operator is viewing page 1, so paging forward is never
    /// clobbered.
    pub fn poll_tick(&mut self) -> Vec<ApiRequest> {
        let mut requests = vec![self.request_stats(), self.request_logs()];
        if self.current_page == 1 {
            requests.push(self.request_feed(1));
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(success: bool, message: Option<&str>) -> Result<ControlReply, ApiError> {
        Ok(ControlReply {
            success,
            message: message.map(str::to_string),
        })
    }

    fn transport_failure<T>() -> Result<T, ApiError> {
        Err(ApiError::InvalidResponse("failed to parse response".into()))
    }

    fn feed_reply(n: usize, has_more: bool) -> FeedReply {
        FeedReply {
            tweets: (0..n)
                .map(|i| PostRecord {
                    user_name: "AI Technology Bot".into(),
                    user_screen_name: "AITechBot".into(),
                    tweet_text: format!("post {i}"),
                    timestamp: format!("2026-08-30T10:{i:02}:00"),
                    kind: "posted".into(),
                    original_tweet_id: None,
                })
                .collect(),
            page: 1,
            total_pages: 3,
            has_more,
        }
    }

    fn first_log_message(dash: &Dashboard) -> String {
        match &dash.log.iter().next().unwrap().body {
            LogBody::Message(m) => m.clone(),
            LogBody::PostedContent(p) => p.clone(),
        }
    }

    #[test]
    fn initial_state() {
        let dash = Dashboard::new();
        assert!(!dash.running());
        assert!(dash.start_enabled());
        assert!(!dash.stop_enabled());
        assert_eq!(dash.current_page(), 1);
        assert!(dash.feed.is_empty());
        assert!(dash.log.is_empty());
    }

    #[test]
    fn start_success_flips_running_and_affordances() {
        let mut dash = Dashboard::new();
        let Some(ApiRequest::Start { generation }) = dash.request_start() else {
            panic!("expected a start request");
        };
        // Disabled synchronously, before any response
        assert!(!dash.start_enabled());

        dash.resolve_start(generation, ok(true, None));
        assert!(dash.running());
        assert!(!dash.start_enabled());
        assert!(dash.stop_enabled());
        assert_eq!(dash.log.iter().next().unwrap().severity, Severity::Success);
    }

    #[test]
    fn start_logical_failure_stays_stopped_with_server_reason() {
        let mut dash = Dashboard::new();
        let Some(ApiRequest::Start { generation }) = dash.request_start() else {
            panic!("expected a start request");
        };
        dash.resolve_start(generation, ok(false, Some("Bot is already running")));

        assert!(!dash.running());
        assert!(dash.start_enabled());
        let entry = dash.log.iter().next().unwrap();
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(
            first_log_message(&dash),
            "Failed to start bot: Bot is already running"
        );
    }

    #[test]
    fn start_transport_failure_forces_stopped() {
        let mut dash = Dashboard::new();
        let Some(ApiRequest::Start { generation }) = dash.request_start() else {
            panic!("expected a start request");
        };
        dash.resolve_start(generation, transport_failure());

        assert!(!dash.running());
        assert!(dash.start_enabled());
        assert!(first_log_message(&dash).contains("network error"));
    }

    #[test]
    fn start_reenabled_on_every_resolution_path() {
        for outcome in [ok(true, None), ok(false, Some("no")), transport_failure()] {
            let mut dash = Dashboard::new();
            let Some(ApiRequest::Start { generation }) = dash.request_start() else {
                panic!("expected a start request");
            };
            assert!(!dash.start_enabled());
            dash.resolve_start(generation, outcome);
            // Never stuck disabled: either clickable again, or disabled
            // purely because the bot is now running.
            assert_eq!(dash.start_enabled(), !dash.running());
        }
    }

    #[test]
    fn start_ignored_while_in_flight() {
        let mut dash = Dashboard::new();
        assert!(dash.request_start().is_some());
        // Double-click: second press must not issue another request
        assert!(dash.request_start().is_none());
    }

    #[test]
    fn start_ignored_while_running() {
        let mut dash = Dashboard::new();
        let Some(ApiRequest::Start { generation }) = dash.request_start() else {
            panic!("expected a start request");
        };
        dash.resolve_start(generation, ok(true, None));
        assert!(dash.request_start().is_none());
    }

    #[test]
    fn stop_success_flips_running() {
        let mut dash = running_dashboard();
        let Some(ApiRequest::Stop { generation }) = dash.request_stop() else {
            panic!("expected a stop request");
        };
        assert!(!dash.stop_enabled());
        dash.resolve_stop(generation, ok(true, None));

        assert!(!dash.running());
        assert!(dash.start_enabled());
        assert_eq!(dash.log.iter().next().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn stop_logical_failure_stays_running() {
        let mut dash = running_dashboard();
        let Some(ApiRequest::Stop { generation }) = dash.request_stop() else {
            panic!("expected a stop request");
        };
        dash.resolve_stop(generation, ok(false, Some("Bot is not running")));

        assert!(dash.running());
        assert!(dash.stop_enabled());
        assert_eq!(
            first_log_message(&dash),
            "Failed to stop bot: Bot is not running"
        );
    }

    #[test]
    fn stop_transport_failure_preserves_prior_state() {
        // The asymmetry with start: running keeps its value before the
        // request, because the true server state is unknown.
        let mut dash = running_dashboard();
        let before = dash.running();
        let Some(ApiRequest::Stop { generation }) = dash.request_stop() else {
            panic!("expected a stop request");
        };
        dash.resolve_stop(generation, transport_failure());

        assert_eq!(dash.running(), before);
        assert!(dash.stop_enabled());
        assert!(first_log_message(&dash).contains("network error"));
    }

    #[test]
    fn affordance_invariant_after_arbitrary_sequences() {
        // Start disabled iff running (and vice versa for stop) after
        // every reconciliation, in-flight windows aside.
        let mut dash = Dashboard::new();
        let outcomes: Vec<(bool, Result<ControlReply, ApiError>)> = vec![
            (true, ok(true, None)),
            (false, ok(false, Some("nope"))),
            (true, transport_failure()),
            (true, ok(true, None)),
            (false, ok(true, None)),
            (true, ok(false, Some("already running"))),
        ];
        for (is_start, outcome) in outcomes {
            let request = if is_start {
                dash.request_start()
            } else {
                dash.request_stop()
            };
            let generation = match request {
                Some(ApiRequest::Start { generation }) | Some(ApiRequest::Stop { generation }) => {
                    generation
                }
                _ => continue, // affordance disabled; press ignored
            };
            if is_start {
                dash.resolve_start(generation, outcome);
            } else {
                dash.resolve_stop(generation, outcome);
            }
            assert_eq!(dash.start_enabled(), !dash.running());
            assert_eq!(dash.stop_enabled(), dash.running());
        }
    }

    #[test]
    fn stale_control_resolution_discarded() {
        // Start goes in flight, then a stop supersedes it. The late
        // start resolution must only clear its marker.
        let mut dash = running_dashboard();
        // Force the state where a start could race a stop: bot believed
        // running, stop issued, then a stale start success arrives.
        let Some(ApiRequest::Stop { generation: stop_gen }) = dash.request_stop() else {
            panic!("expected a stop request");
        };
        let stale_start_gen = stop_gen - 1; // the generation start ran under
        dash.resolve_start(stale_start_gen, ok(true, None));
        assert!(dash.running(), "stale start must not flip state");

        dash.resolve_stop(stop_gen, ok(true, None));
        assert!(!dash.running());
    }

    #[test]
    fn feed_page_one_replaces_wholesale() {
        let mut dash = Dashboard::new();
        let ApiRequest::Feed { generation, page } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, Ok(feed_reply(10, true)));
        assert_eq!(dash.feed.len(), 10);
        assert!(dash.load_more);

        // Second page-1 refresh must not duplicate
        let ApiRequest::Feed { generation, page } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, Ok(feed_reply(10, false)));
        assert_eq!(dash.feed.len(), 10);
        assert!(!dash.load_more);
        assert_eq!(dash.current_page(), 1);
    }

    #[test]
    fn feed_later_pages_append_in_order() {
        let mut dash = Dashboard::new();
        let ApiRequest::Feed { generation, page } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, Ok(feed_reply(10, true)));

        let Some(ApiRequest::Feed { generation, page }) = dash.request_more_feed() else {
            panic!("expected a load-more request");
        };
        assert_eq!(page, 2);
        let mut second = feed_reply(5, false);
        for (i, t) in second.tweets.iter_mut().enumerate() {
            t.tweet_text = format!("page2 post {i}");
        }
        dash.resolve_feed(generation, page, Ok(second));

        assert_eq!(dash.feed.len(), 15);
        assert_eq!(dash.feed[0].body, "post 0");
        assert_eq!(dash.feed[10].body, "page2 post 0");
        assert_eq!(dash.current_page(), 2);
        assert!(!dash.load_more);
        assert!(dash.request_more_feed().is_none());
    }

    #[test]
    fn feed_failure_changes_nothing() {
        let mut dash = Dashboard::new();
        let ApiRequest::Feed { generation, page } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, Ok(feed_reply(3, false)));

        let ApiRequest::Feed { generation, page } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, transport_failure());
        assert_eq!(dash.feed.len(), 3);
        assert!(dash.log.is_empty(), "advisory failures never hit the log");
    }

    #[test]
    fn stale_feed_resolution_discarded() {
        let mut dash = Dashboard::new();
        let ApiRequest::Feed { generation: g1, page: p1 } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        // Manual refresh supersedes the poll's fetch before it lands
        let ApiRequest::Feed { generation: g2, page: p2 } = dash.request_feed(1) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(g2, p2, Ok(feed_reply(4, false)));
        // The older response arrives last and must be dropped
        dash.resolve_feed(g1, p1, Ok(feed_reply(10, true)));
        assert_eq!(dash.feed.len(), 4);
        assert!(!dash.load_more);
    }

    #[test]
    fn stats_overwrite_and_stale_keep() {
        let mut dash = Dashboard::new();
        let ApiRequest::Stats { generation } = dash.request_stats() else {
            panic!("expected a stats request");
        };
        dash.resolve_stats(
            generation,
            Ok(StatsReply {
                total_interactions: 100,
                today_tweets: 12,
                response_rate: 45.0,
            }),
        );
        assert_eq!(dash.stats.total_interactions, 100);

        let ApiRequest::Stats { generation } = dash.request_stats() else {
            panic!("expected a stats request");
        };
        dash.resolve_stats(generation, transport_failure());
        // Stale snapshot remains
        assert_eq!(dash.stats.total_interactions, 100);
        assert_eq!(dash.stats.today_tweets, 12);
    }

    #[test]
    fn poll_refreshes_feed_only_on_page_one() {
        let mut dash = Dashboard::new();
        let requests = dash.poll_tick();
        assert!(requests
            .iter()
            .any(|r| matches!(r, ApiRequest::Feed { page: 1, .. })));
        assert!(requests.iter().any(|r| matches!(r, ApiRequest::Stats { .. })));

        // Page the operator forward, then poll again
        let ApiRequest::Feed { generation, page } = dash.request_feed(2) else {
            panic!("expected a feed request");
        };
        dash.resolve_feed(generation, page, Ok(feed_reply(10, true)));
        let requests = dash.poll_tick();
        assert!(!requests.iter().any(|r| matches!(r, ApiRequest::Feed { .. })));
        assert!(requests.iter().any(|r| matches!(r, ApiRequest::Stats { .. })));
    }

    #[test]
    fn server_logs_ingested_once() {
        let mut dash = Dashboard::new();
        let records = vec![
            ServerLogRecord {
                timestamp: "2026-08-30T10:01:00".into(),
                message: "Bot iteration started".into(),
                level: "INFO".into(),
            },
            ServerLogRecord {
                timestamp: "2026-08-30T10:00:00".into(),
                message: "Successfully posted tweet: hello world".into(),
                level: "INFO".into(),
            },
        ];
        let ApiRequest::Logs { generation } = dash.request_logs() else {
            panic!("expected a logs request");
        };
        dash.resolve_logs(generation, Ok(records.clone()));
        assert_eq!(dash.log.len(), 2);
        // Newest on top; posted content classified
        assert_eq!(
            first_log_message(&dash),
            "Bot iteration started"
        );
        assert!(dash
            .log
            .iter()
            .any(|e| matches!(&e.body, LogBody::PostedContent(p) if p == "hello world")));

        // Same batch again: nothing new ingested
        let ApiRequest::Logs { generation } = dash.request_logs() else {
            panic!("expected a logs request");
        };
        dash.resolve_logs(generation, Ok(records));
        assert_eq!(dash.log.len(), 2);
    }

    #[test]
    fn post_record_conversion() {
        let record = PostRecord {
            user_name: "AI Technology Bot".into(),
            user_screen_name: "AITechBot".into(),
            tweet_text: "Interesting point!".into(),
            timestamp: "2026-08-30T10:15:00".into(),
            kind: "reply".into(),
            original_tweet_id: Some("42".into()),
        };
        let post = Post::from(record);
        assert_eq!(post.handle, "AITechBot");
        assert_eq!(
            post.kind,
            PostKind::Reply {
                original_id: "42".into()
            }
        );
    }

    /// A dashboard whose bot is confirmed running.
    fn running_dashboard() -> Dashboard {
        let mut dash = Dashboard::new();
        let Some(ApiRequest::Start { generation }) = dash.request_start() else {
            panic!("expected a start request");
        };
        dash.resolve_start(generation, ok(true, None));
        dash
    }
}
