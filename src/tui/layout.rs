//! Panel layout.
//!
//! ```text
//! ┌─[ botdeck ]─────────────────────────────────────┐
//! │ ● Bot Active      [s]tart  [x] stop             │
//! ├──────────────┬───────────────┬──────────────────┤
//! │ interactions │ today's posts │ response rate    │
//! ├──────────────┴───────┬───────┴──────────────────┤
//! │  feed (post cards)   │  activity log            │
//! ├──────────────────────┴──────────────────────────┤
//! │ s:Start  x:Stop  m:More  r:Refresh  q:Quit      │
//! └─────────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use ratatui::Frame;

use crate::controller::{LogBody, PostKind, Severity};

use super::app::DashApp;
use super::dashboard;

/// Draw the full panel.
pub fn draw(f: &mut Frame, app: &mut DashApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status header
            Constraint::Length(3), // stats row
            Constraint::Min(8),    // feed + log
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    draw_header(f, app, outer[0]);
    draw_stats(f, app, outer[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(outer[2]);

    draw_feed(f, app, content[0]);
    draw_log(f, app, content[1]);
    draw_hints(f, app, outer[3]);
}

fn draw_header(f: &mut Frame, app: &DashApp, area: Rect) {
    let block = Block::default()
        .title(" botdeck ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let running = app.dash.running();
    let (dot, status_text, status_color) = if running {
        ("\u{25cf}", "Bot Active", Color::Green)
    } else {
        ("\u{25cb}", "Bot Inactive", Color::DarkGray)
    };

    let affordance = |label: &str, enabled: bool| {
        if enabled {
            Span::styled(
                label.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label.to_string(), Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        Span::styled(format!(" {dot} "), Style::default().fg(status_color)),
        Span::styled(
            status_text,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("      "),
        affordance("[s] start", app.dash.start_enabled()),
        Span::raw("   "),
        affordance("[x] stop", app.dash.stop_enabled()),
    ]);

    let para = Paragraph::new(line).block(block);
    f.render_widget(para, area);
}

fn draw_stats(f: &mut Frame, app: &DashApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = &app.dash.stats;
    let cells = [
        (" Total Interactions ", dashboard::format_count(stats.total_interactions)),
        (" Today's Posts ", dashboard::format_count(stats.today_tweets)),
        (" Response Rate ", dashboard::format_rate(stats.response_rate)),
    ];

    for (i, (title, value)) in cells.iter().enumerate() {
        let block = Block::default()
            .title(*title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let para = Paragraph::new(Span::styled(
            value.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .centered()
        .block(block);
        f.render_widget(para, chunks[i]);
    }
}

fn draw_feed(f: &mut Frame, app: &mut DashApp, area: Rect) {
    let title = format!(" Posts (page {}) ", app.dash.current_page());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<Line> = Vec::new();

    for post in &app.dash.feed {
        lines.push(Line::from(vec![
            Span::styled(
                post.author.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" @{}", post.handle),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  {}", dashboard::format_post_time(&post.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        match &post.kind {
            PostKind::Reply { original_id } => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "[Reply] ",
                        Style::default().fg(Color::Black).bg(Color::Cyan),
                    ),
                    Span::raw(format!(" {}", post.body)),
                ]));
                if !original_id.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("  \u{2514}\u{2500} in reply to {original_id}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            PostKind::Original => {
                lines.push(Line::from(Span::raw(post.body.clone())));
            }
        }
        lines.push(Line::from(""));
    }

    if app.dash.feed.is_empty() {
        lines.push(Line::from(Span::styled(
            "No posts yet.",
            Style::default().fg(Color::DarkGray),
        )));
    } else if app.dash.load_more {
        lines.push(Line::from(Span::styled(
            "\u{2500}\u{2500} more posts available \u{2014} press m \u{2500}\u{2500}",
            Style::default().fg(Color::Yellow),
        )));
    }

    // Clamp scroll so we never scroll past content; account for wrapping.
    let inner_height = area.height.saturating_sub(2) as u32;
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let total_lines: u32 = lines
        .iter()
        .map(|line| {
            let width: usize = line.spans.iter().map(|s| s.content.len()).sum();
            if width == 0 {
                1u32
            } else {
                width.div_ceil(inner_width) as u32
            }
        })
        .sum();
    let max_scroll = total_lines.saturating_sub(inner_height);
    let max_scroll_u16 = max_scroll.min(u16::MAX as u32) as u16;
    let scroll = app.feed_scroll.min(max_scroll_u16);
    // Write clamped value back so up/down keys work immediately
    app.feed_scroll = scroll;

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(para, area);

    if total_lines > inner_height {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll_u16 as usize).position(scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area,
            &mut scrollbar_state,
        );
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::White,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn draw_log(f: &mut Frame, app: &mut DashApp, area: Rect) {
    let block = Block::default()
        .title(" Activity ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines: Vec<Line> = if app.dash.log.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing logged yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.dash
            .log
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(
                        format!("{}  ", dashboard::format_clock(&entry.timestamp)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("[{:<4}] ", entry.severity.label()),
                        Style::default().fg(severity_color(entry.severity)),
                    ),
                ];
                match &entry.body {
                    LogBody::Message(text) => {
                        spans.push(Span::styled(
                            text.clone(),
                            Style::default().fg(severity_color(entry.severity)),
                        ));
                    }
                    LogBody::PostedContent(content) => {
                        spans.push(Span::styled("Posted: ", Style::default().fg(Color::Green)));
                        spans.push(Span::styled(
                            content.clone(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::ITALIC),
                        ));
                    }
                }
                Line::from(spans)
            })
            .collect()
    };

    let inner_height = area.height.saturating_sub(2) as u32;
    let total_lines = lines.len() as u32;
    let max_scroll = total_lines.saturating_sub(inner_height);
    let max_scroll_u16 = max_scroll.min(u16::MAX as u32) as u16;
    let scroll = app.log_scroll.min(max_scroll_u16);
    app.log_scroll = scroll;

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(para, area);

    if total_lines > inner_height {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll_u16 as usize).position(scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area,
            &mut scrollbar_state,
        );
    }
}

fn draw_hints(f: &mut Frame, app: &DashApp, area: Rect) {
    let mut spans = vec![Span::styled(
        " s:Start  x:Stop  r:Refresh  \u{2191}\u{2193}:Feed  PgUp/PgDn:Log  q:Quit",
        Style::default().fg(Color::DarkGray),
    )];
    if app.dash.load_more {
        spans.push(Span::styled(
            "  m:More",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
