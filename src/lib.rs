//! botdeck — terminal control panel for a social-posting bot.
//!
//! Thin client over the bot's HTTP control API: start/stop the bot,
//! poll statistics, page through past posts, tail the activity log.
//! The bot engine and its server are external collaborators — botdeck
//! never mutates anything beyond its own view state.

pub mod api;
pub mod controller;
pub mod tui;
