//! Ratatui presentation layer for the dashboard.
//!
//! ## Architecture (TEA)
//!
//! Model ([`app::DashApp`] wrapping the controller) + Update (message
//! handler) + View (render). Immediate mode, no retained widget state.
//! The view only reads controller state; all mutation flows through
//! messages, so the panel behaves identically with or without a live
//! server.

pub mod app;
pub mod dashboard;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
