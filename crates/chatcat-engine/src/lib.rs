//! chatcat-engine: Headless engine for the ChatCat chat client
//!
//! This crate provides the core of ChatCat, independent of any terminal:
//! - The transcript data model and backend wire schema
//! - The length-bounded input draft
//! - The chat widget state machine (submit / resolve, busy guard)
//! - The HTTP backend client
//! - Configuration

pub mod chat;
pub mod client;
pub mod config;
pub mod draft;
pub mod widget;

// Re-export commonly used types
pub use chat::{ChatReply, ChatRequest, HistoryMessage, Speaker, Transcript, Turn, DEFAULT_GREETING};
pub use client::{ChatBackend, HealthStatus, HttpBackend, TransportError};
pub use config::{Config, ConfigError};
pub use draft::{Draft, MAX_DRAFT_CHARS};
pub use widget::{ChatWidget, Phase, Resolution, SubmitRejected, WidgetOptions, ERROR_TURN_PREFIX};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
