//! Configuration types for the ChatCat engine.
//!
//! This module defines the configuration schema: where the backend lives,
//! what the client passes through to it, and the draft limit.

use crate::chat::DEFAULT_GREETING;
use crate::draft::MAX_DRAFT_CHARS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for ChatCat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Scheme, host and port of the chat service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint, appended to `base_url`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the health endpoint, appended to `base_url`.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Context window size passed through to the backend.
    #[serde(default = "default_k_ctx")]
    pub k_ctx: u32,

    /// Maximum draft length in characters.
    #[serde(default = "default_max_draft_chars")]
    pub max_draft_chars: usize,

    /// Greeting seeded as the first assistant turn.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_chat_path() -> String {
    "/chat".into()
}

fn default_health_path() -> String {
    "/health".into()
}

fn default_k_ctx() -> u32 {
    5
}

fn default_max_draft_chars() -> usize {
    MAX_DRAFT_CHARS
}

fn default_greeting() -> String {
    DEFAULT_GREETING.into()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    /// Full URL of the health endpoint.
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            k_ctx: default_k_ctx(),
            max_draft_chars: default_max_draft_chars(),
            greeting: default_greeting(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
