//! Chat data model and backend wire schema.
//!
//! This module defines the transcript the user sees ([`Transcript`] of
//! [`Turn`]s) and the JSON shapes exchanged with the chat backend
//! ([`ChatRequest`], [`ChatReply`]).

use serde::{Deserialize, Serialize};

/// Greeting seeded as the first assistant turn of every transcript.
pub const DEFAULT_GREETING: &str = "Hello! My name is ChatCat. I am your personal guide to \
Software Engineering at the University of Arizona. What can I help you with today?";

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The person typing into the client.
    User,
    /// The backend (or a synthesized error in its place).
    Assistant,
}

impl Speaker {
    /// Role name used in the backend history schema.
    pub fn role(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.role())
    }
}

/// A single message in the transcript.
///
/// Turns are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, append-only history of turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create a transcript seeded with one assistant greeting.
    pub fn seeded(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Append a turn at the end.
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns authored by the user.
    pub fn user_turn_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::User)
            .count()
    }

    /// Convert the whole transcript to the backend history schema.
    pub fn to_history(&self) -> Vec<HistoryMessage> {
        self.turns.iter().map(HistoryMessage::from).collect()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::seeded(DEFAULT_GREETING)
    }
}

/// One entry of the `history` array sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Speaker,
    pub content: String,
}

impl From<&Turn> for HistoryMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.speaker,
            content: turn.text.clone(),
        }
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full transcript, oldest first.
    pub history: Vec<HistoryMessage>,
    /// True only for the request carrying the first user turn.
    pub new_session: bool,
    /// How many context snippets the backend should retrieve. Passed through.
    pub k_ctx: u32,
}

/// Successful response body from `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
