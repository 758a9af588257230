//! The chat widget state machine.
//!
//! [`ChatWidget`] owns the transcript, the draft and the busy flag. A submit
//! cycle is split in two so the caller owns the suspension point:
//!
//! ```text
//! Idle --submit()--> Dispatching --resolve(Ok)--> Idle   (reply appended)
//!                                --resolve(Err)-> Idle   (error turn appended)
//! ```
//!
//! [`ChatWidget::exchange`] runs a whole cycle against a [`ChatBackend`].

use crate::chat::{ChatReply, ChatRequest, Transcript, Turn};
use crate::client::{ChatBackend, TransportError};
use crate::config::Config;
use crate::draft::Draft;
use tracing::{debug, info, warn};

/// Prefix of the assistant turn synthesized for a failed request.
pub const ERROR_TURN_PREFIX: &str = "Error talking to server: ";

/// Where the widget is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding.
    #[default]
    Idle,
    /// One request is outstanding.
    Dispatching,
}

/// Why a submit did not dispatch anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// Draft is empty or whitespace.
    #[error("nothing to send")]
    Empty,
    /// A request is already outstanding.
    #[error("a request is already in flight")]
    Busy,
    /// Draft is over the character limit.
    #[error("Character limit exceeded (max {max})")]
    TooLong { max: usize },
}

/// What `resolve` did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The backend reply was appended.
    Replied(Turn),
    /// A diagnostic turn was appended in place of a reply.
    Failed(Turn),
    /// No request was outstanding; nothing changed.
    Ignored,
}

/// Options fixed for the lifetime of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOptions {
    pub greeting: String,
    pub max_draft_chars: usize,
    pub k_ctx: u32,
}

impl From<&Config> for WidgetOptions {
    fn from(config: &Config) -> Self {
        Self {
            greeting: config.greeting.clone(),
            max_draft_chars: config.max_draft_chars,
            k_ctx: config.k_ctx,
        }
    }
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Chat state: transcript, draft and busy flag.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    transcript: Transcript,
    draft: Draft,
    busy: bool,
    k_ctx: u32,
}

impl ChatWidget {
    /// Create a widget with a freshly seeded transcript.
    pub fn new(options: WidgetOptions) -> Self {
        Self {
            transcript: Transcript::seeded(options.greeting),
            draft: Draft::new(options.max_draft_chars),
            busy: false,
            k_ctx: options.k_ctx,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True while the last draft update was truncated at the limit.
    pub fn has_error(&self) -> bool {
        self.draft.is_over_limit()
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Dispatching
        } else {
            Phase::Idle
        }
    }

    /// Replace the draft with raw input, truncating at the limit.
    pub fn update_draft(&mut self, raw: &str) {
        if self.draft.update(raw) {
            debug!(max = self.draft.max_chars(), "draft truncated at limit");
        }
    }

    /// Start a submit cycle.
    ///
    /// A draft that was truncated at the limit is rejected until it is edited
    /// back within bounds. On success the user turn is appended, the draft is
    /// cleared, the widget becomes busy, and the request to send is returned. The caller must hand
    /// the outcome of that request to [`resolve`](Self::resolve).
    pub fn submit(&mut self) -> Result<ChatRequest, SubmitRejected> {
        let trimmed = self.draft.text().trim();
        if trimmed.is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.busy {
            return Err(SubmitRejected::Busy);
        }
        if self.draft.is_over_limit() {
            let max = self.draft.max_chars();
            warn!(max, "submit rejected: draft over limit");
            return Err(SubmitRejected::TooLong { max });
        }

        let text = trimmed.to_string();
        self.transcript.push(Turn::user(text));
        self.draft.clear();
        self.busy = true;

        let request = ChatRequest {
            history: self.transcript.to_history(),
            new_session: self.transcript.user_turn_count() == 1,
            k_ctx: self.k_ctx,
        };
        debug!(
            turns = request.history.len(),
            new_session = request.new_session,
            "dispatching chat request"
        );
        Ok(request)
    }

    /// Finish the outstanding submit cycle.
    ///
    /// Appends exactly one assistant turn and releases the busy flag. An
    /// outcome arriving while idle is ignored.
    pub fn resolve(&mut self, outcome: Result<ChatReply, TransportError>) -> Resolution {
        if !self.busy {
            warn!("resolve called with no request outstanding");
            return Resolution::Ignored;
        }
        self.busy = false;

        match outcome {
            Ok(reply) => {
                info!(chars = reply.reply.len(), "chat reply received");
                let turn = Turn::assistant(reply.reply);
                self.transcript.push(turn.clone());
                Resolution::Replied(turn)
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                let turn = Turn::assistant(format!("{ERROR_TURN_PREFIX}{e}"));
                self.transcript.push(turn.clone());
                Resolution::Failed(turn)
            }
        }
    }

    /// Run a whole submit cycle against a backend.
    ///
    /// The busy flag is released even if the returned future is dropped
    /// before the backend answers.
    pub async fn exchange(
        &mut self,
        backend: &dyn ChatBackend,
    ) -> Result<Resolution, SubmitRejected> {
        let request = self.submit()?;
        let guard = DispatchGuard { widget: self };
        let outcome = backend.send(&request).await;
        Ok(guard.widget.resolve(outcome))
    }
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new(WidgetOptions::default())
    }
}

/// Resolves an abandoned dispatch as a failure.
struct DispatchGuard<'a> {
    widget: &'a mut ChatWidget,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if self.widget.busy {
            self.widget.resolve(Err(TransportError::Aborted(
                "request dropped before completion".into(),
            )));
        }
    }
}
