//! Runs chat requests off the event loop.
//!
//! The event loop stays the only owner of the widget: a request is sent on
//! its own tokio task and the loop picks up the outcome once the task has
//! finished, handing it to [`App::resolve`].

use crate::app::App;
use chatcat_engine::{ChatBackend, ChatReply, ChatRequest, Resolution, TransportError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns the backend and the at most one request in flight.
pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    in_flight: Option<JoinHandle<Result<ChatReply, TransportError>>>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            in_flight: None,
        }
    }

    /// Start sending a request produced by a successful submit.
    pub fn dispatch(&mut self, request: ChatRequest) {
        debug!(turns = request.history.len(), "spawning chat request");
        let backend = Arc::clone(&self.backend);
        let handle = tokio::spawn(async move { backend.send(&request).await });
        if let Some(previous) = self.in_flight.replace(handle) {
            warn!("request dispatched while another was in flight");
            previous.abort();
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }

    /// Resolve the app with the outcome of a finished request, if any.
    ///
    /// A task that panicked or was cancelled resolves as an aborted request
    /// so the widget never stays busy.
    pub async fn poll(&mut self, app: &mut App) -> Option<Resolution> {
        if !self
            .in_flight
            .as_ref()
            .is_some_and(JoinHandle::is_finished)
        {
            return None;
        }
        let handle = self.in_flight.take()?;
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "chat request task failed");
                Err(TransportError::Aborted(e.to_string()))
            }
        };
        Some(app.resolve(outcome))
    }

    /// Abort the request in flight, if any.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
