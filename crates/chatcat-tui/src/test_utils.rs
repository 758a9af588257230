//! Test utilities for chatcat-tui rendering and end-to-end tests.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use async_trait::async_trait;
use chatcat_engine::{ChatBackend, ChatReply, ChatRequest, TransportError, WidgetOptions};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(TEST_WIDTH, TEST_HEIGHT)).expect("Failed to create test terminal")
}

/// Create a test app with default widget options.
pub fn create_test_app() -> App {
    App::new(WidgetOptions::default(), "test backend")
}

/// Convert a buffer to one line of text per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// In-memory backend that answers from a queue and records every request.
///
/// When gated, each `send` waits for [`ScriptedBackend::release`] first.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ChatReply, TransportError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Notify>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<ChatReply, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    pub fn gated(replies: Vec<Result<ChatReply, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    pub fn reply(text: &str) -> Result<ChatReply, TransportError> {
        Ok(ChatReply {
            reply: text.to_string(),
        })
    }

    /// Let one gated request through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::reply("ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.widget.transcript().len(), 1);
        assert!(!app.widget.is_busy());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld");
    }

    #[tokio::test]
    async fn test_scripted_backend_records_requests() {
        let backend = ScriptedBackend::new(vec![ScriptedBackend::reply("Hi")]);
        let request = ChatRequest {
            history: Vec::new(),
            new_session: true,
            k_ctx: 5,
        };
        let reply = backend.send(&request).await.unwrap();
        assert_eq!(reply.reply, "Hi");
        assert_eq!(backend.requests(), vec![request]);
    }
}
