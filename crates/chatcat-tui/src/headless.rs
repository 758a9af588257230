//! Headless mode for the ChatCat TUI.
//!
//! Runs the same app loop without a real terminal, for end-to-end tests and
//! automation. Input events are sent through a channel and the rendered
//! screen is published after every frame.

use crate::app::App;
use crate::dispatch::Dispatcher;
use crate::event::Event;
use crate::screens::render_app;
use chatcat_engine::{ChatBackend, WidgetOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Current draft text.
    pub draft: String,
    /// Number of turns in the transcript.
    pub turns: usize,
    pub busy: bool,
    pub should_quit: bool,
    pub show_help: bool,
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    event_tx: mpsc::UnboundedSender<Event>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an event to the TUI. Returns `false` once the TUI has stopped.
    pub fn send_event(&self, event: Event) -> bool {
        self.event_tx.send(event).is_ok()
    }

    /// Press a key without modifiers.
    pub fn press(&self, code: KeyCode) -> bool {
        self.send_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// Type text one key at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|ch| self.press(KeyCode::Char(ch)))
    }

    /// Paste text in one go.
    pub fn paste(&self, text: &str) -> bool {
        self.send_event(Event::Paste(text.to_string()))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the loop ended without meeting the condition.
                Ok(Err(_)) | Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
    /// Shown in the status bar while idle.
    pub backend_label: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 20,
            backend_label: "headless".to_string(),
        }
    }
}

/// Run the TUI in headless mode against the given backend.
///
/// Returns a handle to drive the TUI and a join handle for the loop task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(backend, WidgetOptions::default(), HeadlessConfig::default());
/// handle.type_text("Hello");
/// handle.press(KeyCode::Enter);
/// handle.wait_for_text("Hi there", Duration::from_secs(1)).await;
/// handle.press(KeyCode::Esc);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(
    backend: Arc<dyn ChatBackend>,
    options: WidgetOptions,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(backend, options, config, event_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    (HeadlessHandle { event_tx, state_rx }, task)
}

async fn run_headless_loop(
    backend: Arc<dyn ChatBackend>,
    options: WidgetOptions,
    config: HeadlessConfig,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut terminal = Terminal::new(TestBackend::new(config.width, config.height))?;
    let mut app = App::new(options, config.backend_label);
    let mut dispatcher = Dispatcher::new(backend);
    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        dispatcher.poll(&mut app).await;

        terminal.draw(|frame| {
            app.viewport = frame.area();
            render_app(&app, frame.area(), frame.buffer_mut());
        })?;

        let _ = state_tx.send(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            draft: app.widget.draft().text().to_string(),
            turns: app.widget.transcript().len(),
            busy: app.widget.is_busy(),
            should_quit: app.should_quit,
            show_help: app.show_help,
        });

        if app.should_quit {
            dispatcher.shutdown();
            break;
        }

        let event = tokio::select! {
            Some(event) = event_rx.recv() => event,
            () = tokio::time::sleep(tick_duration) => Event::Tick,
        };

        if let Some(request) = app.handle_event(event) {
            dispatcher.dispatch(request);
        }
    }

    Ok(())
}

/// Convert a terminal buffer to a string representation.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut rows = Vec::with_capacity(usize::from(area.height));

    for y in area.y..area.y + area.height {
        let row: String = (area.x..area.x + area.width)
            .filter_map(|x| buffer.cell((x, y)).map(ratatui::buffer::Cell::symbol))
            .collect();
        rows.push(row.trim_end().to_string());
    }

    rows.join("\n")
}
