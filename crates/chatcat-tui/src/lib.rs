//! chatcat-tui: Terminal UI for the ChatCat chat client
//!
//! This crate provides the TUI layer for ChatCat, including:
//! - The chat screen (transcript, input, character counter, status bar)
//! - Markdown rendering of assistant replies
//! - Request dispatch off the event loop
//! - Headless mode for testing and automation

mod app;
mod dispatch;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod text;
mod ui;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use chatcat_engine;

use chatcat_engine::{ChatBackend, Config, WidgetOptions};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dispatch::Dispatcher;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::info;

/// Event poll interval; also drives the spinner.
const TICK_RATE_MS: u64 = 100;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop against `backend`, and restores
/// the terminal on exit.
pub async fn run_tui(
    config: &Config,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(WidgetOptions::from(config), config.base_url.clone());
    let mut dispatcher = Dispatcher::new(backend);
    let mut events = EventHandler::new(TICK_RATE_MS);

    info!(backend = %config.chat_url(), "tui started");
    let result = run_loop(&mut terminal, &mut app, &mut dispatcher, &mut events).await;
    if !dispatcher.is_idle() {
        info!("abandoning request in flight");
    }
    dispatcher.shutdown();

    terminal.show_cursor()?;
    info!(turns = app.widget.transcript().len(), "tui stopped");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            app.viewport = frame.area();
            screens::render_app(app, frame.area(), frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            if let Some(request) = app.handle_event(event) {
                dispatcher.dispatch(request);
            }
        }

        dispatcher.poll(app).await;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
