//! Application state and update logic for the ChatCat TUI.

use crate::event::{self, Action, Event};
use crate::screens::chat::max_scroll;
use crate::ui::widgets::TextInputState;
use chatcat_engine::{
    ChatReply, ChatRequest, ChatWidget, Resolution, TransportError, WidgetOptions,
};
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use tracing::debug;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: usize = 3;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Transcript, draft and busy flag.
    pub widget: ChatWidget,

    /// Cursor and sent-message history for the input box.
    pub input: TextInputState,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Transcript rows scrolled up from the newest line (0 = follow).
    pub scroll_from_bottom: usize,

    /// Last drawn terminal area.
    pub viewport: Rect,

    /// Tick counter for the spinner.
    pub tick: usize,

    /// Shown in the status bar while idle.
    pub backend_label: String,
}

impl App {
    pub fn new(options: WidgetOptions, backend_label: impl Into<String>) -> Self {
        Self {
            widget: ChatWidget::new(options),
            input: TextInputState::new(),
            should_quit: false,
            show_help: false,
            scroll_from_bottom: 0,
            viewport: Rect::new(0, 0, 80, 24),
            tick: 0,
            backend_label: backend_label.into(),
        }
    }

    /// Handle one input event. Returns a request when a submit dispatched.
    pub fn handle_event(&mut self, event: Event) -> Option<ChatRequest> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_action(event::mouse_to_action(mouse)),
            Event::Paste(text) => {
                self.handle_paste(&text);
                None
            }
            Event::Tick => {
                self.tick();
                None
            }
            Event::Resize(_, _) => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ChatRequest> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let action = event::key_to_action(key, self.widget.draft().is_empty());
        self.handle_action(action)
    }

    /// Insert pasted text at the cursor.
    pub fn handle_paste(&mut self, text: &str) {
        if self.widget.is_busy() || self.show_help {
            return;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let candidate = self.input.insert_str(self.widget.draft().text(), &text);
        self.set_draft(&candidate);
    }

    pub fn handle_action(&mut self, action: Action) -> Option<ChatRequest> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return None;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return None;
            }
            Action::Back => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return None;
            }
            Action::None => return None,
            _ => {}
        }

        // Any other key just closes help.
        if self.show_help {
            self.show_help = false;
            return None;
        }

        match action {
            Action::Submit => return self.submit(),
            Action::PageUp => self.scroll_up(self.page_size()),
            Action::PageDown => self.scroll_down(self.page_size()),
            Action::ScrollUp => self.scroll_up(WHEEL_STEP),
            Action::ScrollDown => self.scroll_down(WHEEL_STEP),
            _ => self.edit(action),
        }
        None
    }

    fn submit(&mut self) -> Option<ChatRequest> {
        match self.widget.submit() {
            Ok(request) => {
                if let Some(turn) = self.widget.transcript().last() {
                    self.input.record_sent(turn.text());
                }
                self.scroll_from_bottom = 0;
                Some(request)
            }
            Err(reason) => {
                debug!(%reason, "submit rejected");
                None
            }
        }
    }

    /// Apply an editing action to the draft. The draft is frozen while busy.
    fn edit(&mut self, action: Action) {
        if self.widget.is_busy() {
            return;
        }
        let content = self.widget.draft().text().to_string();
        let candidate = match action {
            Action::Insert(ch) => Some(self.input.insert(&content, ch)),
            Action::Backspace => self.input.backspace(&content),
            Action::Delete => self.input.delete(&content),
            Action::HistoryPrev => self.input.history_prev(&content),
            Action::HistoryNext => self.input.history_next(),
            Action::Left => {
                self.input.move_left();
                None
            }
            Action::Right => {
                self.input.move_right(&content);
                None
            }
            Action::Home => {
                self.input.move_home();
                None
            }
            Action::End => {
                self.input.move_end(&content);
                None
            }
            _ => None,
        };
        if let Some(candidate) = candidate {
            self.set_draft(&candidate);
        }
    }

    /// Route a candidate through the draft's length rule and fix the cursor.
    fn set_draft(&mut self, candidate: &str) {
        self.widget.update_draft(candidate);
        self.input.clamp(self.widget.draft().text());
    }

    /// Hand a finished request's outcome to the widget.
    pub fn resolve(&mut self, outcome: Result<ChatReply, TransportError>) -> Resolution {
        self.widget.resolve(outcome)
    }

    fn page_size(&self) -> usize {
        // Transcript pane minus its borders, keeping one row of overlap.
        let rows = crate::ui::chat_layout(self.viewport).transcript.height;
        usize::from(rows.saturating_sub(3)).max(1)
    }

    fn scroll_up(&mut self, rows: usize) {
        let max = max_scroll(self, self.viewport);
        self.scroll_from_bottom = (self.scroll_from_bottom + rows).min(max);
    }

    fn scroll_down(&mut self, rows: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    /// Advance the spinner.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use chatcat_engine::Speaker;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(app: &mut App, code: KeyCode) -> Option<ChatRequest> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_typing_updates_draft() {
        let mut app = create_test_app();
        type_text(&mut app, "Hello");
        assert_eq!(app.widget.draft().text(), "Hello");
        assert_eq!(app.input.cursor(), 5);
    }

    #[test]
    fn test_enter_dispatches_request() {
        let mut app = create_test_app();
        type_text(&mut app, "Hello");
        let request = press(&mut app, KeyCode::Enter).expect("request");

        assert!(request.new_session);
        assert_eq!(request.history.last().unwrap().content, "Hello");
        assert!(app.widget.is_busy());
        assert!(app.widget.draft().is_empty());
    }

    #[test]
    fn test_enter_on_empty_draft_does_nothing() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.widget.transcript().len(), 1);
    }

    #[test]
    fn test_typing_ignored_while_busy() {
        let mut app = create_test_app();
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "more");
        app.handle_paste("pasted");
        assert!(app.widget.draft().is_empty());
        assert!(press(&mut app, KeyCode::Enter).is_none());
    }

    #[test]
    fn test_resolve_appends_reply() {
        let mut app = create_test_app();
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);

        app.resolve(Ok(ChatReply {
            reply: "Hi there".into(),
        }));
        let last = app.widget.transcript().last().unwrap();
        assert_eq!(last.speaker(), Speaker::Assistant);
        assert_eq!(last.text(), "Hi there");
        assert!(!app.widget.is_busy());
    }

    #[test]
    fn test_over_limit_paste_blocks_submit() {
        let mut app = create_test_app();
        app.handle_paste(&"a".repeat(250));
        assert_eq!(app.widget.draft().char_count(), 200);
        assert!(app.widget.has_error());
        assert_eq!(app.input.cursor(), 200);

        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.widget.transcript().len(), 1);
        assert!(!app.widget.is_busy());

        press(&mut app, KeyCode::Backspace);
        assert!(!app.widget.has_error());
        assert!(press(&mut app, KeyCode::Enter).is_some());
    }

    #[test]
    fn test_backspace_edits_draft() {
        let mut app = create_test_app();
        type_text(&mut app, "Hey");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.widget.draft().text(), "Hy");
    }

    #[test]
    fn test_history_recall_after_send() {
        let mut app = create_test_app();
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);
        app.resolve(Ok(ChatReply { reply: "Hi".into() }));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.widget.draft().text(), "Hello");
        press(&mut app, KeyCode::Down);
        assert!(app.widget.draft().is_empty());
    }

    #[test]
    fn test_help_toggle_and_escape() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_question_mark_typed_mid_draft() {
        let mut app = create_test_app();
        type_text(&mut app, "Why?");
        assert_eq!(app.widget.draft().text(), "Why?");
        assert!(!app.show_help);
    }

    #[test]
    fn test_ctrl_c_quits_even_with_help() {
        let mut app = create_test_app();
        app.show_help = true;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let mut app = create_test_app();
        // A single greeting fits on screen, so there is nothing to scroll.
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.scroll_from_bottom, 0);

        for i in 0..30 {
            type_text(&mut app, &format!("message {i}"));
            press(&mut app, KeyCode::Enter);
            app.resolve(Ok(ChatReply {
                reply: format!("reply {i}"),
            }));
        }
        press(&mut app, KeyCode::PageUp);
        assert!(app.scroll_from_bottom > 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = create_test_app();
        let mut key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert!(app.widget.draft().is_empty());
    }
}
