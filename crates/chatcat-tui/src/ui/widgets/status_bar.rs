//! Status bar for the chat screen.

use crate::ui::theme::{spinner, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// Chat keys advertised in the bar, as (key, action).
const HINTS: [(&str, &str); 3] = [("Enter", "Send"), ("PgUp", "Scroll"), ("F1", "Help")];

/// Bottom row: app badge, key hints, and either the backend or a spinner.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    backend: &'a str,
    /// Spinner tick while a message is in flight.
    sending: Option<usize>,
}

impl<'a> StatusBar<'a> {
    /// Status bar for an idle chat talking to `backend`.
    pub fn new(backend: &'a str) -> Self {
        Self {
            backend,
            sending: None,
        }
    }

    /// Show that a message is in flight instead of the backend.
    #[must_use]
    pub fn sending(mut self, tick: usize) -> Self {
        self.sending = Some(tick);
        self
    }

    fn right_text(&self) -> String {
        match self.sending {
            Some(tick) => format!("{} Sending…", spinner(tick)),
            None => self.backend.to_string(),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        buf.set_style(Rect { height: 1, ..area }, Styles::bar());

        let mut spans = vec![
            Span::styled(" ChatCat ", Styles::badge()),
            Span::styled(" ", Styles::bar()),
        ];
        for (key, action) in HINTS {
            // Enter does nothing until the reply is in.
            if self.sending.is_some() && key == "Enter" {
                continue;
            }
            spans.push(Span::styled(format!(" {key} "), Styles::hint_key()));
            spans.push(Span::styled(format!(" {action} "), Styles::bar()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let right = self.right_text();
        let width = u16::try_from(right.width()).unwrap_or(u16::MAX);
        if width < area.width {
            let x = area.x + area.width - width - 1;
            buf.set_string(x, area.y, &right, Styles::bar());
        }
    }
}
