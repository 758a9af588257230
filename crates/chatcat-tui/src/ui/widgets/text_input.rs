//! Single-line text input widget.
//!
//! The text itself lives in the engine's draft; [`TextInputState`] only
//! tracks the cursor and the recall history. Every edit returns the full
//! candidate text, which the caller runs through the draft's length rule
//! before handing it back.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Renders a draft with a prompt and cursor.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    content: &'a str,
    /// Cursor position (character index).
    cursor: usize,
    block: Option<Block<'a>>,
    focused: bool,
    placeholder: Option<&'a str>,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Create a new text input over `content`.
    pub fn new(content: &'a str, cursor: usize) -> Self {
        Self {
            content,
            cursor,
            block: None,
            focused: true,
            placeholder: None,
            prompt: "> ",
        }
    }

    /// Set the block for the text input.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set focus state. An unfocused input draws no cursor.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let mut spans = vec![Span::styled(self.prompt, Styles::prompt())];

        if self.content.is_empty() {
            if self.focused {
                spans.push(Span::styled("_", Styles::prompt()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::muted()));
            }
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        // Keep the cursor visible: show the tail of long drafts.
        let prompt_width = self.prompt.chars().count();
        let visible = usize::from(inner.width).saturating_sub(prompt_width + 1);
        let skip = self.cursor.saturating_sub(visible);

        let mut text = String::new();
        for (i, ch) in self.content.chars().enumerate().skip(skip) {
            if self.focused && i == self.cursor {
                text.push('|');
            }
            // Pasted newlines render as spaces on the single input row.
            text.push(if ch == '\n' { ' ' } else { ch });
        }
        if self.focused && self.cursor >= self.content.chars().count() {
            text.push('_');
        }
        spans.push(Span::styled(text, Styles::base()));

        Paragraph::new(Line::from(spans))
            .style(Styles::base())
            .render(inner, buf);
    }
}

/// Cursor and recall history for the chat input.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// Cursor position (character index).
    cursor: usize,
    /// Previously sent messages, oldest first.
    history: Vec<String>,
    /// Current history index (-1 = current input).
    history_index: isize,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new state with the cursor at the start.
    pub fn new() -> Self {
        Self {
            history_index: -1,
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert text at the cursor. Returns the candidate content.
    pub fn insert_str(&mut self, content: &str, s: &str) -> String {
        let at = byte_index(content, self.cursor);
        let mut out = String::with_capacity(content.len() + s.len());
        out.push_str(&content[..at]);
        out.push_str(s);
        out.push_str(&content[at..]);
        self.cursor += s.chars().count();
        out
    }

    /// Insert a character at the cursor. Returns the candidate content.
    pub fn insert(&mut self, content: &str, ch: char) -> String {
        let mut buf = [0u8; 4];
        self.insert_str(content, ch.encode_utf8(&mut buf))
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self, content: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(remove_char(content, self.cursor))
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self, content: &str) -> Option<String> {
        if self.cursor >= content.chars().count() {
            return None;
        }
        Some(remove_char(content, self.cursor))
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, content: &str) {
        if self.cursor < content.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self, content: &str) {
        self.cursor = content.chars().count();
    }

    /// Keep the cursor inside `content` after the draft was truncated.
    pub fn clamp(&mut self, content: &str) {
        self.cursor = self.cursor.min(content.chars().count());
    }

    /// Record a sent message and reset the cursor for the cleared draft.
    pub fn record_sent(&mut self, text: &str) {
        self.history.push(text.to_string());
        self.history_index = -1;
        self.saved_input.clear();
        self.cursor = 0;
    }

    /// Recall the previous sent message. Returns the text to load.
    pub fn history_prev(&mut self, content: &str) -> Option<String> {
        let next_index = self.history_index + 1;
        let slot = usize::try_from(next_index).ok()?;
        if slot >= self.history.len() {
            return None;
        }
        if self.history_index == -1 {
            self.saved_input = content.to_string();
        }
        self.history_index = next_index;
        let text = self.history[self.history.len() - 1 - slot].clone();
        self.cursor = text.chars().count();
        Some(text)
    }

    /// Step back towards the draft that was being typed.
    pub fn history_next(&mut self) -> Option<String> {
        if self.history_index < 0 {
            return None;
        }
        self.history_index -= 1;
        let text = match usize::try_from(self.history_index) {
            Ok(slot) => self.history[self.history.len() - 1 - slot].clone(),
            Err(_) => std::mem::take(&mut self.saved_input),
        };
        self.cursor = text.chars().count();
        Some(text)
    }

    /// Create a widget rendering `content` with this cursor.
    pub fn widget<'a>(&self, content: &'a str) -> TextInput<'a> {
        TextInput::new(content, self.cursor)
    }
}

fn byte_index(content: &str, char_index: usize) -> usize {
    content
        .char_indices()
        .nth(char_index)
        .map_or(content.len(), |(i, _)| i)
}

fn remove_char(content: &str, char_index: usize) -> String {
    content
        .chars()
        .enumerate()
        .filter_map(|(i, ch)| (i != char_index).then_some(ch))
        .collect()
}
