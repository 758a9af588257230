//! Styles for markdown in assistant replies.

use ratatui::style::{Modifier, Style};

use crate::ui::theme::Palette;

/// How each markdown element in a reply is drawn.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    /// Top-level `#` headings.
    pub heading: Style,
    /// `##` and deeper.
    pub subheading: Style,
    pub code: Style,
    pub emphasis: Style,
    pub strong: Style,
    /// Bullets and list numbers.
    pub list_marker: Style,
    pub link: Style,
    pub blockquote: Style,
    pub text: Style,
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            heading: bold.fg(Palette::ARIZONA_RED),
            subheading: bold.fg(Palette::FG),
            code: Style::default().fg(Palette::CODE).bg(Palette::BAR_BG),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: bold,
            list_marker: Style::default().fg(Palette::ARIZONA_RED),
            link: Style::default()
                .fg(Palette::USER_BLUE)
                .add_modifier(Modifier::UNDERLINED),
            blockquote: Style::default()
                .fg(Palette::MUTED)
                .add_modifier(Modifier::ITALIC),
            text: Style::default().fg(Palette::FG),
        }
    }
}
