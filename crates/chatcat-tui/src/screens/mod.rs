//! Screen definitions for the ChatCat TUI.

pub mod chat;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Draw one full frame: the chat screen plus any overlay.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    chat::ChatScreen.render(app, area, buf);
    if app.show_help {
        render_help_overlay(area, buf);
    }
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Chat
    Enter             Send message
    Left/Right        Move cursor
    Home/End          Start/end of line
    Up/Down           Recall sent messages
    PgUp/PgDn         Scroll transcript
    F1 or ?           Toggle this help
    Esc / Ctrl+C      Quit

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::frame(true))
        .style(Styles::base());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::base())
        .render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_app};

    #[test]
    fn test_help_overlay_lists_keys() {
        let mut app = create_test_app();
        app.show_help = true;
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render_app(&app, area, &mut buf);

        let text = buffer_to_string(&buf);
        assert!(text.contains("Help"));
        assert!(text.contains("Send message"));
        assert!(text.contains("Recall sent messages"));
    }
}
