//! Chat screen: transcript, input box, character counter and status bar.

use crate::app::App;
use crate::screens::Screen;
use crate::text::{render_markdown, wrap_lines, MarkdownStyles};
use crate::ui::theme::Styles;
use crate::ui::widgets::{StatusBar, TextInput};
use crate::ui::{chat_layout, ChatLayout};
use chatcat_engine::{Speaker, Turn, ERROR_TURN_PREFIX};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Indent of turn bodies under their speaker label.
const BODY_INDENT: usize = 2;

/// The chat screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let layout = chat_layout(area);

        render_transcript(app, layout.transcript, buf);
        render_input(app, layout.input, buf);
        render_counter(app, layout.counter, buf);
        render_status(app, &layout, buf);
    }
}

fn transcript_block() -> Block<'static> {
    Block::default()
        .title(" ChatCat Assistant ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::frame(false))
        .style(Styles::base())
}

/// Every transcript row at the given width, oldest first.
pub fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let styles = MarkdownStyles::default();
    let mut lines = Vec::new();

    for turn in app.widget.transcript().turns() {
        lines.push(speaker_label(turn.speaker()));
        lines.extend(wrap_lines(turn_body(turn, &styles), width, BODY_INDENT));
        lines.push(Line::default());
    }

    if app.widget.is_busy() {
        lines.push(speaker_label(Speaker::Assistant));
        lines.push(Line::from(Span::styled("  Thinking…", Styles::muted())));
    } else if lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn speaker_label(speaker: Speaker) -> Line<'static> {
    let label = match speaker {
        Speaker::User => "You:",
        Speaker::Assistant => "ChatCat:",
    };
    Line::from(Span::styled(label, Styles::speaker(speaker)))
}

fn turn_body(turn: &Turn, styles: &MarkdownStyles) -> Vec<Line<'static>> {
    let text = turn.text();
    match turn.speaker() {
        Speaker::User => plain_lines(text, Styles::base()),
        Speaker::Assistant if text.starts_with(ERROR_TURN_PREFIX) => {
            plain_lines(text, Styles::error())
        }
        Speaker::Assistant => render_markdown(text, styles),
    }
}

fn plain_lines(text: &str, style: ratatui::style::Style) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

/// How far the transcript can scroll up in a terminal of size `area`.
pub fn max_scroll(app: &App, area: Rect) -> usize {
    let inner = transcript_block().inner(chat_layout(area).transcript);
    let total = transcript_lines(app, usize::from(inner.width)).len();
    total.saturating_sub(usize::from(inner.height))
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = transcript_block();
    let inner = block.inner(area);
    block.render(area, buf);

    let lines = transcript_lines(app, usize::from(inner.width));
    let height = usize::from(inner.height);
    let max = lines.len().saturating_sub(height);
    let top = max - app.scroll_from_bottom.min(max);

    let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();
    Paragraph::new(visible)
        .style(Styles::base())
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let busy = app.widget.is_busy();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::frame(!busy))
        .style(Styles::base());

    let input = if busy {
        TextInput::new("", 0).focused(false).placeholder("Sending…")
    } else {
        app.input
            .widget(app.widget.draft().text())
            .focused(!app.show_help)
            .placeholder("Type your message...")
    };
    input.block(block).render(area, buf);
}

fn render_counter(app: &App, area: Rect, buf: &mut Buffer) {
    let draft = app.widget.draft();
    let over = app.widget.has_error();

    if over {
        let warning = format!(" Character limit exceeded (max {})", draft.max_chars());
        Paragraph::new(warning)
            .style(Styles::error())
            .render(area, buf);
    }

    let counter = format!("{} / {} ", draft.char_count(), draft.max_chars());
    Paragraph::new(Line::from(Span::styled(counter, Styles::counter(over))))
        .alignment(Alignment::Right)
        .render(area, buf);
}

fn render_status(app: &App, layout: &ChatLayout, buf: &mut Buffer) {
    let mut status = StatusBar::new(&app.backend_label);
    if app.widget.is_busy() {
        status = status.sending(app.tick);
    }
    status.render(layout.status, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, render_screen_to_string};
    use chatcat_engine::{ChatReply, TransportError};

    fn send(app: &mut App, text: &str) {
        app.widget.update_draft(text);
        app.widget.submit().expect("submit");
    }

    #[test]
    fn test_initial_screen() {
        let app = create_test_app();
        let screen = render_screen_to_string(&ChatScreen, &app);

        assert!(screen.contains("ChatCat Assistant"));
        assert!(screen.contains("ChatCat:"));
        assert!(screen.contains("Hello! My name is ChatCat."));
        assert!(screen.contains("Type your message..."));
        assert!(screen.contains("0 / 200"));
        assert!(!screen.contains("Thinking"));
    }

    #[test]
    fn test_busy_screen_shows_thinking_and_sending() {
        let mut app = create_test_app();
        send(&mut app, "Hello");
        let screen = render_screen_to_string(&ChatScreen, &app);

        assert!(screen.contains("You:"));
        assert!(screen.contains("Hello"));
        assert!(screen.contains("Thinking…"));
        assert!(screen.contains("Sending…"));
        assert!(!screen.contains("Type your message..."));
    }

    #[test]
    fn test_reply_rendered_as_markdown() {
        let mut app = create_test_app();
        send(&mut app, "What degrees?");
        app.resolve(Ok(ChatReply {
            reply: "**Next steps**\n\n- BS\n- BA".into(),
        }));
        let screen = render_screen_to_string(&ChatScreen, &app);

        assert!(screen.contains("Next steps"));
        assert!(!screen.contains("**"));
        assert!(screen.contains("• BS"));
        assert!(screen.contains("• BA"));
    }

    #[test]
    fn test_error_turn_rendered() {
        let mut app = create_test_app();
        send(&mut app, "Hello");
        app.resolve(Err(TransportError::Status {
            status: 500,
            body: "Internal error".into(),
        }));
        let screen = render_screen_to_string(&ChatScreen, &app);
        assert!(screen.contains("Error talking to server: Backend 500: Internal error"));
    }

    #[test]
    fn test_counter_and_limit_warning() {
        let mut app = create_test_app();
        app.widget.update_draft(&"x".repeat(250));
        let screen = render_screen_to_string(&ChatScreen, &app);

        assert!(screen.contains("200 / 200"));
        assert!(screen.contains("Character limit exceeded (max 200)"));
    }

    #[test]
    fn test_status_bar_shows_backend() {
        let app = create_test_app();
        let screen = render_screen_to_string(&ChatScreen, &app);
        assert!(screen.lines().last().unwrap().contains("test backend"));
    }

    #[test]
    fn test_transcript_lines_wrap_with_indent() {
        let mut app = create_test_app();
        send(&mut app, &"word ".repeat(20));
        let lines = transcript_lines(&app, 30);
        assert!(lines.iter().all(|l| l.width() <= 30));
        let continuation: String = lines[lines.len() - 4]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(continuation.starts_with("  "));
    }

    #[test]
    fn test_scroll_shows_older_turns() {
        let mut app = create_test_app();
        for i in 0..20 {
            send(&mut app, &format!("question {i}"));
            app.resolve(Ok(ChatReply {
                reply: format!("answer {i}"),
            }));
        }
        let area = Rect::new(0, 0, 80, 24);
        let bottom = render_screen_to_string(&ChatScreen, &app);
        assert!(bottom.contains("answer 19"));
        assert!(!bottom.contains("Hello! My name"));

        app.scroll_from_bottom = max_scroll(&app, area);
        let top = render_screen_to_string(&ChatScreen, &app);
        assert!(top.contains("Hello! My name"));
        assert!(!top.contains("answer 19"));
    }
}
