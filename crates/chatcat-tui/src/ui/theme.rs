//! Colors and styles for the ChatCat TUI.
//!
//! Arizona red marks the assistant and the app itself, blue marks the user
//! and whatever currently takes input.

use chatcat_engine::Speaker;
use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const MUTED: Color = Color::Rgb(140, 140, 160);

    pub const ARIZONA_RED: Color = Color::Rgb(171, 5, 32);
    pub const ARIZONA_NAVY: Color = Color::Rgb(12, 35, 75);
    pub const USER_BLUE: Color = Color::Rgb(130, 170, 255);

    pub const BAR_BG: Color = Color::Rgb(45, 45, 60);
    pub const CODE: Color = Color::Rgb(240, 200, 100);
    pub const ERROR: Color = Color::Rgb(240, 100, 100);
    pub const FRAME: Color = Color::Rgb(80, 80, 100);
}

/// Spinner shown while a message is in flight.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Spinner frame for a tick counter.
pub fn spinner(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Styles for the parts of the chat screen.
pub struct Styles;

impl Styles {
    /// Transcript and input text.
    pub fn base() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Placeholders, the counter and the pending-reply line.
    pub fn muted() -> Style {
        Style::default().fg(Palette::MUTED).bg(Palette::BG)
    }

    /// The "You:" / "ChatCat:" label above a turn.
    pub fn speaker(speaker: Speaker) -> Style {
        let color = match speaker {
            Speaker::User => Palette::USER_BLUE,
            Speaker::Assistant => Palette::ARIZONA_RED,
        };
        Style::default()
            .fg(color)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Input prompt and cursor.
    pub fn prompt() -> Style {
        Style::default().fg(Palette::USER_BLUE).bg(Palette::BG)
    }

    /// Failed-request turns and the over-limit warning.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Box titles.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::FG)
            .add_modifier(Modifier::BOLD)
    }

    /// Box borders; the one taking input is highlighted.
    pub fn frame(focused: bool) -> Style {
        if focused {
            Style::default().fg(Palette::USER_BLUE)
        } else {
            Style::default().fg(Palette::FRAME)
        }
    }

    /// Character counter, red once the draft hit the limit.
    pub fn counter(over_limit: bool) -> Style {
        if over_limit {
            Self::error()
        } else {
            Self::muted()
        }
    }

    /// App name badge at the left of the status bar.
    pub fn badge() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::ARIZONA_RED)
            .add_modifier(Modifier::BOLD)
    }

    /// Key name in a status bar hint.
    pub fn hint_key() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::ARIZONA_NAVY)
            .add_modifier(Modifier::BOLD)
    }

    /// Status bar text.
    pub fn bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BAR_BG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(0), "|");
        assert_eq!(spinner(1), "/");
        assert_eq!(spinner(4), "|");
    }

    #[test]
    fn test_speakers_styled_apart() {
        assert_ne!(Styles::speaker(Speaker::User), Styles::speaker(Speaker::Assistant));
    }

    #[test]
    fn test_counter_turns_red_over_limit() {
        assert_eq!(Styles::counter(true), Styles::error());
        assert_eq!(Styles::counter(false), Styles::muted());
    }
}
