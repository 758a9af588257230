//! Reusable widgets for the ChatCat TUI.

pub mod status_bar;
pub mod text_input;

pub use status_bar::StatusBar;
pub use text_input::{TextInput, TextInputState};
