//! UI module for the ChatCat TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
