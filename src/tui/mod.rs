//! Terminal integration (crossterm + ratatui).
//!
//! Kept apart from `ui` so the stack and menus build and test without terminal crates.

pub mod driver;
pub mod input;
pub mod terminal_guard;

pub use driver::TerminalDriver;
