//! termstack - a stacked-window runtime for character-cell terminals.
//!
//! Modules:
//! - core: errors and input events
//! - ui: the view stack, mouse capture, menus, the invoke bridge and the paint/hit-test core
//! - tui: the crossterm/ratatui terminal driver (feature `tui`)
//! - settings, logging: configuration file and file logging

pub mod core;
pub mod logging;
pub mod settings;
#[cfg(feature = "tui")]
pub mod tui;
pub mod ui;

pub use crate::core::error::{Result, UiError};
pub use crate::settings::Settings;
pub use crate::ui::invoke::{InvokeError, Invoker};
pub use crate::ui::stack::{Application, Placement, StopOutcome, TopLevel};
pub use crate::ui::view::{EventCx, EventResult, View};
