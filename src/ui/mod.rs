//! UI layer: the view stack, mouse capture, menus and the backends they paint through.
//!
//! Terminal crates stay behind [`backend::Driver`]; everything here can run headless.

pub mod backend;
pub mod core;
pub mod invoke;
pub mod menu;
pub mod mouse;
pub mod stack;
pub mod view;
#[cfg(unix)]
pub mod wakeup;
pub mod widgets;
