//! Errors and input events shared by every layer.

pub mod error;
pub mod event;

pub use error::{Result, UiError};
pub use event::{InputEvent, Key, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
