//! Rendering backends and the driver seam.
//!
//! The application never talks to a terminal directly. A [`Driver`] reports the screen size,
//! delivers input and flushes paint commands; the terminal driver lives in `crate::tui`, the
//! headless one in [`test`].

use crate::core::event::InputEvent;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::painter::PaintCmd;
use std::io;
use std::time::Duration;

pub trait Backend {
    fn draw(&mut self, area: Rect, cmds: &[PaintCmd]);

    fn set_cursor(&mut self, pos: Option<Pos>);
}

pub trait Driver {
    fn size(&self) -> Rect;

    /// Waits for the next input event.
    ///
    /// `None` blocks until input arrives or the driver is woken; `Some(timeout)` waits at most
    /// that long. `Ok(None)` means nothing arrived.
    fn poll_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<InputEvent>>;

    fn present(&mut self, cmds: &[PaintCmd], cursor: Option<Pos>) -> io::Result<()>;

    /// A handle other threads can use to interrupt a blocking [`Driver::poll_event`].
    #[cfg(unix)]
    fn wakeup(&self) -> Option<crate::ui::wakeup::WakeupSender> {
        None
    }
}

#[cfg(feature = "tui")]
#[path = "ratatui.rs"]
pub mod terminal;
