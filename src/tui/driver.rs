use super::input::into_input_event;
use super::terminal_guard::{TerminalGuard, TerminalRestorer};
use crate::core::event::InputEvent;
use crate::settings::Settings;
use crate::ui::backend::terminal::RatatuiTerminal;
use crate::ui::backend::Driver;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::painter::PaintCmd;
use crossterm::event as ct;
use std::io;
use std::time::Duration;

/// Drives a real terminal: raw mode and the alternate screen for as long as it lives.
pub struct TerminalDriver {
    terminal: RatatuiTerminal,
    size: Rect,
    #[cfg(unix)]
    wakeup_tx: crate::ui::wakeup::WakeupSender,
    #[cfg(unix)]
    wakeup_rx: crate::ui::wakeup::WakeupReceiver,
    #[cfg(not(unix))]
    poll_interval: Duration,
    // Dropped last so the screen is restored after the final frame.
    guard: TerminalGuard,
}

impl TerminalDriver {
    pub fn new(settings: &Settings) -> io::Result<Self> {
        let guard = TerminalGuard::new(settings.mouse)?;
        let mut terminal = RatatuiTerminal::new(io::stdout())?;
        terminal.clear()?;
        let size = terminal.size()?;
        #[cfg(unix)]
        let (wakeup_tx, wakeup_rx) = crate::ui::wakeup::wakeup_pipe()?;
        tracing::debug!(w = size.w, h = size.h, mouse = settings.mouse, "terminal ready");
        Ok(Self {
            terminal,
            size,
            #[cfg(unix)]
            wakeup_tx,
            #[cfg(unix)]
            wakeup_rx,
            #[cfg(not(unix))]
            poll_interval: settings.poll_interval(),
            guard,
        })
    }

    pub fn restorer(&self) -> TerminalRestorer {
        self.guard.restorer()
    }

    fn read(&mut self) -> io::Result<Option<InputEvent>> {
        let event = into_input_event(ct::read()?);
        if let InputEvent::Resize(w, h) = event {
            self.size = Rect::new(0, 0, w, h);
        }
        Ok(Some(event))
    }
}

impl Driver for TerminalDriver {
    fn size(&self) -> Rect {
        self.size
    }

    #[cfg(unix)]
    fn poll_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<InputEvent>> {
        // crossterm may already hold parsed input.
        if ct::poll(Duration::ZERO)? {
            return self.read();
        }
        let fds = [libc::STDIN_FILENO, self.wakeup_rx.raw_fd()];
        let ready = crate::ui::wakeup::poll_readable(&fds, timeout)?;
        if ready.get(1).copied().unwrap_or(false) {
            self.wakeup_rx.drain();
        }
        // Resizes arrive through crossterm's signal handler, not stdin.
        if ct::poll(Duration::ZERO)? {
            return self.read();
        }
        Ok(None)
    }

    #[cfg(not(unix))]
    fn poll_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<InputEvent>> {
        let wait = timeout.map_or(self.poll_interval, |t| t.min(self.poll_interval));
        if ct::poll(wait)? {
            return self.read();
        }
        Ok(None)
    }

    fn present(&mut self, cmds: &[PaintCmd], cursor: Option<Pos>) -> io::Result<()> {
        self.terminal.present(cmds, cursor)
    }

    #[cfg(unix)]
    fn wakeup(&self) -> Option<crate::ui::wakeup::WakeupSender> {
        Some(self.wakeup_tx.clone())
    }
}
