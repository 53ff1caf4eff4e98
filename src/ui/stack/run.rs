use super::{Application, TopLevel};
use crate::core::error::Result;
use crate::ui::core::id::Id;
use std::time::Duration;

impl Application {
    /// Begins `view`, pumps the loop until it stops, then ends it and hands it back.
    ///
    /// Nested calls from inside a callback run a nested loop, which is how a modal dialog
    /// blocks its caller.
    pub fn run(&mut self, view: TopLevel) -> Result<TopLevel> {
        let id = self.begin(view)?;
        while self.is_running(id) {
            self.run_iteration()?;
        }
        if self.view(id).is_some_and(TopLevel::is_container) {
            self.end_stopped_children(id)?;
        }
        self.end(id)
    }

    /// Ends the stopped views still pushed above container `id`, top first.
    fn end_stopped_children(&mut self, id: Id) -> Result<()> {
        while let Some(top) = self.stack.last() {
            let Some(child) = top.id().filter(|&child| child != id) else {
                break;
            };
            if top.is_running() {
                break;
            }
            self.end(child)?;
        }
        Ok(())
    }

    /// Callbacks are waiting, so the next wait must not block.
    pub fn has_pending_work(&self) -> bool {
        self.invoke.pending() > 0 || !self.idle.is_empty()
    }

    /// One loop step: wait for input, route every available event, drain the invoke bridge,
    /// run the idle callbacks queued so far, re-evaluate current, repaint.
    pub fn run_iteration(&mut self) -> Result<()> {
        let wait = if self.has_pending_work() {
            Duration::ZERO
        } else {
            self.settings.poll_interval()
        };
        let mut next = self.driver.poll_event(Some(wait))?;
        while let Some(event) = next {
            // Input after a stop belongs to whichever loop observes the stop.
            if self.process_event(event)? {
                break;
            }
            next = self.driver.poll_event(Some(Duration::ZERO))?;
        }

        let queued = self.invoke.pending();
        for _ in 0..queued {
            let Some(f) = self.invoke.try_recv() else {
                break;
            };
            let result = f(self);
            self.recover(result)?;
        }

        let queued = self.idle.len();
        for _ in 0..queued {
            let Some(f) = self.idle.pop_front() else {
                break;
            };
            let result = f(self);
            self.recover(result)?;
        }

        self.refresh_current();
        if self.needs_redraw {
            self.draw()?;
        }
        Ok(())
    }

    /// Offers a callback failure to the error handler; the loop continues only if it says so.
    fn recover(&mut self, result: Result<()>) -> Result<()> {
        let Err(err) = result else {
            return Ok(());
        };
        let resume = self
            .error_handler
            .as_mut()
            .is_some_and(|handler| handler(&err));
        if resume {
            tracing::warn!(error = %err, "callback failed; handler resumed the loop");
            Ok(())
        } else {
            tracing::error!(error = %err, "callback failed");
            Err(err)
        }
    }
}

