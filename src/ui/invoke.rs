//! Cross-thread invoke bridge.
//!
//! Any thread may hand a callback to the loop thread through an [`Invoker`]. Callbacks run in
//! submission order, after the input pending at the time they were queued.

use crate::core::error::Result;
use crate::ui::stack::Application;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;

pub type InvokeCallback = Box<dyn FnOnce(&mut Application) -> Result<()> + Send + 'static>;

pub const DEFAULT_INVOKE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeError {
    /// The bounded queue is full; only reported by [`Invoker::try_invoke`].
    Full,
    /// The application was dropped.
    Disconnected,
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Full => write!(f, "invoke queue is full"),
            InvokeError::Disconnected => write!(f, "application is gone"),
        }
    }
}

impl std::error::Error for InvokeError {}

#[derive(Clone)]
pub struct Invoker {
    tx: SyncSender<InvokeCallback>,
    pending: Arc<AtomicUsize>,
    #[cfg(unix)]
    wakeup: Option<crate::ui::wakeup::WakeupSender>,
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("pending", &self.pending.load(Ordering::Relaxed))
            .finish()
    }
}

impl Invoker {
    /// Queues `f`, blocking while the queue is full.
    ///
    /// Calling this from the loop thread itself while the queue is full never returns.
    pub fn invoke<F>(&self, f: F) -> std::result::Result<(), InvokeError>
    where
        F: FnOnce(&mut Application) -> Result<()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(Box::new(f)).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(InvokeError::Disconnected);
        }
        self.wake();
        Ok(())
    }

    pub fn try_invoke<F>(&self, f: F) -> std::result::Result<(), InvokeError>
    where
        F: FnOnce(&mut Application) -> Result<()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        match self.tx.try_send(Box::new(f)) {
            Ok(()) => {
                self.wake();
                Ok(())
            }
            Err(err) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Err(match err {
                    TrySendError::Full(_) => InvokeError::Full,
                    TrySendError::Disconnected(_) => InvokeError::Disconnected,
                })
            }
        }
    }

    fn wake(&self) {
        #[cfg(unix)]
        if let Some(wakeup) = &self.wakeup {
            wakeup.wake();
        }
    }
}

pub(crate) struct InvokeQueue {
    tx: SyncSender<InvokeCallback>,
    rx: Receiver<InvokeCallback>,
    pending: Arc<AtomicUsize>,
    #[cfg(unix)]
    wakeup: Option<crate::ui::wakeup::WakeupSender>,
}

impl InvokeQueue {
    pub(crate) fn bounded(capacity: usize) -> Self {
        // A zero-capacity channel is a rendezvous; the loop thread would never accept.
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        Self {
            tx,
            rx,
            pending: Arc::new(AtomicUsize::new(0)),
            #[cfg(unix)]
            wakeup: None,
        }
    }

    #[cfg(unix)]
    pub(crate) fn set_wakeup(&mut self, wakeup: crate::ui::wakeup::WakeupSender) {
        self.wakeup = Some(wakeup);
    }

    pub(crate) fn invoker(&self) -> Invoker {
        Invoker {
            tx: self.tx.clone(),
            pending: self.pending.clone(),
            #[cfg(unix)]
            wakeup: self.wakeup.clone(),
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub(crate) fn try_recv(&self) -> Option<InvokeCallback> {
        match self.rx.try_recv() {
            Ok(cb) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Some(cb)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/invoke.rs"]
mod tests;
