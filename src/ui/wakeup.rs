//! Self-pipe used to interrupt a run loop blocked waiting for terminal input.
//!
//! [`WakeupSender`] is the cloneable write end handed to other threads; [`WakeupReceiver`] is the
//! read end the terminal driver polls next to stdin.

use std::io;
use std::os::unix::io::RawFd;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct WakeupSender {
    fd: Arc<OwnedFd>,
}

pub struct WakeupReceiver {
    fd: OwnedFd,
}

struct OwnedFd(RawFd);

impl Drop for OwnedFd {
    fn drop(&mut self) {
        // SAFETY: fd is a valid pipe end created by pipe().
        unsafe {
            libc::close(self.0);
        }
    }
}

// SAFETY: The raw fd is just an integer handle; sending across threads is safe.
unsafe impl Send for OwnedFd {}
unsafe impl Sync for OwnedFd {}

impl std::fmt::Debug for WakeupSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeupSender").field("fd", &self.fd.0).finish()
    }
}

impl std::fmt::Debug for WakeupReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeupReceiver").field("fd", &self.fd.0).finish()
    }
}

/// Both ends are non-blocking: a full pipe already guarantees a pending wakeup.
pub fn wakeup_pipe() -> io::Result<(WakeupSender, WakeupReceiver)> {
    let mut fds = [0 as RawFd; 2];
    // SAFETY: fds is a valid 2-element array.
    let ret = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    let read = OwnedFd(fds[0]);
    let write = OwnedFd(fds[1]);
    set_nonblocking(read.0)?;
    set_nonblocking(write.0)?;

    Ok((
        WakeupSender {
            fd: Arc::new(write),
        },
        WakeupReceiver { fd: read },
    ))
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fd is a valid descriptor owned by the caller.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags == -1 || libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

impl WakeupSender {
    /// Best effort: a full pipe or a dropped receiver is ignored.
    pub fn wake(&self) {
        // SAFETY: fd is a valid pipe write end; buf is a valid 1-byte slice.
        unsafe {
            libc::write(self.fd.0, [1u8].as_ptr().cast(), 1);
        }
    }
}

impl WakeupReceiver {
    pub fn raw_fd(&self) -> RawFd {
        self.fd.0
    }

    /// Consumes every pending wakeup byte; returns whether there was any.
    pub fn drain(&self) -> bool {
        let mut buf = [0u8; 64];
        let mut woke = false;
        loop {
            // SAFETY: fd is a valid non-blocking pipe read end; buf is valid.
            let n = unsafe { libc::read(self.fd.0, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                break;
            }
            woke = true;
        }
        woke
    }
}

/// Waits until one of `fds` is readable. Returns one flag per fd; all false on timeout.
///
/// `None` waits indefinitely. `EINTR` is reported as a timeout so callers simply poll again.
pub fn poll_readable(fds: &[RawFd], timeout: Option<Duration>) -> io::Result<Vec<bool>> {
    let mut pollfds: Vec<libc::pollfd> = fds
        .iter()
        .map(|&fd| libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        })
        .collect();
    let timeout_ms = match timeout {
        Some(d) => d.as_millis().min(i32::MAX as u128) as libc::c_int,
        None => -1,
    };

    // SAFETY: pollfds is a valid, correctly sized array of pollfd.
    let ret = unsafe {
        libc::poll(
            pollfds.as_mut_ptr(),
            pollfds.len() as libc::nfds_t,
            timeout_ms,
        )
    };
    if ret < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(vec![false; fds.len()]);
        }
        return Err(err);
    }

    Ok(pollfds
        .iter()
        .map(|p| p.revents & (libc::POLLIN | libc::POLLHUP) != 0)
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/ui/wakeup.rs"]
mod tests;
