//! Foreground supervision of the server process
//!
//! The launcher waits on its child and watches for SIGINT/SIGTERM. On an
//! interrupt the child is asked to stop, given a grace period, then killed.
//! A [`ProcessHandle`] that is dropped while its child still runs kills it,
//! so no path out of the launcher leaves the server behind.

use std::io;
use std::process::{Child, ExitStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use signal_hook::SigId;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::error::{self, Result};
use crate::process;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Operator interrupt flag, raised by SIGINT or SIGTERM
pub struct Interrupts {
    flag: Arc<AtomicBool>,
    ids: Vec<SigId>,
}

impl Interrupts {
    /// Install handlers for SIGINT and SIGTERM
    ///
    /// The handlers stay installed until this value is dropped.
    pub fn register() -> Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        let mut ids = Vec::new();
        for signal in [SIGINT, SIGTERM] {
            let id = signal_hook::flag::register(signal, Arc::clone(&flag)).map_err(|e| {
                error::fs::io_error(format!("Failed to install signal handler: {e}"))
            })?;
            ids.push(id);
        }
        Ok(Self { flag, ids })
    }

    /// Interrupts driven by an existing flag, without signal handlers
    #[cfg(test)]
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            flag,
            ids: Vec::new(),
        }
    }

    pub fn triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Drop for Interrupts {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// The running server process
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    command: String,
}

impl ProcessHandle {
    pub fn new(child: Child, command: String) -> Self {
        Self { child, command }
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Ask the process to stop, then kill it once `grace` has passed
    pub fn terminate(&mut self, grace: Duration) -> io::Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }

        request_stop(&mut self.child)?;
        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait()? {
                tracing::debug!(pid = self.child.id(), "server stopped within grace period");
                return Ok(status);
            }
            thread::sleep(POLL_INTERVAL.min(grace));
        }

        tracing::warn!(
            pid = self.child.id(),
            command = %self.command,
            grace_secs = grace.as_secs(),
            "server ignored stop request, killing"
        );
        self.child.kill()?;
        self.child.wait()
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            tracing::debug!(pid = self.child.id(), command = %self.command, "killing server on drop");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(unix)]
fn request_stop(child: &mut Child) -> io::Result<()> {
    let pid = libc::pid_t::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: plain kill(2) on the pid of a child we have not reaped yet
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn request_stop(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// How a supervised session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The server exited on its own
    Exited(ExitStatus),
    /// The operator interrupted and the server was stopped
    Interrupted(ExitStatus),
}

impl SessionOutcome {
    /// Exit code for rnictl itself
    ///
    /// An operator stop counts as success; otherwise the server's own code
    /// (or `128 + signal`) is passed through.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(status) => process::exit_code(*status),
            Self::Interrupted(_) => 0,
        }
    }
}

/// Block until the server exits or the operator interrupts
pub fn supervise(
    handle: &mut ProcessHandle,
    interrupts: &Interrupts,
    grace: Duration,
) -> io::Result<SessionOutcome> {
    loop {
        // Ctrl-C reaches the whole process group, so the server may already
        // be gone by the time the flag is seen
        if interrupts.triggered() {
            tracing::info!(pid = handle.id(), "interrupt received, stopping server");
            let status = handle.terminate(grace)?;
            return Ok(SessionOutcome::Interrupted(status));
        }
        if let Some(status) = handle.try_wait()? {
            return Ok(SessionOutcome::Exited(status));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
