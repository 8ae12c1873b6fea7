//! Running external commands (interpreter, pip, the app server)
//!
//! Installer steps may be bounded by a timeout; when none is configured the
//! helpers fall through to the plain blocking `std::process` calls.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while waiting on a child with a deadline
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of waiting on a command with an optional deadline
#[derive(Debug)]
pub enum Completion<T> {
    /// The command ran to completion
    Finished(T),
    /// The deadline passed; the command was killed
    TimedOut,
}

/// Render a command line for logs and error messages
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    for arg in cmd.get_args() {
        let arg = arg.to_string_lossy();
        if arg.contains(' ') {
            parts.push(format!("\"{arg}\""));
        } else {
            parts.push(arg.to_string());
        }
    }
    parts.join(" ")
}

/// Run `cmd` capturing stdout and stderr
pub fn output(cmd: &mut Command, timeout: Option<Duration>) -> io::Result<Completion<Output>> {
    tracing::debug!(command = %describe(cmd), "running (captured)");

    let Some(timeout) = timeout else {
        return cmd.output().map(Completion::Finished);
    };

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes on their own threads so a chatty child cannot block
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    match wait_until(&mut child, Instant::now() + timeout)? {
        Some(status) => Ok(Completion::Finished(Output {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })),
        None => Ok(Completion::TimedOut),
    }
}

/// Run `cmd` with inherited stdio so its output reaches the operator verbatim
pub fn status(cmd: &mut Command, timeout: Option<Duration>) -> io::Result<Completion<ExitStatus>> {
    tracing::debug!(command = %describe(cmd), "running");

    let Some(timeout) = timeout else {
        return cmd.status().map(Completion::Finished);
    };

    let mut child = cmd.spawn()?;
    Ok(match wait_until(&mut child, Instant::now() + timeout)? {
        Some(status) => Completion::Finished(status),
        None => Completion::TimedOut,
    })
}

/// Shell-style exit code of a finished process
///
/// A process killed by signal `s` maps to `128 + s` on Unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Short human readable failure reason from captured output
pub fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with status {}", exit_code(output.status))
    } else {
        stderr.to_string()
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Wait for `child` until `deadline`; kill and reap it when the deadline passes
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            tracing::warn!(pid = child.id(), "deadline passed, killing child");
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
