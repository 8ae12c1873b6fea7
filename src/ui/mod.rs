//! Operator-facing progress output
//!
//! Provisioning reports its steps through the [`Reporter`] trait so the same
//! flow can print styled lines and spinners, or nothing at all under
//! `--quiet`. Everything goes to stderr; stdout is left for command output
//! such as `status --json`.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Progress reporting for provisioning and launch
pub trait Reporter {
    /// A step is starting
    fn step(&mut self, message: &str);

    /// A slow step with captured output is running; cleared by [`Reporter::finish`]
    fn spinner(&mut self, message: &str);

    /// The current spinner, if any, is done
    fn finish(&mut self);

    /// Something completed
    fn success(&mut self, message: &str);

    /// A best-effort step failed and the flow continues
    fn warn(&mut self, message: &str);

    /// Supplementary hint
    fn note(&mut self, message: &str);
}

/// Styled reporter printing to stderr
pub struct TerminalReporter {
    spinner: Option<ProgressBar>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { spinner: None }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn step(&mut self, message: &str) {
        self.finish();
        eprintln!("{} {}", Style::new().bold().cyan().apply_to("==>"), message);
    }

    fn spinner(&mut self, message: &str) {
        self.finish();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(SPINNER_TICKS),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(pb);
    }

    fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn success(&mut self, message: &str) {
        self.finish();
        eprintln!("{} {}", Style::new().bold().green().apply_to("✓"), message);
    }

    fn warn(&mut self, message: &str) {
        self.finish();
        eprintln!(
            "{} {}",
            Style::new().bold().yellow().apply_to("warning:"),
            message
        );
    }

    fn note(&mut self, message: &str) {
        self.finish();
        eprintln!("    {}", Style::new().dim().apply_to(message));
    }
}

impl Drop for TerminalReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Reporter for `--quiet`: prints nothing
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn step(&mut self, _message: &str) {}
    fn spinner(&mut self, _message: &str) {}
    fn finish(&mut self) {}
    fn success(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
    fn note(&mut self, _message: &str) {}
}

/// Reporter matching the `--quiet` flag
pub fn reporter(quiet: bool) -> Box<dyn Reporter> {
    if quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(TerminalReporter::new())
    }
}

/// Reporter that records calls, for asserting on the reported flow
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn step(&mut self, message: &str) {
        self.lines.push(format!("step: {message}"));
    }
    fn spinner(&mut self, message: &str) {
        self.lines.push(format!("spinner: {message}"));
    }
    fn finish(&mut self) {}
    fn success(&mut self, message: &str) {
        self.lines.push(format!("success: {message}"));
    }
    fn warn(&mut self, message: &str) {
        self.lines.push(format!("warn: {message}"));
    }
    fn note(&mut self, message: &str) {
        self.lines.push(format!("note: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_reporter_no_ops() {
        let mut reporter = SilentReporter;
        reporter.step("Checking runtime");
        reporter.spinner("Creating environment");
        reporter.finish();
        reporter.success("done");
        reporter.warn("pip upgrade failed");
        reporter.note("hint");
    }

    #[test]
    fn test_terminal_reporter_spinner_lifecycle() {
        let mut reporter = TerminalReporter::new();
        reporter.spinner("Creating environment");
        assert!(reporter.spinner.is_some());
        reporter.finish();
        assert!(reporter.spinner.is_none());
    }

    #[test]
    fn test_step_clears_spinner() {
        let mut reporter = TerminalReporter::new();
        reporter.spinner("Upgrading pip");
        reporter.step("Installing dependencies");
        assert!(reporter.spinner.is_none());
    }
}
