// src/exec/process.rs

//! Invocation and result types for supervised processes.

use std::path::PathBuf;
use std::time::Duration;

/// Status reported when the process had to be killed because a timeout
/// fired. Never produced by a real exit.
pub const TIMED_OUT_STATUS: i32 = -1;

/// Total and inactivity limit used when a caller doesn't say otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// How often the inactivity monitor samples the activity clock.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A command to run under supervision.
///
/// Built with [`ProcessSpec::new`] and refined with the builder methods;
/// [`crate::exec::run`] takes it by value so it cannot change once the
/// process has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// argv-style tokens; the first is the executable.
    pub args: Vec<String>,
    /// Working directory, or the caller's current directory if `None`.
    pub working_dir: Option<PathBuf>,
    /// Wall-clock limit measured from process start.
    pub total_timeout: Duration,
    /// Longest tolerated gap between two output lines.
    pub inactivity_timeout: Duration,
    /// Sampling period of the inactivity monitor.
    pub poll_interval: Duration,
}

impl ProcessSpec {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            total_timeout: DEFAULT_TIMEOUT,
            inactivity_timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn failing_after(mut self, total: Duration) -> Self {
        self.total_timeout = total;
        self
    }

    pub fn tolerating_inactivity_of(mut self, inactivity: Duration) -> Self {
        self.inactivity_timeout = inactivity;
        self
    }

    pub fn polling_every(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeouts(self, timeouts: Timeouts) -> Self {
        self.failing_after(timeouts.total)
            .tolerating_inactivity_of(timeouts.inactivity)
    }

    /// The executable, or `""` for an empty command.
    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// Timeout pair applied to `steamcmd` login/build invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// How long to wait for completion before the process is killed.
    pub total: Duration,
    /// How long silence on the output is tolerated before the process is killed.
    pub inactivity: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(5 * 60),
            inactivity: Duration::from_secs(2 * 60),
        }
    }
}

/// How a supervised invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process exited on its own before the total deadline.
    Exited,
    /// The total deadline passed and the process was killed.
    TotalTimeout,
    /// No output arrived within the inactivity limit and the process was killed.
    Inactivity,
}

/// Outcome of a supervised invocation.
///
/// `lines` holds the combined stdout/stderr lines in emission order, up to
/// the moment the process ended or was killed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    status: i32,
    lines: Vec<String>,
    termination: Termination,
}

impl ProcessResult {
    pub(crate) fn exited(status: i32, lines: Vec<String>) -> Self {
        Self {
            status,
            lines,
            termination: Termination::Exited,
        }
    }

    pub(crate) fn killed(termination: Termination, lines: Vec<String>) -> Self {
        Self {
            status: TIMED_OUT_STATUS,
            lines,
            termination,
        }
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }

    pub fn timed_out(&self) -> bool {
        self.termination != Termination::Exited
    }
}
