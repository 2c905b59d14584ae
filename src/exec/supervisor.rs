// src/exec/supervisor.rs

//! Run a single command to completion or to a timeout.

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Split};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until, timeout_at};
use tracing::{debug, info, warn};

use crate::errors::{DeployError, Result};

use super::activity::ActivityClock;
use super::process::{ProcessResult, ProcessSpec, Termination};

// Stand-in deadline for limits too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

type OutputStream = Box<dyn AsyncRead + Send + Unpin>;
type Captured = Arc<Mutex<Vec<String>>>;

enum Outcome {
    Exited(std::io::Result<ExitStatus>),
    TotalTimeout,
    Inactive(Duration),
}

/// Run `spec` under supervision.
///
/// Standard error is merged into standard output. The returned future
/// resolves when the process exits, or when either the total deadline or the
/// inactivity limit fires; in the latter two cases the process is killed and
/// the result carries [`super::TIMED_OUT_STATUS`].
///
/// Two workers run alongside the caller: an output reader and an inactivity
/// monitor. Both are joined (or aborted and joined) before this returns, on
/// every path.
///
/// Failing to start the command is the only error for a process that ran;
/// a panic inside a worker is re-raised.
pub async fn run(spec: ProcessSpec) -> Result<ProcessResult> {
    let program = spec.program().to_string();
    let deadline = deadline_after(Instant::now(), spec.total_timeout);

    let (mut child, streams) = spawn_child(&spec)?;

    info!(
        program = %program,
        pid = child.id(),
        total_timeout = ?spec.total_timeout,
        inactivity_timeout = ?spec.inactivity_timeout,
        "process started"
    );

    let clock = Arc::new(ActivityClock::new());
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let (idle_tx, mut idle_rx) = oneshot::channel();

    let mut workers = JoinSet::new();
    workers.spawn(read_output(
        streams,
        Arc::clone(&captured),
        Arc::clone(&clock),
        program.clone(),
    ));
    let monitor = workers.spawn(watch_inactivity(
        Arc::clone(&clock),
        spec.inactivity_timeout,
        spec.poll_interval,
        idle_tx,
    ));

    let outcome = tokio::select! {
        status = child.wait() => Outcome::Exited(status),
        () = sleep_until(deadline) => Outcome::TotalTimeout,
        Ok(idle) = &mut idle_rx => Outcome::Inactive(idle),
    };

    let termination = match outcome {
        Outcome::Exited(status) => {
            monitor.abort();
            // Descendants may still hold the pipe open; give the reader one
            // poll interval to reach end-of-stream, never past the deadline.
            let drain_until = deadline.min(deadline_after(Instant::now(), spec.poll_interval));
            if timeout_at(drain_until, drain(&mut workers)).await.is_err() {
                warn!(program = %program, "output still held open after exit; abandoning it");
                workers.abort_all();
                drain(&mut workers).await;
            }
            Ok(exit_code(status?))
        }
        Outcome::TotalTimeout => {
            warn!(
                program = %program,
                timeout = ?spec.total_timeout,
                "total timeout breached; killing process"
            );
            Err(Termination::TotalTimeout)
        }
        Outcome::Inactive(idle) => {
            warn!(
                program = %program,
                idle = ?idle,
                "no output for too long; killing process"
            );
            Err(Termination::Inactivity)
        }
    };

    if termination.is_err() {
        // Stop reading first so nothing emitted after the deadline is kept.
        workers.abort_all();
        drain(&mut workers).await;
        kill(&mut child, &program).await;
    }

    let lines = std::mem::take(&mut *captured.lock().unwrap_or_else(PoisonError::into_inner));

    let result = match termination {
        Ok(status) => ProcessResult::exited(status, lines),
        Err(killed) => ProcessResult::killed(killed, lines),
    };

    info!(
        program = %program,
        status = result.status(),
        lines = result.lines().len(),
        termination = ?result.termination(),
        "process finished"
    );

    Ok(result)
}

fn base_command(spec: &ProcessSpec) -> Result<Command> {
    let (program, args) = spec.args.split_first().ok_or_else(|| DeployError::Spawn {
        program: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
    if let Some(dir) = &spec.working_dir {
        cmd.current_dir(dir);
    }
    Ok(cmd)
}

fn spawn_error(spec: &ProcessSpec) -> impl FnOnce(std::io::Error) -> DeployError + '_ {
    move |source| DeployError::Spawn {
        program: spec.program().to_string(),
        source,
    }
}

/// Spawn with both output handles writing into one pipe.
///
/// `cmd` is dropped before returning so the parent holds no write end and
/// the reader sees end-of-stream once the child (and its descendants) close
/// theirs.
#[cfg(unix)]
fn spawn_child(spec: &ProcessSpec) -> Result<(Child, [Option<OutputStream>; 2])> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let mut cmd = base_command(spec)?;
    let (reader, writer) = std::io::pipe()?;
    cmd.stderr(writer.try_clone()?).stdout(writer);

    let child = cmd.spawn().map_err(spawn_error(spec))?;
    drop(cmd);

    let merged = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok((child, [Some(Box::new(merged) as OutputStream), None]))
}

/// Without a shareable pipe the two streams are read side by side; each
/// keeps its own order and lines interleave in arrival order.
#[cfg(not(unix))]
fn spawn_child(spec: &ProcessSpec) -> Result<(Child, [Option<OutputStream>; 2])> {
    let mut cmd = base_command(spec)?;
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(spawn_error(spec))?;
    let stdout = child.stdout.take().map(|s| Box::new(s) as OutputStream);
    let stderr = child.stderr.take().map(|s| Box::new(s) as OutputStream);
    Ok((child, [stdout, stderr]))
}

/// Output reader worker: appends each line and touches the clock.
async fn read_output(
    streams: [Option<OutputStream>; 2],
    captured: Captured,
    clock: Arc<ActivityClock>,
    program: String,
) {
    let [first, second] = streams;
    let mut first = first.map(|s| BufReader::new(s).split(b'\n'));
    let mut second = second.map(|s| BufReader::new(s).split(b'\n'));

    loop {
        let (from_first, segment) = tokio::select! {
            segment = next_line(&mut first), if first.is_some() => (true, segment),
            segment = next_line(&mut second), if second.is_some() => (false, segment),
            else => break,
        };

        match segment {
            Some(line) => {
                debug!(program = %program, "{}", line);
                captured
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(line);
                clock.touch();
            }
            None if from_first => first = None,
            None => second = None,
        }
    }

    debug!(program = %program, "output stream closed");
}

async fn next_line(
    stream: &mut Option<Split<BufReader<OutputStream>>>,
) -> Option<String> {
    let split = stream.as_mut()?;
    match split.next_segment().await {
        Ok(Some(bytes)) => {
            let decoded = String::from_utf8_lossy(&bytes);
            let line: &str = &decoded;
            Some(line.strip_suffix('\r').unwrap_or(line).to_string())
        }
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "failed to read process output");
            None
        }
    }
}

/// Inactivity monitor worker: reports the idle time once it exceeds `limit`.
async fn watch_inactivity(
    clock: Arc<ActivityClock>,
    limit: Duration,
    poll: Duration,
    idle_tx: oneshot::Sender<Duration>,
) {
    let mut ticker = interval_at(deadline_after(Instant::now(), poll), poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let idle = clock.idle_for();
        if idle > limit {
            // The receiver is only gone once `run` has left its `select!`.
            idle_tx.send(idle).ok();
            return;
        }
    }
}

/// `start + limit`, or a point decades away when that is unrepresentable.
fn deadline_after(start: Instant, limit: Duration) -> Instant {
    start
        .checked_add(limit)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Join every worker, re-raising panics. Cancelled workers are expected.
async fn drain(workers: &mut JoinSet<()>) {
    while let Some(joined) = workers.join_next().await {
        if let Err(err) = joined
            && err.is_panic()
        {
            std::panic::resume_unwind(err.into_panic());
        }
    }
}

/// Forcibly kill and reap. Killing an already-exited child is harmless.
async fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill().await {
        warn!(program = %program, error = %e, "failed to kill process");
    }
}

fn exit_code(status: ExitStatus) -> i32 {
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

    // Keep clear of the timeout sentinel.
    128
}
