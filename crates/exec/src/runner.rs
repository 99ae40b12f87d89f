use std::{
    convert::Infallible,
    fmt,
    io::{self, BufRead, BufReader, PipeReader, Write},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use hypersect_core::Model;

use crate::CommandInvocation;

/// Status reported whenever the command did not exit on its own.
pub const FAILED_STATUS: i32 = -1;

/// How often a command is polled after its output closes under a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a command run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The command exited with a status code.
    Exited,

    /// The command was terminated by a signal.
    Signaled,

    /// The deadline passed first; the command was killed.
    TimedOut,

    /// The command could not be started.
    SpawnFailed,

    /// The command started but its status could not be collected.
    WaitFailed,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exited => "exited",
            Self::Signaled => "was killed by a signal",
            Self::TimedOut => "timed out",
            Self::SpawnFailed => "could not be started",
            Self::WaitFailed => "could not be waited on",
        })
    }
}

/// Status and merged output of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code, or [`FAILED_STATUS`] if the command did not exit normally.
    pub status: i32,

    /// How the run ended.
    pub termination: Termination,

    /// Stdout and stderr lines in the order the command wrote them.
    pub lines: Vec<String>,
}

impl ProcessResult {
    /// Returns true if the command exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.termination == Termination::Exited && self.status == 0
    }

    fn exited(status: ExitStatus, lines: Vec<String>) -> Self {
        match status.code() {
            Some(code) => Self {
                status: code,
                termination: Termination::Exited,
                lines,
            },
            None => Self::failed(Termination::Signaled, lines),
        }
    }

    fn failed(termination: Termination, lines: Vec<String>) -> Self {
        Self {
            status: FAILED_STATUS,
            termination,
            lines,
        }
    }
}

/// Runs commands with merged output and an optional deadline.
///
/// Without a timeout, [`ProcessRunner::run`] blocks until the command exits.
/// With one, the command is killed once the deadline passes and whatever
/// output it produced so far is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    progress: bool,
}

impl ProcessRunner {
    /// Creates a runner with no timeout and no progress output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-run deadline. A zero duration disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Writes one `.` to stderr per output line while waiting.
    ///
    /// Only applies to runs without a timeout.
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the per-run deadline, if one is set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs `invocation` to completion or until the deadline.
    ///
    /// Never fails: spawn errors, signals and timeouts are all reported
    /// through [`ProcessResult::termination`] with status [`FAILED_STATUS`].
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn run(&self, invocation: &CommandInvocation) -> ProcessResult {
        let owns_group = self.timeout.is_some();
        let (mut child, output) = match spawn(invocation, owns_group) {
            Ok(spawned) => spawned,
            Err(error) => {
                warn!(command = %invocation, %error, "failed to start command");
                let line = format!("failed to run `{invocation}`: {error}");
                return ProcessResult::failed(Termination::SpawnFailed, vec![line]);
            }
        };
        debug!(command = %invocation, pid = child.id(), "started command");

        let deadline = self
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        let progress = self.progress && self.timeout.is_none();

        let mut lines = Vec::new();
        loop {
            let received = match deadline {
                Some(deadline) => output.recv_deadline(deadline),
                None => output.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(line) => {
                    if progress {
                        progress_dot();
                    }
                    lines.push(line);
                }
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    return self.abandon(&mut child, owns_group, invocation, lines);
                }
            }
        }
        if progress && !lines.is_empty() {
            eprintln!();
        }

        match wait_until(&mut child, deadline) {
            Ok(Some(status)) => ProcessResult::exited(status, lines),
            Ok(None) => self.abandon(&mut child, owns_group, invocation, lines),
            Err(error) => {
                warn!(command = %invocation, %error, "failed to wait for command");
                kill(&mut child, owns_group);
                lines.push(format!("failed to wait for `{invocation}`: {error}"));
                ProcessResult::failed(Termination::WaitFailed, lines)
            }
        }
    }

    /// Kills a command that outlived the deadline and keeps its partial output.
    fn abandon(
        &self,
        child: &mut Child,
        owns_group: bool,
        invocation: &CommandInvocation,
        lines: Vec<String>,
    ) -> ProcessResult {
        warn!(
            command = %invocation,
            timeout = ?self.timeout,
            captured = lines.len(),
            "command timed out; killing it"
        );
        kill(child, owns_group);
        ProcessResult::failed(Termination::TimedOut, lines)
    }
}

impl Model for ProcessRunner {
    type Input = CommandInvocation;
    type Output = ProcessResult;
    type Error = Infallible;

    fn call(&self, input: &CommandInvocation) -> Result<ProcessResult, Self::Error> {
        Ok(self.run(input))
    }
}

/// Starts the command with stdout and stderr sharing one pipe.
///
/// Returns the child and a channel carrying its output lines. The channel
/// disconnects once every holder of the pipe's write end has closed it.
///
/// With `own_group` set on Unix, the child leads a new process group so that
/// everything it starts can be killed together.
fn spawn(invocation: &CommandInvocation, own_group: bool) -> io::Result<(Child, Receiver<String>)> {
    let (reader, writer) = io::pipe()?;

    let mut command = Command::new(invocation.program());
    command
        .args(invocation.args())
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    #[cfg(unix)]
    if own_group {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    let spawned = command.spawn();

    // `command` holds copies of the write end; the reader only sees EOF once
    // they are closed.
    drop(command);
    let mut child = spawned?;

    let (sender, receiver) = crossbeam_channel::unbounded();
    let forwarder = thread::Builder::new()
        .name("hypersect-output".into())
        .spawn(move || forward_lines(reader, &sender));
    if let Err(error) = forwarder {
        kill(&mut child, own_group);
        return Err(error);
    }

    Ok((child, receiver))
}

/// Sends each line read from `reader` until EOF or the receiver goes away.
fn forward_lines(reader: PipeReader, sender: &Sender<String>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_owned();
                if sender.send(line).is_err() {
                    break;
                }
            }
            Err(error) => {
                debug!(%error, "stopped reading command output");
                break;
            }
        }
    }
}

/// Waits for the child to exit, giving up at `deadline` with `Ok(None)`.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return child.wait().map(Some);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Kills and reaps the child, and its whole process group if it leads one.
///
/// Errors mean the processes already exited.
fn kill(child: &mut Child, group: bool) {
    if group {
        kill_group(child);
    }
    if let Err(error) = child.kill() {
        debug!(%error, "kill failed");
    }
    if let Err(error) = child.wait() {
        debug!(%error, "reaping killed command failed");
    }
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    // The shell builtin is always present, unlike a standalone `kill`.
    let killed = Command::new("sh")
        .args(["-c", "kill -KILL -\"$1\"", "sh", &child.id().to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match killed {
        Ok(status) if status.success() => {}
        Ok(status) => debug!(group = child.id(), %status, "kill of process group failed"),
        Err(error) => debug!(group = child.id(), %error, "could not run kill for process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

fn progress_dot() {
    let mut stderr = io::stderr().lock();
    // Progress dots are cosmetic; a closed stderr must not fail the run.
    let _ = stderr.write_all(b".");
    let _ = stderr.flush();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandInvocation {
        CommandInvocation::new("sh", ["-c", script])
    }

    #[test]
    fn captures_output_and_status() {
        let result = ProcessRunner::new().run(&sh("echo hello; echo world"));

        assert!(result.success());
        assert_eq!(result.status, 0);
        assert_eq!(result.lines, ["hello", "world"]);
    }

    #[test]
    fn merges_streams_in_emission_order() {
        let result = ProcessRunner::new().run(&sh("echo one; echo two >&2; echo three; echo four >&2"));

        assert_eq!(result.lines, ["one", "two", "three", "four"]);
    }

    #[test]
    fn keeps_last_line_without_newline() {
        let result = ProcessRunner::new().run(&sh("printf 'a\\nb'"));

        assert_eq!(result.lines, ["a", "b"]);
    }

    #[test]
    fn reports_nonzero_exit_status() {
        let result = ProcessRunner::new().run(&sh("echo failing; exit 3"));

        assert!(!result.success());
        assert_eq!(result.status, 3);
        assert_eq!(result.termination, Termination::Exited);
        assert_eq!(result.lines, ["failing"]);
    }

    #[test]
    fn reports_signal_as_failed_status() {
        let result = ProcessRunner::new().run(&sh("kill -9 $$"));

        assert_eq!(result.status, FAILED_STATUS);
        assert_eq!(result.termination, Termination::Signaled);
    }

    #[test]
    fn spawn_failure_is_a_single_diagnostic_line() {
        let invocation = CommandInvocation::new("/nonexistent/hypersect-missing", ["%"]);

        let result = ProcessRunner::new().run(&invocation);

        assert_eq!(result.status, FAILED_STATUS);
        assert_eq!(result.termination, Termination::SpawnFailed);
        assert_eq!(result.lines.len(), 1);
        assert!(result.lines[0].contains("/nonexistent/hypersect-missing"));
    }

    #[test]
    fn deadline_kills_slow_command() {
        let runner = ProcessRunner::new().with_timeout(Duration::from_millis(200));
        let invocation = CommandInvocation::new("sleep", ["5"]);

        let started = Instant::now();
        let result = runner.run(&invocation);

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(result.status, FAILED_STATUS);
        assert_eq!(result.termination, Termination::TimedOut);
        assert!(result.lines.is_empty());
    }

    #[test]
    fn timeout_keeps_partial_output() {
        let runner = ProcessRunner::new().with_timeout(Duration::from_millis(300));

        let started = Instant::now();
        let result = runner.run(&sh("echo started; exec sleep 5"));

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(result.termination, Termination::TimedOut);
        assert_eq!(result.lines, ["started"]);
    }

    #[test]
    fn timeout_applies_after_output_closes() {
        // Closing both streams early must not let the command outlive the deadline.
        let runner = ProcessRunner::new().with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let result = runner.run(&sh("exec >/dev/null 2>&1; sleep 5"));

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(result.termination, Termination::TimedOut);
    }

    #[test]
    fn timeout_kills_whole_process_group() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late");
        let marker_arg = marker.to_string_lossy().into_owned();
        let invocation = CommandInvocation::new(
            "sh",
            ["-c", "(sleep 1; touch \"$1\") & wait", "sh", marker_arg.as_str()],
        );
        let runner = ProcessRunner::new().with_timeout(Duration::from_millis(200));

        let result = runner.run(&invocation);
        assert_eq!(result.termination, Termination::TimedOut);

        // The background subshell would have created the marker by now.
        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists());
    }

    #[test]
    fn unrepresentable_timeout_means_no_deadline() {
        let runner = ProcessRunner::new().with_timeout(Duration::MAX);

        let result = runner.run(&sh("echo fine"));

        assert!(result.success());
        assert_eq!(result.lines, ["fine"]);
    }

    #[test]
    fn fast_command_finishes_before_deadline() {
        let runner = ProcessRunner::new().with_timeout(Duration::from_secs(10));

        let result = runner.run(&sh("echo done"));

        assert!(result.success());
        assert_eq!(result.lines, ["done"]);
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        let runner = ProcessRunner::new().with_timeout(Duration::ZERO);

        assert_eq!(runner.timeout(), None);
    }

    #[test]
    fn runner_is_a_model() {
        let output = ProcessRunner::new().call(&sh("echo via model")).unwrap();

        assert_eq!(output.lines, ["via model"]);
    }
}
