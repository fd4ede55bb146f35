//! Child-process execution with a hard wall-clock bound
//!
//! The interpreter is a black box: we spawn it, drain both output pipes on
//! helper threads so it can never block on a full pipe, and poll for exit
//! until the deadline. A child still running at the deadline is killed and
//! its output discarded.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Poll interval while waiting for the child
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Failure to run the child at all
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

/// What the child did
#[derive(Debug, Clone)]
pub struct ChildOutput {
    /// Exit code; `None` when killed by a signal or timed out
    pub code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ChildOutput {
    fn deadline_passed() -> Self {
        Self {
            code: None,
            timed_out: true,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }
}

/// Run `cmd` to completion, killing it after `timeout`
///
/// The bound covers both the child's exit and the draining of its pipes, so
/// a descendant that keeps stdout or stderr open cannot stretch the run.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<ChildOutput, RunError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let deadline = Instant::now().checked_add(timeout);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
        program: program.clone(),
        source,
    })?;

    let (tx, rx) = mpsc::channel();
    let mut pending = 0;
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(Stream::Stdout, stdout, tx.clone());
        pending += 1;
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(Stream::Stderr, stderr, tx.clone());
        pending += 1;
    }
    drop(tx);

    let status = wait_with_deadline(&mut child, deadline).map_err(|source| RunError::Wait {
        program: program.clone(),
        source,
    })?;

    // Readers finish on their own once every holder of the pipes exits.
    let Some(status) = status else {
        return Ok(ChildOutput::deadline_passed());
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    while pending > 0 {
        let received = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((Stream::Stdout, bytes)) => stdout = bytes,
            Ok((Stream::Stderr, bytes)) => stderr = bytes,
            Err(RecvTimeoutError::Timeout) => return Ok(ChildOutput::deadline_passed()),
            Err(RecvTimeoutError::Disconnected) => break,
        }
        pending -= 1;
    }

    Ok(ChildOutput {
        code: status.code(),
        timed_out: false,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn spawn_reader<R: Read + Send + 'static>(
    stream: Stream,
    mut reader: R,
    tx: Sender<(Stream, Vec<u8>)>,
) {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
}

/// Exit status, or `None` when the child was killed at the deadline
fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Instant>,
) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
