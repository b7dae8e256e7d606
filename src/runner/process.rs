//! Subprocess execution with a deadline, bounded output capture and
//! graceful-then-forceful termination.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Time between the terminate signal and the kill signal.
pub const KILL_GRACE: Duration = Duration::from_millis(1500);

/// How long to wait for the output pipes to drain once the process is gone.
const IO_CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

const READ_CHUNK: usize = 8192;

/// What to run and under which limits.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Cap on each of stdout and stderr.
    pub max_buffer_bytes: usize,
}

impl ProcessRequest {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
            timeout: None,
            max_buffer_bytes: usize::MAX,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_buffer_bytes(mut self, max: usize) -> Self {
        self.max_buffer_bytes = max;
        self
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The deadline fired, whether or not the process then exited by itself.
    pub timed_out: bool,
    pub cancelled: bool,
    /// At least one stream hit the buffer cap.
    pub truncated: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Child,
    /// Process group ID saved at spawn time so we can signal the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child,
            #[cfg(unix)]
            pgid,
        }
    }

    /// Ask the process group to exit.
    fn terminate(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGTERM) };
            return;
        }
        let _ = self.child.start_kill();
    }

    /// Kill the process group outright.
    fn kill(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        let _ = self.child.start_kill();
    }

    async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Terminate, then kill if the process outlives the grace period.
    async fn shut_down(&mut self) -> std::io::Result<ExitStatus> {
        self.terminate();
        match tokio::time::timeout(KILL_GRACE, self.child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!("process ignored terminate signal; killing");
                self.kill();
                self.child.wait().await
            }
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Framework workers share the group and would otherwise outlive the run.
        self.kill();
    }
}

enum Outcome {
    Exited(Option<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Run a process to completion, the deadline, or cancellation.
///
/// Only a failure to start the process is an error. Everything after that,
/// including timeouts and cancellation, is reported in [`ProcessOutput`].
pub async fn run(request: &ProcessRequest, cancel: &CancellationToken) -> Result<ProcessOutput> {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args)
        .envs(request.env.iter().map(|(k, v)| (k, v)))
        .current_dir(&request.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Own process group, so signals reach the workers the framework forks.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.as_std_mut().process_group(0);
    }

    tracing::debug!(command = %request.display(), cwd = %request.cwd.display(), "spawning");

    let mut child = cmd.spawn().map_err(|source| Error::Spawn {
        command: request.program.clone(),
        source,
    })?;

    let stdout_task = child
        .stdout
        .take()
        .map(|s| tokio::spawn(read_bounded(s, request.max_buffer_bytes)));
    let stderr_task = child
        .stderr
        .take()
        .map(|s| tokio::spawn(read_bounded(s, request.max_buffer_bytes)));

    let mut guard = ChildGuard::new(child);

    let deadline = async {
        match request.timeout {
            Some(t) => tokio::time::sleep(t).await,
            None => std::future::pending().await,
        }
    };

    let outcome = tokio::select! {
        status = guard.wait() => match status {
            Ok(status) => Outcome::Exited(Some(status)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to wait for process");
                Outcome::Exited(None)
            }
        },
        () = deadline => Outcome::TimedOut,
        () = cancel.cancelled() => Outcome::Cancelled,
    };

    let mut output = ProcessOutput::default();
    let status = match outcome {
        Outcome::Exited(status) => status,
        Outcome::TimedOut => {
            tracing::warn!(timeout = ?request.timeout, "process timed out; terminating");
            output.timed_out = true;
            guard.shut_down().await.ok()
        }
        Outcome::Cancelled => {
            tracing::info!("run cancelled; terminating process");
            output.cancelled = true;
            guard.shut_down().await.ok()
        }
    };
    output.exit_code = status.and_then(|s| s.code());

    // Reap anything left in the group so the pipes close.
    drop(guard);

    let (stdout, stdout_truncated) = collect(stdout_task).await;
    let (stderr, stderr_truncated) = collect(stderr_task).await;
    output.stdout = String::from_utf8_lossy(&stdout).into_owned();
    output.stderr = String::from_utf8_lossy(&stderr).into_owned();
    output.truncated = stdout_truncated || stderr_truncated;

    Ok(output)
}

async fn collect(task: Option<JoinHandle<std::io::Result<(Vec<u8>, bool)>>>) -> (Vec<u8>, bool) {
    let Some(task) = task else {
        return (Vec::new(), false);
    };
    match tokio::time::timeout(IO_CAPTURE_TIMEOUT, task).await {
        Ok(Ok(Ok(captured))) => captured,
        Ok(Ok(Err(e))) => {
            tracing::warn!(error = %e, "output capture failed");
            (Vec::new(), false)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "output capture task panicked");
            (Vec::new(), false)
        }
        Err(_) => {
            tracing::warn!("output capture timed out");
            (Vec::new(), false)
        }
    }
}

/// Read a stream to EOF, keeping at most `max_bytes`. The rest is drained and dropped.
async fn read_bounded<R: AsyncRead + Unpin>(
    mut reader: R,
    max_bytes: usize,
) -> std::io::Result<(Vec<u8>, bool)> {
    let mut buf = Vec::with_capacity(READ_CHUNK.min(max_bytes));
    let mut chunk = [0u8; READ_CHUNK];
    let mut truncated = false;

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        let remaining = max_bytes.saturating_sub(buf.len());
        let take = n.min(remaining);
        buf.extend_from_slice(&chunk[..take]);
        if take < n && !truncated {
            tracing::warn!(max_bytes, "output exceeded limit, truncating");
            truncated = true;
        }
    }

    Ok((buf, truncated))
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
