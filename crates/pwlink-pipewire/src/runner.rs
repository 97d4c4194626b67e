//! Execution of external commands.
//!
//! Everything that talks to `pw-link` goes through [`CommandRunner`], so the
//! graph queries can be driven by canned output in tests.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{PwError, PwResult};

/// How often a child is polled while a timeout is running.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    #[must_use]
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self { stdout: stdout.into(), stderr: String::new(), status: Some(0) }
    }
}

/// Runs an argument vector whose first element is the program.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `argv` to completion.
    ///
    /// # Errors
    /// Returns an error if the program cannot be started, times out, or
    /// exits with a non-zero status.
    fn run(&self, argv: &[String]) -> PwResult<CommandOutput>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Kill the child after this long, wait forever if `None`
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Runner that waits for commands indefinitely.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that kills commands still running after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout: Some(timeout) }
    }

    /// Configured timeout, `None` when commands may run forever.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String]) -> PwResult<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| PwError::SpawnFailed("empty command line".to_string()))?;
        let command = argv.join(" ");
        debug!(%command, "Running command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PwError::SpawnFailed(format!("{program}: {e}")))?;

        // Drain both pipes while waiting so a chatty child can't block on a full pipe.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout, &command)?,
            None => child.wait().map_err(|e| PwError::SpawnFailed(format!("{program}: {e}")))?,
        };

        let stdout = collect(stdout, &command, "stdout")?;
        let stderr = collect(stderr, &command, "stderr")?;

        if !status.success() {
            warn!(%command, status = ?status.code(), stderr = %stderr.trim(), "Command failed");
            return Err(PwError::CommandFailed {
                command,
                status: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr, status: status.code() })
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Join a drain thread. A failed read is an error so that truncated output
/// is never parsed as a complete listing.
fn collect(
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
    command: &str,
    stream: &'static str,
) -> PwResult<String> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let read_failed = |reason: String| {
        debug!(command, stream, %reason, "Reading command output failed");
        PwError::ReadFailed { command: command.to_string(), stream, reason }
    };

    let bytes = handle
        .join()
        .map_err(|_| read_failed("reader thread panicked".to_string()))?
        .map_err(|e| read_failed(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn wait_with_timeout(child: &mut Child, timeout: Duration, command: &str) -> PwResult<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        let polled =
            child.try_wait().map_err(|e| PwError::SpawnFailed(format!("{command}: {e}")))?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(command, ?timeout, "Command timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(PwError::Timeout { command: command.to_string(), timeout });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_captures_stdout() {
        let output =
            ProcessRunner::new().run(&argv(&["sh", "-c", "echo '  83 dev:playback_FL'"])).unwrap();

        assert_eq!(output.stdout, "  83 dev:playback_FL\n");
        assert_eq!(output.status, Some(0));
    }

    #[test]
    fn test_non_zero_exit_is_an_error() {
        let script = "echo 'failed to link ports' >&2; exit 1";
        let result = ProcessRunner::new().run(&argv(&["sh", "-c", script]));

        assert_matches!(
            result,
            Err(PwError::CommandFailed { status: Some(1), ref stderr, .. })
                if stderr == "failed to link ports"
        );
    }

    #[test]
    fn test_missing_program() {
        let result = ProcessRunner::new().run(&argv(&["/nonexistent/pw-link", "--input"]));

        assert_matches!(result, Err(PwError::SpawnFailed(_)));
    }

    #[test]
    fn test_empty_argv() {
        assert_matches!(ProcessRunner::new().run(&[]), Err(PwError::SpawnFailed(_)));
    }

    #[test]
    fn test_timeout_kills_child() {
        let runner = ProcessRunner::with_timeout(Duration::from_millis(100));
        let started = Instant::now();

        let result = runner.run(&argv(&["sleep", "5"]));

        assert_matches!(result, Err(PwError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_not_hit() {
        let runner = ProcessRunner::with_timeout(Duration::from_secs(5));
        assert_eq!(runner.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(ProcessRunner::new().timeout(), None);

        let output = runner.run(&argv(&["sh", "-c", "printf ok"])).unwrap();

        assert_eq!(output.stdout, "ok");
    }

    #[test]
    fn test_failed_read_is_not_truncated_output() {
        let handle =
            thread::spawn(|| -> io::Result<Vec<u8>> { Err(io::Error::other("connection reset")) });

        let result = collect(Some(handle), "pw-link --links --id", "stdout");

        assert_matches!(
            result,
            Err(PwError::ReadFailed { stream: "stdout", ref reason, .. })
                if reason == "connection reset"
        );
    }

    #[test]
    fn test_collect_without_pipe() {
        assert_eq!(collect(None, "pw-link", "stderr").unwrap(), "");
    }
}
