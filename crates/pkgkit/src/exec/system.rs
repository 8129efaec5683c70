//! Real process executor using `std::process::Command`.

use crate::error::{Error, Result};
use crate::exec::Executor;
use crate::types::CommandLine;
use declarative::ActionOutcome;
use std::io::{self, Read};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between exit checks while a timeout is armed
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executor that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor {
    /// Kill commands that run longer than this; `None` waits forever
    timeout: Option<Duration>,
}

impl SystemExecutor {
    /// Create an executor without a timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor with an optional timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn spawn(&self, command: &CommandLine) -> Result<Child> {
        Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(command, e))
    }

    /// Wait for the child, killing it once `timeout` elapses.
    fn wait_with_timeout(
        &self,
        command: &CommandLine,
        mut child: Child,
        timeout: Duration,
    ) -> Result<Output> {
        let stdout = child.stdout.take().map(|mut out| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = out.read_to_end(&mut buffer);
                buffer
            })
        });
        let stderr = child.stderr.take().map(|mut err| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = err.read_to_end(&mut buffer);
                buffer
            })
        });

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| Error::io(command.to_string(), e))?
            {
                break status;
            }

            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    command: command.to_string(),
                    timeout,
                });
            }

            thread::sleep(POLL_INTERVAL);
        };

        Ok(Output {
            status,
            stdout: stdout
                .and_then(|h| h.join().ok())
                .unwrap_or_default(),
            stderr: stderr
                .and_then(|h| h.join().ok())
                .unwrap_or_default(),
        })
    }
}

impl Executor for SystemExecutor {
    fn run(&self, command: &CommandLine, fail_on_nonzero: bool) -> Result<ActionOutcome> {
        log::debug!("running: {command}");

        let child = self.spawn(command)?;
        let output = match self.timeout {
            Some(timeout) => self.wait_with_timeout(command, child, timeout)?,
            None => child
                .wait_with_output()
                .map_err(|e| Error::io(command.to_string(), e))?,
        };

        // Killed by a signal: no exit code
        let rc = output.status.code().unwrap_or(-1);
        let outcome = ActionOutcome::new(
            rc,
            String::from_utf8_lossy(&output.stdout).trim(),
            String::from_utf8_lossy(&output.stderr).trim(),
        );
        log::debug!("rc={rc}: {command}");

        if fail_on_nonzero && !outcome.is_success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                rc,
                stderr: outcome.stderr,
            });
        }

        Ok(outcome)
    }
}

fn spawn_error(command: &CommandLine, source: io::Error) -> Error {
    if source.kind() == io::ErrorKind::NotFound {
        Error::ToolMissing {
            program: command.program.clone(),
        }
    } else {
        Error::io(command.to_string(), source)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLine {
        CommandLine::new("sh").args(["-c", script])
    }

    #[test]
    fn test_captures_output_and_rc() {
        let outcome = SystemExecutor::new()
            .run(&sh("echo out; echo err >&2; exit 3"), false)
            .unwrap();
        assert_eq!(outcome.rc, 3);
        assert_eq!(outcome.stdout, "out");
        assert_eq!(outcome.stderr, "err");
    }

    #[test]
    fn test_fail_on_nonzero() {
        let err = SystemExecutor::new().run(&sh("exit 2"), true).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { rc: 2, .. }));
    }

    #[test]
    fn test_missing_program() {
        let err = SystemExecutor::new()
            .run(&CommandLine::new("definitely-not-a-real-tool-4711"), false)
            .unwrap_err();
        assert!(matches!(err, Error::ToolMissing { .. }));
    }

    #[test]
    fn test_timeout_kills_command() {
        let executor = SystemExecutor::with_timeout(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = executor.run(&sh("sleep 5"), false).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_not_reached() {
        let executor = SystemExecutor::with_timeout(Some(Duration::from_secs(5)));
        let outcome = executor.run(&sh("echo fast"), false).unwrap();
        assert_eq!(outcome.rc, 0);
        assert_eq!(outcome.stdout, "fast");
    }
}
