//! Command execution abstraction.
//!
//! The [`Executor`] trait is the only way this crate touches the host,
//! allowing for different implementations (real processes, mock for testing).
//!
//! # Testing
//!
//! Use [`MockExecutor`] to script outcomes and inspect the command log:
//!
//! ```
//! use pkgkit::exec::{Executor, MockExecutor};
//! use pkgkit::CommandLine;
//!
//! let mock = MockExecutor::new();
//! mock.respond("rpm -e TIVsm-BA", 0, "", "");
//!
//! let outcome = mock.run(&CommandLine::new("rpm").args(["-e", "TIVsm-BA"]), false).unwrap();
//! assert_eq!(outcome.rc, 0);
//! assert_eq!(mock.commands(), vec!["rpm -e TIVsm-BA".to_string()]);
//! ```

pub mod system;

pub use system::SystemExecutor;

use crate::error::{Error, Result};
use crate::types::CommandLine;
use declarative::ActionOutcome;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Exit code a shell reports for a command it cannot find.
pub const RC_NOT_FOUND: i32 = 127;

/// Runs native commands synchronously.
pub trait Executor {
    /// Run a command to completion and capture its output.
    ///
    /// A nonzero exit is returned as a normal outcome unless
    /// `fail_on_nonzero` is set, in which case it becomes
    /// [`Error::CommandFailed`].
    fn run(&self, command: &CommandLine, fail_on_nonzero: bool) -> Result<ActionOutcome>;

    /// Locate an executable on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Run a command, folding a missing executable into an rc 127 outcome.
///
/// Lifecycle actions use this so that, for example, `rpm -e` on a Debian
/// host counts as a failed attempt and the next tool is tried.
pub fn run_lenient(executor: &dyn Executor, command: &CommandLine) -> Result<ActionOutcome> {
    match executor.run(command, false) {
        Err(err @ Error::ToolMissing { .. }) => {
            log::debug!("{err}");
            Ok(ActionOutcome::new(RC_NOT_FOUND, "", err.to_string()))
        }
        other => other,
    }
}

/// Scripted response for a [`MockExecutor`] command.
#[derive(Debug, Clone)]
enum MockResponse {
    Outcome(ActionOutcome),
    Missing,
    Timeout,
}

/// Mock executor for testing without touching the host.
///
/// Responses are keyed by the rendered command line. Unscripted commands
/// exit with rc 1 and empty output. Every command is recorded in order.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    executables: Arc<Mutex<HashMap<String, PathBuf>>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockExecutor {
    /// Create a new empty mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of a command line.
    pub fn respond(&self, command: &str, rc: i32, stdout: &str, stderr: &str) {
        self.script(command, MockResponse::Outcome(ActionOutcome::new(rc, stdout, stderr)));
    }

    /// Make a command line fail as if its program did not exist.
    pub fn missing(&self, command: &str) {
        self.script(command, MockResponse::Missing);
    }

    /// Make a command line fail with a timeout.
    pub fn time_out(&self, command: &str) {
        self.script(command, MockResponse::Timeout);
    }

    /// Make an executable discoverable through [`Executor::locate`].
    pub fn add_executable(&self, program: &str, path: impl Into<PathBuf>) {
        let mut executables = self.executables.lock().unwrap();
        executables.insert(program.to_string(), path.into());
    }

    /// Commands run so far, rendered, in order.
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn script(&self, command: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(command.to_string(), response);
    }
}

impl Executor for MockExecutor {
    fn run(&self, command: &CommandLine, fail_on_nonzero: bool) -> Result<ActionOutcome> {
        let rendered = command.to_string();
        self.log.lock().unwrap().push(rendered.clone());

        let response = self.responses.lock().unwrap().get(&rendered).cloned();
        let outcome = match response {
            Some(MockResponse::Outcome(outcome)) => outcome,
            Some(MockResponse::Missing) => {
                return Err(Error::ToolMissing {
                    program: command.program.clone(),
                });
            }
            Some(MockResponse::Timeout) => {
                return Err(Error::Timeout {
                    command: rendered,
                    timeout: Duration::from_secs(1),
                });
            }
            None => ActionOutcome::new(1, "", ""),
        };

        if fail_on_nonzero && !outcome.is_success() {
            return Err(Error::CommandFailed {
                command: rendered,
                rc: outcome.rc,
                stderr: outcome.stderr,
            });
        }
        Ok(outcome)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.executables.lock().unwrap().get(program).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_unscripted_command_fails() {
        let mock = MockExecutor::new();
        let outcome = mock.run(&CommandLine::new("dpkg").args(["-r", "x"]), false).unwrap();
        assert_eq!(outcome.rc, 1);
        assert_eq!(mock.commands(), vec!["dpkg -r x".to_string()]);
    }

    #[test]
    fn test_mock_fail_on_nonzero() {
        let mock = MockExecutor::new();
        mock.respond("rpm -Uvh a.rpm", 3, "", "conflict");
        let err = mock
            .run(&CommandLine::new("rpm").args(["-Uvh", "a.rpm"]), true)
            .unwrap_err();
        match err {
            Error::CommandFailed { rc, stderr, .. } => {
                assert_eq!(rc, 3);
                assert_eq!(stderr, "conflict");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mock_locate() {
        let mock = MockExecutor::new();
        assert!(mock.locate("dsmc.exe").is_none());
        mock.add_executable("dsmc.exe", r"C:\TSM\baclient\dsmc.exe");
        assert_eq!(
            mock.locate("dsmc.exe"),
            Some(PathBuf::from(r"C:\TSM\baclient\dsmc.exe"))
        );
    }

    #[test]
    fn test_run_lenient_folds_missing_tool() {
        let mock = MockExecutor::new();
        mock.missing("rpm -e TIVsm-BA");
        let outcome =
            run_lenient(&mock, &CommandLine::new("rpm").args(["-e", "TIVsm-BA"])).unwrap();
        assert_eq!(outcome.rc, RC_NOT_FOUND);
        assert_eq!(outcome.stderr, "rpm: command not found");
    }

    #[test]
    fn test_run_lenient_keeps_timeouts() {
        let mock = MockExecutor::new();
        mock.time_out("dpkg -i a.deb");
        let result = run_lenient(&mock, &CommandLine::new("dpkg").args(["-i", "a.deb"]));
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }
}
