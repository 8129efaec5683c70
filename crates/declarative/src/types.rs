//! Core types for declarative package lifecycle management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State the caller declares for the managed package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Installed at any version
    #[default]
    Present,
    /// Not installed
    Absent,
    /// Installed, then overwritten with a newer artifact
    Upgrade,
    /// Installed, then overwritten with a patch artifact
    Patch,
}

impl DesiredState {
    /// Lowercase name as used on the command line and in results
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Upgrade => "upgrade",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "upgrade" => Ok(Self::Upgrade),
            "patch" => Ok(Self::Patch),
            other => Err(format!(
                "invalid state '{other}' (expected present, absent, upgrade or patch)"
            )),
        }
    }
}

/// Observed installation state of the managed package
///
/// The version is an opaque string kept for reporting. It is never
/// compared; presence is the only signal decisions are made on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InstalledState {
    /// Not installed
    Absent,
    /// Installed with the given version string
    Installed { version: String },
}

impl InstalledState {
    /// Shorthand for `Installed { version }`
    pub fn installed(version: impl Into<String>) -> Self {
        Self::Installed {
            version: version.into(),
        }
    }

    /// Installed version, if any
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Installed { version } => Some(version),
            Self::Absent => None,
        }
    }
}

/// Failure taxonomy for terminal failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Host or artifact the native tooling cannot handle
    Unsupported,
    /// Requested transition is impossible from the observed state
    Precondition,
    /// Native tool ran and returned nonzero
    Execution,
    /// Uninstall target not found under any name or tool
    NotFound,
    /// Installed state could not be determined
    Probe,
}

impl FailureKind {
    /// Short user-facing description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unsupported => "Unsupported platform configuration",
            Self::Precondition => "Precondition not met",
            Self::Execution => "Native package tool failed",
            Self::NotFound => "Package not found",
            Self::Probe => "Installed state could not be determined",
        }
    }

    /// Actionable advice for resolving this kind of failure
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Unsupported => "Use an RPM or Debian based host, or an .msi installer on Windows",
            Self::Precondition => "Install the client first, or use state=present",
            Self::Execution => "Check rc, stdout and stderr of the native tool",
            Self::NotFound => "Pass the exact package name or product code",
            Self::Probe => "Check that the package tools and the client command are runnable",
        }
    }
}

/// Result of one lifecycle action: the native tool's return code and output
///
/// The return code is the only success signal; output is carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
    /// Set when the action refused to run any tool
    #[serde(skip)]
    pub rejection: Option<FailureKind>,
}

impl ActionOutcome {
    /// Outcome of a command that ran
    pub fn new(rc: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            rc,
            stdout: stdout.into(),
            stderr: stderr.into(),
            rejection: None,
        }
    }

    /// Outcome of an action that refused to run, with rc 1
    pub fn rejected(kind: FailureKind, stderr: impl Into<String>) -> Self {
        Self {
            rc: 1,
            stdout: String::new(),
            stderr: stderr.into(),
            rejection: Some(kind),
        }
    }

    /// Check if the outcome represents success
    pub fn is_success(&self) -> bool {
        self.rc == 0
    }
}

/// Caller-facing record of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub changed: bool,
    pub message: String,
    pub outcome: Option<ActionOutcome>,
}

impl ReconciliationResult {
    /// Already converged
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
            outcome: None,
        }
    }

    /// Check mode: an action would have run
    pub fn would_change(message: impl Into<String>) -> Self {
        Self {
            changed: true,
            message: message.into(),
            outcome: None,
        }
    }

    /// An action ran and succeeded
    pub fn changed(message: impl Into<String>, outcome: ActionOutcome) -> Self {
        Self {
            changed: true,
            message: message.into(),
            outcome: Some(outcome),
        }
    }

    /// Return code of the action, 0 when none ran
    pub fn rc(&self) -> i32 {
        self.outcome.as_ref().map_or(0, |o| o.rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_state_parse() {
        assert_eq!("present".parse::<DesiredState>(), Ok(DesiredState::Present));
        assert_eq!("ABSENT".parse::<DesiredState>(), Ok(DesiredState::Absent));
        assert_eq!("patch".parse::<DesiredState>(), Ok(DesiredState::Patch));
        assert!("latest".parse::<DesiredState>().is_err());
    }

    #[test]
    fn test_desired_state_default_is_present() {
        assert_eq!(DesiredState::default(), DesiredState::Present);
    }

    #[test]
    fn test_installed_state_version() {
        assert_eq!(InstalledState::Absent.version(), None);
        assert_eq!(InstalledState::installed("8.1.20").version(), Some("8.1.20"));
    }

    #[test]
    fn test_installed_state_serializes_tagged() {
        let json = serde_json::to_string(&InstalledState::installed("8.1.20")).unwrap();
        assert_eq!(json, r#"{"state":"installed","version":"8.1.20"}"#);
        let json = serde_json::to_string(&InstalledState::Absent).unwrap();
        assert_eq!(json, r#"{"state":"absent"}"#);
    }

    #[test]
    fn test_rejected_outcome() {
        let outcome = ActionOutcome::rejected(FailureKind::Unsupported, "nope");
        assert_eq!(outcome.rc, 1);
        assert!(!outcome.is_success());
        assert!(outcome.stdout.is_empty());
        assert_eq!(outcome.rejection, Some(FailureKind::Unsupported));
    }

    #[test]
    fn test_result_rc() {
        assert_eq!(ReconciliationResult::unchanged("ok").rc(), 0);
        let result = ReconciliationResult::changed("done", ActionOutcome::new(0, "out", ""));
        assert!(result.changed);
        assert_eq!(result.rc(), 0);
    }
}
