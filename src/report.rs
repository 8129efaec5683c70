//! Caller-facing run report

use crate::cli::OutputFormat;
use crate::ui;
use anyhow::Result;
use declarative::{FailureKind, ReconcileError, ReconciliationResult};
use serde::Serialize;

/// rc reported when a probe or action could not run at all
pub const RC_NOT_RUN: i32 = 1;

/// Outcome of one apply run, as printed to the caller
///
/// Field names follow the automation result convention: `msg`, `rc`,
/// `stdout`, `stderr`, plus `failed` and `category` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub changed: bool,
    pub msg: String,
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FailureKind>,
}

impl Report {
    pub fn success(result: &ReconciliationResult) -> Self {
        let (stdout, stderr) = result
            .outcome
            .as_ref()
            .map(|o| (o.stdout.clone(), o.stderr.clone()))
            .unwrap_or_default();
        Self {
            changed: result.changed,
            msg: result.message.clone(),
            rc: result.rc(),
            stdout,
            stderr,
            failed: false,
            category: None,
        }
    }

    /// Failure record; output comes from the action when one ran
    pub fn failure(err: &ReconcileError) -> Self {
        let (rc, stdout, stderr) = match err {
            ReconcileError::ActionFailed { outcome, .. } => {
                (outcome.rc, outcome.stdout.clone(), outcome.stderr.clone())
            }
            // Nothing ran to completion, so there is no tool rc to report
            ReconcileError::Probe { detail, .. } | ReconcileError::Execution { detail, .. } => {
                (RC_NOT_RUN, String::new(), detail.clone())
            }
            ReconcileError::Precondition { .. } => (0, String::new(), String::new()),
        };
        Self {
            changed: false,
            msg: err.message().to_string(),
            rc,
            stdout,
            stderr,
            failed: true,
            category: Some(err.kind()),
        }
    }

    /// Pretty JSON record
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Print in the requested format; `quiet` keeps text to the summary line
    pub fn emit(&self, format: OutputFormat, quiet: bool) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", self.render_json()?),
            OutputFormat::Text => self.print_text(quiet),
        }
        Ok(())
    }

    fn print_text(&self, quiet: bool) {
        if self.failed {
            ui::error(&self.msg);
        } else if self.changed {
            ui::success(&self.msg);
        } else {
            ui::info(&self.msg);
        }
        if quiet {
            return;
        }
        ui::kv("changed", &self.changed.to_string());
        ui::kv("rc", &self.rc.to_string());
        if let Some(category) = self.category {
            ui::kv("category", category.description());
            ui::dim(category.advice());
        }
        ui::block("stdout", &self.stdout);
        ui::block("stderr", &self.stderr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::ActionOutcome;

    #[test]
    fn test_success_without_action() {
        let report = Report::success(&ReconciliationResult::unchanged(
            "BA Client already installed (version 8.1.20)",
        ));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["changed"], false);
        assert_eq!(json["rc"], 0);
        assert_eq!(json["stdout"], "");
        assert!(json.get("failed").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_success_carries_outcome() {
        let result = ReconciliationResult::changed(
            "BA Client installed successfully",
            ActionOutcome::new(0, "Preparing...", "warning: signature"),
        );
        let report = Report::success(&result);

        assert!(report.changed);
        assert_eq!(report.stdout, "Preparing...");
        assert_eq!(report.stderr, "warning: signature");
    }

    #[test]
    fn test_action_failure_keeps_rc() {
        let err = ReconcileError::ActionFailed {
            message: "Upgrade failed".to_string(),
            outcome: ActionOutcome::new(2, "out", "dependency problems"),
        };
        let report = Report::failure(&err);

        assert!(report.failed);
        assert!(!report.changed);
        assert_eq!(report.msg, "Upgrade failed");
        assert_eq!(report.rc, 2);
        assert_eq!(report.stderr, "dependency problems");
        assert_eq!(report.category, Some(FailureKind::Execution));
    }

    #[test]
    fn test_precondition_failure() {
        let err = ReconcileError::Precondition {
            message: "Cannot patch; BA Client not installed".to_string(),
        };
        let json = serde_json::to_value(Report::failure(&err)).unwrap();

        assert_eq!(json["failed"], true);
        assert_eq!(json["rc"], 0);
        assert_eq!(json["category"], "precondition");
        assert_eq!(json["msg"], "Cannot patch; BA Client not installed");
    }

    #[test]
    fn test_execution_failure_detail_in_stderr() {
        let err = ReconcileError::Execution {
            message: "Installation failed".to_string(),
            detail: "command timed out after 5s: rpm -Uvh a.rpm".to_string(),
        };
        let report = Report::failure(&err);

        assert_eq!(report.rc, RC_NOT_RUN);
        assert_ne!(report.rc, 0);
        assert!(report.failed);
        assert!(report.stderr.contains("timed out"));
    }

    #[test]
    fn test_probe_failure_is_nonzero() {
        let err = ReconcileError::Probe {
            message: "Could not detect BA Client".to_string(),
            detail: "rpm: command not found".to_string(),
        };
        let report = Report::failure(&err);

        assert_ne!(report.rc, 0);
        assert_eq!(report.category, Some(FailureKind::Probe));
        assert_eq!(report.stderr, "rpm: command not found");
    }
}
