//! Terminal failures of a reconciliation run

use crate::types::{ActionOutcome, FailureKind};
use thiserror::Error;

/// Errors that end a reconciliation run
///
/// None of these are retried. Each carries the best available
/// return code and output for the caller-facing failure record.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Transition impossible from the observed state, or a required
    /// input is missing; no action ran
    #[error("{message}")]
    Precondition { message: String },

    /// The lifecycle action ran (or refused to) and returned nonzero
    #[error("{message}")]
    ActionFailed {
        message: String,
        outcome: ActionOutcome,
    },

    /// Installed state could not be determined
    #[error("{message}: {detail}")]
    Probe { message: String, detail: String },

    /// The lifecycle action could not be run at all
    #[error("{message}: {detail}")]
    Execution { message: String, detail: String },
}

impl ReconcileError {
    /// Failure category for reporting
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Precondition { .. } => FailureKind::Precondition,
            Self::ActionFailed { outcome, .. } => {
                outcome.rejection.unwrap_or(FailureKind::Execution)
            }
            Self::Probe { .. } => FailureKind::Probe,
            Self::Execution { .. } => FailureKind::Execution,
        }
    }

    /// Summary message without the detail suffix
    pub fn message(&self) -> &str {
        match self {
            Self::Precondition { message }
            | Self::ActionFailed { message, .. }
            | Self::Probe { message, .. }
            | Self::Execution { message, .. } => message,
        }
    }

    /// Outcome of the failed action, when one ran
    pub fn outcome(&self) -> Option<&ActionOutcome> {
        match self {
            Self::ActionFailed { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_rejection() {
        let err = ReconcileError::ActionFailed {
            message: "Uninstall failed".to_string(),
            outcome: ActionOutcome::rejected(FailureKind::NotFound, "not found"),
        };
        assert_eq!(err.kind(), FailureKind::NotFound);

        let err = ReconcileError::ActionFailed {
            message: "Installation failed".to_string(),
            outcome: ActionOutcome::new(2, "", "error: dependency"),
        };
        assert_eq!(err.kind(), FailureKind::Execution);
        assert_eq!(err.outcome().map(|o| o.rc), Some(2));
    }

    #[test]
    fn test_display_includes_detail() {
        let err = ReconcileError::Probe {
            message: "Could not detect BA Client".to_string(),
            detail: "dsmc: timed out".to_string(),
        };
        assert_eq!(err.to_string(), "Could not detect BA Client: dsmc: timed out");
        assert_eq!(err.message(), "Could not detect BA Client");
        assert!(err.outcome().is_none());
    }
}
