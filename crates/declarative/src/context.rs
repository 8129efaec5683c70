//! Per-run context passed to the reconciler

use crate::types::DesiredState;

/// What the caller declared for this run
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    /// Desired state
    pub state: DesiredState,
    /// Install, upgrade or patch artifact; required only when such an
    /// action actually executes
    pub artifact: Option<String>,
}

impl Declaration {
    /// Create a declaration without an artifact
    pub fn new(state: DesiredState) -> Self {
        Self {
            state,
            artifact: None,
        }
    }

    /// Attach an artifact path
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }
}

/// Context for one reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyContext {
    /// Report what would change without running any lifecycle action
    pub check_mode: bool,
}

impl ApplyContext {
    /// Create a new apply context
    pub fn new(check_mode: bool) -> Self {
        Self { check_mode }
    }
}
