//! Transition planner - maps desired vs observed state to a decision
//!
//! | Desired | Observed absent     | Observed installed  |
//! |---------|---------------------|---------------------|
//! | present | install             | no-op               |
//! | absent  | no-op               | uninstall           |
//! | upgrade | precondition failed | install (upgrade)   |
//! | patch   | precondition failed | install (patch)     |

use crate::types::{DesiredState, InstalledState};

/// Which transition routed to the install-semantics action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallVerb {
    Install,
    Upgrade,
    Patch,
}

/// A lifecycle action the reconciler may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Install semantics, reached from three transitions
    Install(InstallVerb),
    Uninstall,
}

impl Action {
    /// Verb used in log lines and precondition messages
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Install(InstallVerb::Install) => "install",
            Self::Install(InstallVerb::Upgrade) => "upgrade",
            Self::Install(InstallVerb::Patch) => "patch",
            Self::Uninstall => "uninstall",
        }
    }

    /// Check-mode message
    pub fn would_message(&self, subject: &str) -> String {
        match self {
            Self::Install(InstallVerb::Install) => format!("{subject} would be installed"),
            Self::Install(InstallVerb::Upgrade) => format!("{subject} would be upgraded"),
            Self::Install(InstallVerb::Patch) => format!("{subject} patch would be applied"),
            Self::Uninstall => format!("{subject} would be uninstalled"),
        }
    }

    /// Message after a successful run
    pub fn success_message(&self, subject: &str) -> String {
        match self {
            Self::Install(InstallVerb::Install) => format!("{subject} installed successfully"),
            Self::Install(InstallVerb::Upgrade) => format!("{subject} upgraded successfully"),
            Self::Install(InstallVerb::Patch) => "Patch applied successfully".to_string(),
            Self::Uninstall => "Uninstalled successfully".to_string(),
        }
    }

    /// Summary message for a failed run
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Install(InstallVerb::Install) => "Installation failed",
            Self::Install(InstallVerb::Upgrade) => "Upgrade failed",
            Self::Install(InstallVerb::Patch) => "Patch failed",
            Self::Uninstall => "Uninstall failed",
        }
    }
}

/// Decision for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Already converged, nothing to run
    Converged { message: String },
    /// Run exactly this action
    Run(Action),
    /// The transition is impossible from the observed state
    Reject { message: String },
}

/// Decide what to do for a desired state given the observed one
///
/// Pure: no I/O, no check-mode awareness. The reconciler applies the
/// check-mode overlay on top of `Decision::Run`.
pub fn plan(desired: DesiredState, observed: &InstalledState, subject: &str) -> Decision {
    match (desired, observed) {
        (DesiredState::Present, InstalledState::Installed { version }) => Decision::Converged {
            message: format!("{subject} already installed (version {version})"),
        },
        (DesiredState::Present, InstalledState::Absent) => {
            Decision::Run(Action::Install(InstallVerb::Install))
        }
        (DesiredState::Absent, InstalledState::Absent) => Decision::Converged {
            message: format!("{subject} already absent"),
        },
        (DesiredState::Absent, InstalledState::Installed { .. }) => Decision::Run(Action::Uninstall),
        (DesiredState::Upgrade, InstalledState::Absent) => Decision::Reject {
            message: format!("Nothing to upgrade; {subject} not installed"),
        },
        (DesiredState::Upgrade, InstalledState::Installed { .. }) => {
            Decision::Run(Action::Install(InstallVerb::Upgrade))
        }
        (DesiredState::Patch, InstalledState::Absent) => Decision::Reject {
            message: format!("Cannot patch; {subject} not installed"),
        },
        (DesiredState::Patch, InstalledState::Installed { .. }) => {
            Decision::Run(Action::Install(InstallVerb::Patch))
        }
    }
}
