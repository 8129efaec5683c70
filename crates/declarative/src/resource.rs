//! Resource trait for declarative package lifecycle management
//!
//! A Resource is an installable package whose installed state can be
//! observed and changed by native tooling.

use crate::types::{ActionOutcome, InstalledState};
use anyhow::Result;
use std::fmt;

/// Core trait for managed packages
///
/// The reconciler drives a resource through this trait:
/// - Identity (id, description)
/// - State detection (current_state)
/// - Lifecycle actions (install, uninstall)
///
/// Lifecycle actions report the native tool's outcome as-is. A nonzero
/// return code is a normal `Ok` value; `Err` is reserved for failures to
/// run anything at all (spawn errors, timeouts).
///
/// # Example
///
/// ```ignore
/// use declarative::{ActionOutcome, InstalledState, Resource};
///
/// #[derive(Debug)]
/// struct Fake;
///
/// impl Resource for Fake {
///     fn id(&self) -> String { "fake".into() }
///     fn description(&self) -> String { "Fake package".into() }
///     fn current_state(&self) -> anyhow::Result<InstalledState> {
///         Ok(InstalledState::Absent)
///     }
///     fn install(&self, _artifact: &str) -> anyhow::Result<ActionOutcome> {
///         Ok(ActionOutcome::new(0, "", ""))
///     }
///     fn uninstall(&self) -> anyhow::Result<ActionOutcome> {
///         Ok(ActionOutcome::new(0, "", ""))
///     }
/// }
/// ```
pub trait Resource: fmt::Debug {
    /// Stable identifier, e.g. "ba-client"
    fn id(&self) -> String;

    /// Human-readable name used as the subject of result messages
    fn description(&self) -> String;

    /// Detect the installed state
    ///
    /// Called once per reconciliation; implementations must not cache
    /// across runs.
    fn current_state(&self) -> Result<InstalledState>;

    /// Install-semantics action
    ///
    /// Serves install, upgrade and patch: the native tools overwrite an
    /// existing installation, so the three transitions differ only in
    /// their preconditions.
    fn install(&self, artifact: &str) -> Result<ActionOutcome>;

    /// Remove the package
    fn uninstall(&self) -> Result<ActionOutcome>;
}
