//! # Declarative
//!
//! Declarative package lifecycle management.
//!
//! This crate provides the core abstractions for declaring the desired
//! state of an installable package, observing its installed state, and
//! converging the two with at most one lifecycle action per run.
//!
//! ## Core Concepts
//!
//! - **Resource**: A package that can be observed, installed and removed
//! - **InstalledState**: `Absent` or `Installed { version }`
//! - **DesiredState**: `present`, `absent`, `upgrade` or `patch`
//! - **Decision**: The pure outcome of the transition table
//! - **reconcile**: Observe, decide, honour check mode, run, report
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{reconcile, ApplyContext, Declaration, DesiredState};
//!
//! let declaration = Declaration::new(DesiredState::Present)
//!     .with_artifact("/srv/pkgs/TIVsm-BA.x86_64.rpm");
//!
//! let result = reconcile(&resource, &declaration, ApplyContext::new(false))?;
//! println!("changed={} msg={}", result.changed, result.message);
//! ```
//!
//! Platform knowledge lives behind the [`Resource`] trait, so the
//! decision logic here can be exercised without touching a host.

pub mod context;
pub mod error;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, Declaration};
pub use error::ReconcileError;
pub use executor::reconcile;
pub use planner::{Action, Decision, InstallVerb, plan};
pub use resource::Resource;
pub use types::{ActionOutcome, DesiredState, FailureKind, InstalledState, ReconciliationResult};
