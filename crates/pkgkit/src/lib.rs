//! # pkgkit
//!
//! Native package tooling for the BA Client lifecycle.
//!
//! This crate provides functionality for:
//! - Detecting the host platform (OS family, rpm vs dpkg)
//! - Detecting the installed client version (package queries, session banner)
//! - Installing, upgrading and patching with `rpm`, `dpkg` or `msiexec`
//! - Uninstalling with candidate-name fallback or by product code
//!
//! ## Example
//!
//! ```no_run
//! use pkgkit::{ActionRequest, Client, Settings};
//!
//! let client = Client::new(Settings::default(), None);
//!
//! match client.detect_version() {
//!     pkgkit::ProbeResult::Found(version) => println!("Installed: {version}"),
//!     other => println!("Not installed: {other:?}"),
//! }
//!
//! let outcome = client.install("/srv/pkgs/TIVsm-BA.x86_64.rpm").unwrap();
//! println!("rc={}", outcome.rc);
//! ```
//!
//! ## Testing
//!
//! Every host interaction goes through [`exec::Executor`]. Build a client
//! around [`exec::MockExecutor`] with [`Client::with_executor`] to script
//! outcomes and inspect the commands that would have run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod detect;
pub mod error;
pub mod exec;
pub mod platform;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{
    ActionRequest, CommandLine, OsFamily, PackagingKind, Platform, ProbeResult, Settings,
};

use declarative::ActionOutcome;
use exec::{Executor, SystemExecutor};
use std::time::Duration;

/// High-level client for BA Client lifecycle operations.
///
/// The platform is detected once, when the client is created, and is
/// fixed for the client's lifetime. Create one client per run.
pub struct Client {
    executor: Box<dyn Executor>,
    platform: Platform,
    settings: Settings,
}

impl Client {
    /// Create a client that runs real commands, detecting the platform.
    pub fn new(settings: Settings, timeout: Option<Duration>) -> Self {
        let executor = SystemExecutor::with_timeout(timeout);
        let platform = platform::detect(&executor);
        Self {
            executor: Box::new(executor),
            platform,
            settings,
        }
    }

    /// Create a client with a custom executor and a known platform (useful for testing).
    pub fn with_executor(executor: Box<dyn Executor>, platform: Platform, settings: Settings) -> Self {
        Self {
            executor,
            platform,
            settings,
        }
    }

    /// Platform this client manages.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Detect the installed client version.
    pub fn detect_version(&self) -> ProbeResult {
        detect::detect_version(self.executor.as_ref(), self.platform, &self.settings)
    }

    /// Install, upgrade or patch from an artifact.
    pub fn install(&self, artifact: &str) -> Result<ActionOutcome> {
        actions::install(self.executor.as_ref(), self.platform, artifact, &self.settings)
    }

    /// Uninstall the client.
    pub fn uninstall(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        actions::uninstall(self.executor.as_ref(), self.platform, request, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exec::MockExecutor;

    #[test]
    fn test_client_routes_through_executor() {
        let mock = MockExecutor::new();
        mock.respond("rpm -q --queryformat %{VERSION} TIVsm-BA", 0, "8.1.20", "");
        mock.respond("rpm -Uvh /tmp/p.rpm", 0, "", "");

        let client = Client::with_executor(
            Box::new(mock.clone()),
            Platform::Linux(PackagingKind::Rpm),
            Settings::default(),
        );

        assert_eq!(client.detect_version(), ProbeResult::Found("8.1.20".to_string()));
        assert!(client.install("/tmp/p.rpm").unwrap().is_success());
        assert_eq!(mock.commands().len(), 2);
    }

    #[test]
    fn test_client_platform_is_fixed() {
        let client = Client::with_executor(
            Box::new(MockExecutor::new()),
            Platform::Windows,
            Settings::default(),
        );
        assert_eq!(client.platform().os_family(), OsFamily::Windows);
        assert_eq!(client.settings().windows_client_executable, "dsmc.exe");
    }
}
