//! Backup-archive client resource

use anyhow::{Context, Result, bail};
use declarative::{ActionOutcome, InstalledState, Resource};
use pkgkit::{ActionRequest, Client, ProbeResult};
use std::fmt;

/// The backup-archive client on this host
pub struct BaClient {
    client: Client,
    request: ActionRequest,
    strict: bool,
}

impl BaClient {
    pub fn new(client: Client, request: ActionRequest) -> Self {
        Self {
            client,
            request,
            strict: false,
        }
    }

    /// Treat an unrunnable probe as an error instead of "not installed"
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl fmt::Debug for BaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaClient")
            .field("platform", &self.client.platform())
            .field("request", &self.request)
            .field("strict", &self.strict)
            .finish()
    }
}

impl Resource for BaClient {
    fn id(&self) -> String {
        "ba-client".to_string()
    }

    fn description(&self) -> String {
        "BA Client".to_string()
    }

    fn current_state(&self) -> Result<InstalledState> {
        match self.client.detect_version() {
            ProbeResult::Found(version) => Ok(InstalledState::installed(version)),
            ProbeResult::NotFound => Ok(InstalledState::Absent),
            ProbeResult::ProbeError(detail) if self.strict => {
                bail!("probe failed on {}: {detail}", self.client.platform())
            }
            ProbeResult::ProbeError(detail) => {
                log::warn!("could not probe installed version, assuming absent: {detail}");
                Ok(InstalledState::Absent)
            }
        }
    }

    fn install(&self, artifact: &str) -> Result<ActionOutcome> {
        self.client
            .install(artifact)
            .map_err(explain)
            .with_context(|| format!("Failed to install from {artifact}"))
    }

    fn uninstall(&self) -> Result<ActionOutcome> {
        self.client
            .uninstall(&self.request)
            .map_err(explain)
            .context("Failed to uninstall")
    }
}

/// Log what kind of tooling failure this is and how to address it
fn explain(err: pkgkit::Error) -> pkgkit::Error {
    let category = err.category();
    log::warn!("{}: {}", category.description(), category.advice());
    err
}
