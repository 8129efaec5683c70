//! Version detection for the BA Client.
//!
//! Linux asks the packaging system about each known package name, then
//! falls back to the client's session banner. Windows only asks the client.
//! A failing probe command means "not installed"; only a probe that cannot
//! run at all is reported as [`ProbeResult::ProbeError`].

use crate::error::Error;
use crate::exec::Executor;
use crate::platform::query_installed_version;
use crate::types::{CommandLine, PackagingKind, Platform, ProbeResult, Settings};
use regex::Regex;
use std::sync::LazyLock;

/// `Version 8, Release 1, Level 20.100` in `dsmc q sess` output
///
/// `None` only if the pattern fails to compile; a test pins it.
static BANNER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"Version\s+(\d+),\s+Release\s+(\d+),\s+Level\s+([\d.]+)").ok()
});

/// Arguments of the client's session query
const SESSION_QUERY: [&str; 2] = ["q", "sess"];

/// Parse a client banner into a dotted version string.
///
/// `Version 8, Release 1, Level 20.100` becomes `8.1.20.100`. The level
/// is taken as printed, dots included.
pub fn parse_banner(text: &str) -> Option<String> {
    let caps = BANNER.as_ref()?.captures(text)?;
    Some(format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
}

/// Detect the installed BA Client version on this platform.
pub fn detect_version(executor: &dyn Executor, platform: Platform, settings: &Settings) -> ProbeResult {
    let result = match platform {
        Platform::Linux(kind) => detect_linux(executor, kind, settings),
        Platform::Windows => detect_windows(executor, settings),
    };
    log::debug!("detected on {platform}: {result:?}");
    result
}

fn detect_linux(executor: &dyn Executor, kind: PackagingKind, settings: &Settings) -> ProbeResult {
    let mut probe_error = None;

    for package in &settings.detect_packages {
        match query_installed_version(executor, kind, package) {
            ProbeResult::Found(version) => return ProbeResult::Found(version),
            ProbeResult::NotFound => log::debug!("package {package} not installed"),
            ProbeResult::ProbeError(detail) => {
                log::warn!("querying package {package} failed: {detail}");
                probe_error.get_or_insert(detail);
            }
        }
    }

    let command = CommandLine::new(&settings.linux_client_command).args(SESSION_QUERY);
    match session_banner(executor, &command) {
        ProbeResult::NotFound => probe_error.map_or(ProbeResult::NotFound, ProbeResult::ProbeError),
        other => other,
    }
}

fn detect_windows(executor: &dyn Executor, settings: &Settings) -> ProbeResult {
    let Some(path) = executor.locate(&settings.windows_client_executable) else {
        log::debug!("{} not on search path", settings.windows_client_executable);
        return ProbeResult::NotFound;
    };

    let command = CommandLine::new(path.to_string_lossy()).args(SESSION_QUERY);
    session_banner(executor, &command)
}

/// Run the client's session query and parse its banner.
fn session_banner(executor: &dyn Executor, command: &CommandLine) -> ProbeResult {
    match executor.run(command, false) {
        Ok(outcome) if outcome.is_success() => {
            parse_banner(&outcome.stdout).map_or(ProbeResult::NotFound, ProbeResult::Found)
        }
        Ok(outcome) => {
            log::debug!("{command} exited with rc={}", outcome.rc);
            ProbeResult::NotFound
        }
        // No client binary is the usual "not installed" case
        Err(Error::ToolMissing { .. }) => ProbeResult::NotFound,
        Err(e) => ProbeResult::ProbeError(e.to_string()),
    }
}
