//! Platform probe: OS family, Linux packaging system, and package queries.
//!
//! # Example
//!
//! ```no_run
//! use pkgkit::exec::SystemExecutor;
//! use pkgkit::platform;
//!
//! let platform = platform::detect(&SystemExecutor::new());
//! println!("Running on: {platform}");
//! ```

use crate::exec::Executor;
use crate::types::{CommandLine, OsFamily, PackagingKind, Platform, ProbeResult};
use std::fs;

/// Location of the os-release file used to break rpm/dpkg ties
const OS_RELEASE: &str = "/etc/os-release";

/// Distribution ids that use rpm natively
const RPM_DISTROS: &[&str] = &[
    "rhel", "fedora", "centos", "rocky", "almalinux", "ol", "suse", "sles", "opensuse", "amzn",
];

/// Distribution ids that use dpkg natively
const DEBIAN_DISTROS: &[&str] = &["debian", "ubuntu", "linuxmint", "raspbian"];

/// Detect the OS family of the running host.
///
/// Anything that is not Windows is treated as Linux.
pub fn detect_os_family() -> OsFamily {
    OsFamily::from_os_name(std::env::consts::OS)
}

/// Detect the full platform, including the packaging kind on Linux.
pub fn detect(executor: &dyn Executor) -> Platform {
    match detect_os_family() {
        OsFamily::Windows => Platform::Windows,
        OsFamily::Linux => Platform::Linux(detect_packaging_kind(executor)),
    }
}

/// Detect whether the host uses rpm or dpkg.
///
/// Looks for the `rpm` and `dpkg` tools on the search path. When both are
/// present, `/etc/os-release` decides; otherwise the host is unsupported.
pub fn detect_packaging_kind(executor: &dyn Executor) -> PackagingKind {
    let has_rpm = executor.locate("rpm").is_some();
    let has_dpkg = executor.locate("dpkg").is_some();
    let os_release = if has_rpm && has_dpkg {
        fs::read_to_string(OS_RELEASE).ok()
    } else {
        None
    };

    let kind = classify_packaging(has_rpm, has_dpkg, os_release.as_deref());
    log::debug!("packaging: rpm={has_rpm} dpkg={has_dpkg} -> {kind}");
    kind
}

/// Decide the packaging kind from tool presence and os-release contents.
pub fn classify_packaging(has_rpm: bool, has_dpkg: bool, os_release: Option<&str>) -> PackagingKind {
    match (has_rpm, has_dpkg) {
        (true, false) => PackagingKind::Rpm,
        (false, true) => PackagingKind::Debian,
        (false, false) => PackagingKind::Unsupported,
        (true, true) => os_release.map_or(PackagingKind::Unsupported, classify_os_release),
    }
}

fn classify_os_release(content: &str) -> PackagingKind {
    let ids: Vec<String> = content
        .lines()
        .filter_map(|line| {
            line.strip_prefix("ID=")
                .or_else(|| line.strip_prefix("ID_LIKE="))
        })
        .flat_map(|value| {
            value
                .trim_matches(|c| c == '"' || c == '\'')
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .collect();

    let is = |family: &[&str]| ids.iter().any(|id| family.contains(&id.as_str()));
    match (is(RPM_DISTROS), is(DEBIAN_DISTROS)) {
        (true, false) => PackagingKind::Rpm,
        (false, true) => PackagingKind::Debian,
        _ => PackagingKind::Unsupported,
    }
}

/// Command that prints the installed version of a package.
fn version_query(kind: PackagingKind, package: &str) -> Option<CommandLine> {
    match kind {
        PackagingKind::Rpm => Some(
            CommandLine::new("rpm")
                .args(["-q", "--queryformat", "%{VERSION}"])
                .arg(package),
        ),
        PackagingKind::Debian => Some(
            CommandLine::new("dpkg-query")
                .args(["-W", "--showformat=${Version}"])
                .arg(package),
        ),
        PackagingKind::Unsupported => None,
    }
}

/// Query the packaging system for a package's installed version.
///
/// A nonzero exit or empty output means the package is not installed.
/// Only a query that cannot run at all is a [`ProbeResult::ProbeError`].
pub fn query_installed_version(
    executor: &dyn Executor,
    kind: PackagingKind,
    package: &str,
) -> ProbeResult {
    let Some(command) = version_query(kind, package) else {
        return ProbeResult::NotFound;
    };

    match executor.run(&command, false) {
        Ok(outcome) if outcome.is_success() && !outcome.stdout.trim().is_empty() => {
            ProbeResult::Found(outcome.stdout.trim().to_string())
        }
        Ok(_) => ProbeResult::NotFound,
        Err(e) => ProbeResult::ProbeError(e.to_string()),
    }
}
