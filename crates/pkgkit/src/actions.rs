//! Lifecycle actions: install (also serving upgrade and patch) and uninstall.
//!
//! Each action maps a request onto native command lines and reports the
//! tool's outcome unchanged. Nothing here interprets output; the return
//! code is the only success signal.

use crate::error::Result;
use crate::exec::{Executor, run_lenient};
use crate::types::{ActionRequest, CommandLine, PackagingKind, Platform, Settings};
use declarative::{ActionOutcome, FailureKind};

/// How an action resolved before anything runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run this command
    Run(CommandLine),
    /// Refuse without running any tool
    Reject {
        /// Failure category
        kind: FailureKind,
        /// Explanation reported as stderr
        reason: &'static str,
    },
}

/// Build the install command for an artifact.
///
/// Serves install, upgrade and patch alike: `rpm -Uvh`, `dpkg -i` and
/// `msiexec /i` all overwrite an existing installation.
pub fn install_invocation(platform: Platform, artifact: &str, settings: &Settings) -> Invocation {
    match platform {
        Platform::Linux(PackagingKind::Rpm) => {
            Invocation::Run(CommandLine::new("rpm").arg("-Uvh").arg(artifact))
        }
        Platform::Linux(PackagingKind::Debian) => {
            Invocation::Run(CommandLine::new("dpkg").arg("-i").arg(artifact))
        }
        Platform::Linux(PackagingKind::Unsupported) => Invocation::Reject {
            kind: FailureKind::Unsupported,
            reason: "Unsupported Linux package system",
        },
        Platform::Windows if artifact.to_lowercase().ends_with(".msi") => Invocation::Run(
            CommandLine::new("msiexec")
                .arg("/i")
                .arg(artifact)
                .args(settings.silent_opts.split_whitespace()),
        ),
        Platform::Windows => Invocation::Reject {
            kind: FailureKind::Unsupported,
            reason: "Unsupported Windows installer type",
        },
    }
}

/// Install, upgrade or patch from an artifact.
pub fn install(
    executor: &dyn Executor,
    platform: Platform,
    artifact: &str,
    settings: &Settings,
) -> Result<ActionOutcome> {
    match install_invocation(platform, artifact, settings) {
        Invocation::Run(command) => run_lenient(executor, &command),
        Invocation::Reject { kind, reason } => {
            log::warn!("not installing {artifact}: {reason}");
            Ok(ActionOutcome::rejected(kind, reason))
        }
    }
}

/// Remove the client.
pub fn uninstall(
    executor: &dyn Executor,
    platform: Platform,
    request: &ActionRequest,
    settings: &Settings,
) -> Result<ActionOutcome> {
    match platform {
        Platform::Linux(_) => uninstall_linux(executor, request.pkg_name.as_deref(), settings),
        Platform::Windows => uninstall_windows(executor, request.product_code.as_deref(), settings),
    }
}

/// Try each candidate name with `rpm -e`, then `dpkg -r`; first success wins.
///
/// An empty `pkg_name` counts as not given.
///
/// Both tools are tried regardless of the detected packaging kind.
fn uninstall_linux(
    executor: &dyn Executor,
    pkg_name: Option<&str>,
    settings: &Settings,
) -> Result<ActionOutcome> {
    let candidates: Vec<&str> = match pkg_name.filter(|n| !n.is_empty()) {
        Some(name) => vec![name],
        None => settings.uninstall_packages.iter().map(String::as_str).collect(),
    };

    for name in candidates.into_iter().filter(|n| !n.is_empty()) {
        for command in [
            CommandLine::new("rpm").arg("-e").arg(name),
            CommandLine::new("dpkg").arg("-r").arg(name),
        ] {
            let outcome = run_lenient(executor, &command)?;
            if outcome.is_success() {
                return Ok(outcome);
            }
            log::debug!("{command} failed with rc={}", outcome.rc);
        }
    }

    Ok(ActionOutcome::rejected(
        FailureKind::NotFound,
        "Failed to uninstall: package not found",
    ))
}

/// Uninstall by product code, or through the product catalog by name.
///
/// An empty product code counts as not given.
fn uninstall_windows(
    executor: &dyn Executor,
    product_code: Option<&str>,
    settings: &Settings,
) -> Result<ActionOutcome> {
    let command = match product_code.filter(|c| !c.is_empty()) {
        Some(code) => CommandLine::new("msiexec")
            .arg("/x")
            .arg(code)
            .args(settings.silent_opts.split_whitespace()),
        None => {
            log::info!("no product code, uninstalling via product catalog (slow)");
            CommandLine::new("wmic").args([
                "product".to_string(),
                "where".to_string(),
                format!("name like '%{}%'", settings.catalog_name),
                "call".to_string(),
                "uninstall".to_string(),
            ])
        }
    };
    run_lenient(executor, &command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::MockExecutor;

    const RPM: Platform = Platform::Linux(PackagingKind::Rpm);
    const DEB: Platform = Platform::Linux(PackagingKind::Debian);

    #[test]
    fn test_install_rpm_uses_upgrade_flag() {
        let mock = MockExecutor::new();
        mock.respond("rpm -Uvh /tmp/TIVsm-BA.x86_64.rpm", 0, "Preparing...", "");

        let outcome = install(&mock, RPM, "/tmp/TIVsm-BA.x86_64.rpm", &Settings::default()).unwrap();

        assert_eq!(outcome.rc, 0);
        assert_eq!(outcome.stdout, "Preparing...");
        assert_eq!(mock.commands(), vec!["rpm -Uvh /tmp/TIVsm-BA.x86_64.rpm".to_string()]);
    }

    #[test]
    fn test_install_deb() {
        assert_eq!(
            install_invocation(DEB, "/tmp/tivsm-ba.deb", &Settings::default()),
            Invocation::Run(CommandLine::new("dpkg").args(["-i", "/tmp/tivsm-ba.deb"]))
        );
    }

    #[test]
    fn test_install_unsupported_linux_runs_nothing() {
        let mock = MockExecutor::new();
        let outcome = install(
            &mock,
            Platform::Linux(PackagingKind::Unsupported),
            "/tmp/pkg",
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(outcome.rc, 1);
        assert_eq!(outcome.stderr, "Unsupported Linux package system");
        assert_eq!(outcome.rejection, Some(FailureKind::Unsupported));
        assert!(mock.commands().is_empty());
    }

    #[test]
    fn test_install_windows_msi_is_silent() {
        let invocation =
            install_invocation(Platform::Windows, r"C:\pkgs\BA Client.MSI", &Settings::default());
        match invocation {
            Invocation::Run(command) => assert_eq!(
                command.to_string(),
                r#"msiexec /i "C:\pkgs\BA Client.MSI" /qn /norestart"#
            ),
            other => panic!("unexpected invocation: {other:?}"),
        }
    }

    #[test]
    fn test_install_windows_custom_silent_opts() {
        let settings = Settings {
            silent_opts: "/quiet /norestart /l*v C:\\ba.log".to_string(),
            ..Settings::default()
        };
        let Invocation::Run(command) = install_invocation(Platform::Windows, "ba.msi", &settings)
        else {
            panic!("msi should run");
        };
        assert_eq!(command.args, ["/i", "ba.msi", "/quiet", "/norestart", "/l*v", "C:\\ba.log"]);
    }

    #[test]
    fn test_install_windows_exe_rejected() {
        let mock = MockExecutor::new();
        let outcome = install(&mock, Platform::Windows, r"C:\pkgs\setup.exe", &Settings::default())
            .unwrap();

        assert_eq!(outcome.rc, 1);
        assert_eq!(outcome.stderr, "Unsupported Windows installer type");
        assert!(mock.commands().is_empty());
    }

    #[test]
    fn test_install_propagates_failure_rc() {
        let mock = MockExecutor::new();
        mock.respond("dpkg -i a.deb", 2, "", "dependency problems");

        let outcome = install(&mock, DEB, "a.deb", &Settings::default()).unwrap();

        assert_eq!(outcome.rc, 2);
        assert_eq!(outcome.stderr, "dependency problems");
        assert_eq!(outcome.rejection, None);
    }

    #[test]
    fn test_uninstall_linux_candidate_order() {
        let mock = MockExecutor::new();

        let outcome = uninstall(&mock, RPM, &ActionRequest::default(), &Settings::default()).unwrap();

        assert_eq!(
            mock.commands(),
            vec![
                "rpm -e TIVsm-BA".to_string(),
                "dpkg -r TIVsm-BA".to_string(),
                "rpm -e ba_client".to_string(),
                "dpkg -r ba_client".to_string(),
            ]
        );
        assert_eq!(outcome.rc, 1);
        assert_eq!(outcome.stderr, "Failed to uninstall: package not found");
        assert_eq!(outcome.rejection, Some(FailureKind::NotFound));
    }

    #[test]
    fn test_uninstall_linux_first_success_short_circuits() {
        let mock = MockExecutor::new();
        mock.respond("dpkg -r TIVsm-BA", 0, "Removing tivsm-ba", "");

        let outcome = uninstall(&mock, DEB, &ActionRequest::default(), &Settings::default()).unwrap();

        assert_eq!(outcome.rc, 0);
        assert_eq!(outcome.stdout, "Removing tivsm-ba");
        assert_eq!(
            mock.commands(),
            vec!["rpm -e TIVsm-BA".to_string(), "dpkg -r TIVsm-BA".to_string()]
        );
    }

    #[test]
    fn test_uninstall_linux_missing_rpm_falls_through() {
        let mock = MockExecutor::new();
        mock.missing("rpm -e TIVsm-BA");
        mock.respond("dpkg -r TIVsm-BA", 0, "", "");

        let outcome = uninstall(&mock, DEB, &ActionRequest::default(), &Settings::default()).unwrap();

        assert!(outcome.is_success());
    }

    #[test]
    fn test_uninstall_linux_explicit_name_only() {
        let mock = MockExecutor::new();
        let request = ActionRequest {
            pkg_name: Some("TIVsm-BA.x86_64".to_string()),
            ..ActionRequest::default()
        };

        let outcome = uninstall(&mock, RPM, &request, &Settings::default()).unwrap();

        assert!(!outcome.is_success());
        assert_eq!(
            mock.commands(),
            vec![
                "rpm -e TIVsm-BA.x86_64".to_string(),
                "dpkg -r TIVsm-BA.x86_64".to_string()
            ]
        );
    }

    #[test]
    fn test_uninstall_linux_empty_name_uses_defaults() {
        let mock = MockExecutor::new();
        mock.respond("rpm -e TIVsm-BA", 0, "", "");
        let request = ActionRequest {
            pkg_name: Some(String::new()),
            ..ActionRequest::default()
        };

        let outcome = uninstall(&mock, RPM, &request, &Settings::default()).unwrap();

        assert!(outcome.is_success());
        assert_eq!(mock.commands(), vec!["rpm -e TIVsm-BA".to_string()]);
    }

    #[test]
    fn test_uninstall_windows_empty_product_code_uses_catalog() {
        let mock = MockExecutor::new();
        let request = ActionRequest {
            product_code: Some(String::new()),
            ..ActionRequest::default()
        };

        uninstall(&mock, Platform::Windows, &request, &Settings::default()).unwrap();

        let commands = mock.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("wmic product where"));
    }

    #[test]
    fn test_uninstall_windows_product_code() {
        let mock = MockExecutor::new();
        let code = "{6E5F2F4A-1B8C-4F35-9E7D-1234567890AB}";
        mock.respond(&format!("msiexec /x {code} /qn /norestart"), 0, "", "");
        let request = ActionRequest {
            product_code: Some(code.to_string()),
            ..ActionRequest::default()
        };

        let outcome = uninstall(&mock, Platform::Windows, &request, &Settings::default()).unwrap();

        assert_eq!(outcome.rc, 0);
        assert_eq!(mock.commands().len(), 1);
    }

    #[test]
    fn test_uninstall_windows_catalog_fallback() {
        let mock = MockExecutor::new();

        let outcome =
            uninstall(&mock, Platform::Windows, &ActionRequest::default(), &Settings::default())
                .unwrap();

        assert_eq!(outcome.rc, 1);
        assert_eq!(
            mock.commands(),
            vec![
                r#"wmic product where "name like '%Tivoli Storage Manager%'" call uninstall"#
                    .to_string()
            ]
        );
    }
}
