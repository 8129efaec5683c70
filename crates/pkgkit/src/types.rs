//! Core types for native tooling.

use std::fmt;

/// Operating system family of the managed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Linux and every other POSIX-like host
    Linux,
    /// Microsoft Windows
    Windows,
}

impl OsFamily {
    /// Classify an OS name such as `std::env::consts::OS` or `uname -s`.
    ///
    /// Only Windows is recognised; everything else is treated as Linux.
    pub fn from_os_name(name: &str) -> Self {
        if name.to_lowercase().starts_with("win") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Get the OS family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native packaging system of a Linux host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackagingKind {
    /// rpm
    Rpm,
    /// dpkg
    Debian,
    /// Neither, or both without a tie-breaker
    Unsupported,
}

impl PackagingKind {
    /// Get the packaging kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rpm => "rpm",
            Self::Debian => "deb",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for PackagingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host platform, derived once at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux with its packaging system
    Linux(PackagingKind),
    /// Windows (msiexec)
    Windows,
}

impl Platform {
    /// OS family of this platform.
    pub fn os_family(&self) -> OsFamily {
        match self {
            Self::Linux(_) => OsFamily::Linux,
            Self::Windows => OsFamily::Windows,
        }
    }

    /// Packaging kind, on Linux.
    pub fn packaging_kind(&self) -> Option<PackagingKind> {
        match self {
            Self::Linux(kind) => Some(*kind),
            Self::Windows => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux(kind) => write!(f, "linux ({kind})"),
            Self::Windows => f.write_str("windows"),
        }
    }
}

/// Result of probing for an installed version.
///
/// A probe that ran and found nothing (`NotFound`) is distinct from a
/// probe that could not run (`ProbeError`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// Installed with this version string
    Found(String),
    /// Not installed
    NotFound,
    /// The probe itself malfunctioned
    ProbeError(String),
}

impl ProbeResult {
    /// Check if a version was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Found version, if any.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Found(version) => Some(version),
            _ => None,
        }
    }
}

/// A program and its arguments.
///
/// Commands are never passed through a shell; [`fmt::Display`] renders a
/// shell-like line for logs and mock lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    /// Executable name or path
    pub program: String,
    /// Arguments, passed as-is
    pub args: Vec<String>,
}

impl CommandLine {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    if word.is_empty() || word.contains(char::is_whitespace) {
        format!("\"{word}\"")
    } else {
        word.to_string()
    }
}

/// Caller-supplied identifiers for lifecycle actions.
///
/// All values are opaque: nothing checks that files exist or that
/// installers are intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRequest {
    /// Install, upgrade or patch artifact
    pub installer_path: Option<String>,
    /// Windows installer GUID for uninstall
    pub product_code: Option<String>,
    /// Linux package name override for uninstall
    pub pkg_name: Option<String>,
}

/// Names, commands and flags used to find and manage the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Client command on Linux
    pub linux_client_command: String,
    /// Package names queried for the installed version, in order
    pub detect_packages: Vec<String>,
    /// Package names tried for removal, in order
    pub uninstall_packages: Vec<String>,
    /// Client executable looked up on the Windows search path
    pub windows_client_executable: String,
    /// Flags appended to msiexec invocations
    pub silent_opts: String,
    /// Product-name substring for catalog uninstall
    pub catalog_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            linux_client_command: "dsmc".to_string(),
            detect_packages: vec![
                "TIVsm-BA".to_string(),
                "ba_client".to_string(),
                "dsmba".to_string(),
            ],
            uninstall_packages: vec!["TIVsm-BA".to_string(), "ba_client".to_string()],
            windows_client_executable: "dsmc.exe".to_string(),
            silent_opts: "/qn /norestart".to_string(),
            catalog_name: "Tivoli Storage Manager".to_string(),
        }
    }
}
