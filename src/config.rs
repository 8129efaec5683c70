use anyhow::{Context, Result};
use pkgkit::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join("ba-install"))
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub linux: LinuxConfig,
    pub windows: WindowsConfig,
    pub exec: ExecConfig,
    pub detect: DetectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinuxConfig {
    pub client_command: String,
    pub detect_packages: Vec<String>,
    pub uninstall_packages: Vec<String>,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            client_command: settings.linux_client_command,
            detect_packages: settings.detect_packages,
            uninstall_packages: settings.uninstall_packages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub client_executable: String,
    pub silent_opts: String,
    pub catalog_name: String,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            client_executable: settings.windows_client_executable,
            silent_opts: settings.silent_opts,
            catalog_name: settings.catalog_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// 0 disables the timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Fail instead of assuming absence when a probe cannot run
    pub strict: bool,
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_config_path()?;
                if !path.exists() {
                    log::debug!("no config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Native tooling settings
    pub fn settings(&self) -> Settings {
        Settings {
            linux_client_command: self.linux.client_command.clone(),
            detect_packages: self.linux.detect_packages.clone(),
            uninstall_packages: self.linux.uninstall_packages.clone(),
            windows_client_executable: self.windows.client_executable.clone(),
            silent_opts: self.windows.silent_opts.clone(),
            catalog_name: self.windows.catalog_name.clone(),
        }
    }

    /// Command timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.exec.timeout_secs)
    }
}

/// Convert a seconds value where 0 means "no timeout"
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_settings() {
        let config = Config::default();
        assert_eq!(config.settings(), Settings::default());
        assert_eq!(config.timeout(), None);
        assert!(!config.detect.strict);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[windows]
silent_opts = "/quiet /norestart"

[exec]
timeout_secs = 600
"#,
        )
        .unwrap();

        assert_eq!(config.windows.silent_opts, "/quiet /norestart");
        assert_eq!(config.windows.client_executable, "dsmc.exe");
        assert_eq!(config.linux.detect_packages, ["TIVsm-BA", "ba_client", "dsmba"]);
        assert_eq!(config.timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml("[exec]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[linux]\nuninstall_packages = [\"TIVsm-BA\"]\n[detect]\nstrict = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.linux.uninstall_packages, ["TIVsm-BA"]);
        assert!(config.detect.strict);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Could not read"));
    }

    #[test]
    fn test_timeout_zero_disables() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(5), Some(Duration::from_secs(5)));
    }
}
