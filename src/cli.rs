use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use declarative::DesiredState;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ba-install")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Reconcile the backup-archive client installation to a declared state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: <config dir>/ba-install/config.toml)
    #[arg(long, global = true, env = "BA_INSTALL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Converge the client to the declared state
    Apply(ApplyArgs),

    /// Show platform and installed client version
    Status(StatusArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Apply
// ============================================================================

#[derive(Args)]
pub struct ApplyArgs {
    /// Desired state: present, absent, upgrade or patch
    #[arg(short, long, value_name = "STATE", default_value_t = DesiredState::Present)]
    pub state: DesiredState,

    /// Installer, upgrade or patch artifact (.rpm, .deb or .msi)
    #[arg(short, long)]
    pub installer_path: Option<String>,

    /// Windows product code (GUID) used for uninstall
    #[arg(long)]
    pub product_code: Option<String>,

    /// Linux package name used for uninstall
    #[arg(long)]
    pub pkg_name: Option<String>,

    /// Report what would change without changing anything
    #[arg(long, visible_alias = "dry-run")]
    pub check: bool,

    /// Kill native commands after this many seconds (0 = no limit)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Fail when installed state cannot be determined
    #[arg(long)]
    pub strict_probe: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

// ============================================================================
// Status
// ============================================================================

#[derive(Args)]
pub struct StatusArgs {
    /// Kill native commands after this many seconds (0 = no limit)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
