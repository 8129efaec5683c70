mod cli;
mod commands;
mod config;
mod report;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context { quiet: cli.quiet };

    match cli.command {
        Command::Apply(args) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::apply::run(&ctx, &config, &args)
        }
        Command::Status(args) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::status::run(&ctx, &config, &args)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ba-install", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
