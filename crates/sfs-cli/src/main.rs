//! `sfs`: command-line front end for the SFSControl mod.
//!
//! Run with: `cargo run -p sfs-cli -- rocket`

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sfs_config::{CliArgs, Config};
use tracing::{error, info};

use crate::commands::Command;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "sfs",
    version,
    about = "Telemetry, control and impact prediction for Spaceflight Simulator"
)]
struct Cli {
    #[command(flatten)]
    overrides: CliArgs,

    #[command(subcommand)]
    command: Command,
}

/// Load `config.ron` from `--config` or the default directory.
///
/// A directory passed with `--config` must load. Problems with the default
/// location only warn and fall back to defaults, since every setting can also
/// come from the command line.
fn load_config(overrides: &CliArgs) -> Result<(Config, Option<PathBuf>), CliError> {
    if let Some(dir) = &overrides.config {
        return Ok((Config::load_or_create(dir)?, Some(dir.clone())));
    }
    let Ok(dir) = Config::default_dir() else {
        return Ok((Config::default(), None));
    };
    match Config::load_or_create(&dir) {
        Ok(config) => Ok((config, Some(dir))),
        Err(e) => {
            eprintln!("warning: {e}; using default settings");
            Ok((Config::default(), Some(dir)))
        }
    }
}

fn log_dir(config: &Config, config_dir: Option<&PathBuf>) -> Option<PathBuf> {
    if !config.debug.log_dir.is_empty() {
        return Some(PathBuf::from(&config.debug.log_dir));
    }
    config_dir.map(|dir| dir.join("logs"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut config, config_dir) = match load_config(&cli.overrides) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&cli.overrides);

    sfs_log::init_logging(
        log_dir(&config, config_dir.as_ref()).as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        "SFSControl at {}:{} | predictor dt={}s, max_steps={}",
        config.connection.host, config.connection.port, config.predictor.dt, config.predictor.max_steps,
    );

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
