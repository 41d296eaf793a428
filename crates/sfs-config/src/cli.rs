//! Command-line argument parsing shared by SFS Control binaries.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

/// Connection and predictor overrides.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// SFSControl host.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// SFSControl port.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Predictor time step in seconds.
    #[arg(long, global = true)]
    pub dt: Option<f64>,

    /// Predictor step budget.
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref host) = args.host {
            self.connection.host = host.clone();
        }
        if let Some(port) = args.port {
            self.connection.port = port;
        }
        if let Some(timeout) = args.timeout {
            self.connection.timeout_seconds = timeout;
        }
        if let Some(dt) = args.dt {
            self.predictor.dt = dt;
        }
        if let Some(max_steps) = args.max_steps {
            self.predictor.max_steps = max_steps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
