//! Configuration system for the SFS Control client.
//!
//! Connection, predictor, and logging settings persist to disk as a RON file.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, ConnectionConfig, DebugConfig, PredictorConfig};
pub use error::ConfigError;
