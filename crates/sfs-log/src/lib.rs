//! Structured logging and tracing for the SFS Control client.
//!
//! Console output on stderr with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The level comes from the configuration system and
//! can always be overridden with `RUST_LOG`.

use sfs_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives used when neither `RUST_LOG` nor the config sets a level.
/// `ureq` logs every connection at info, which drowns out client output.
pub const DEFAULT_FILTER: &str = "info,ureq=warn";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "sfs-control.log";

/// Filter directives for the given config: its `debug.log_level` when set,
/// otherwise [`DEFAULT_FILTER`].
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => {
            format!("{},ureq=warn", config.debug.log_level)
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Directory for the JSON log file (only used when `debug_build` is set)
/// * `debug_build` - Whether to also write structured JSON logs to disk
/// * `config` - Optional configuration supplying the log level
///
/// ```no_run
/// use sfs_config::Config;
///
/// let config = Config::default();
/// sfs_log::init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout carries command output.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
