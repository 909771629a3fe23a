//! Log setup for the dashboard binary.
//!
//! The terminal belongs to the UI, so logs only go to a file. Without
//! `--log-file` no subscriber is installed and events are discarded.
//!
//!   PROSPECT_LOG=prospect_core=debug prospect --log-file prospect.log

use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (default: `info`).
pub const LOG_ENV: &str = "PROSPECT_LOG";

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Append logs to this file.
    pub file: Option<PathBuf>,
    /// Use `debug` unless the filter variable is set.
    pub verbose: bool,
}

pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(path) = &config.file else {
        return Ok(());
    };
    let default = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let file = prospect_core::log_to_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(config.verbose)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_installs_nothing() {
        assert!(init_logging(&LogConfig::default()).is_ok());
    }
}
