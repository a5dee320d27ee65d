//! Tracing setup for binaries and tests that embed the engine

use crate::config::LoggingConfig;
use crate::error::ConfigError;
use tracing::Level;

/// Parse a level name ("trace" … "error", case-insensitive)
pub fn parse_level(level: &str) -> Result<Level, ConfigError> {
    level
        .parse::<Level>()
        .map_err(|_| ConfigError::Invalid(format!("unknown log level: {}", level)))
}

/// Install a plain `fmt` subscriber at the configured level
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let level = parse_level(&config.level)?;
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
