//! Tracing setup; logs go to stderr so stdout carries only the report

use anyhow::{anyhow, Result};
use kyc_probe_config::{LogFormat, LogLevel, LoggingConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parse a `--log-level` value, keeping `fallback` for anything unrecognised
fn resolve_level(requested: &str, fallback: LogLevel) -> LogLevel {
    requested.parse::<LogLevel>().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level '{}', falling back to '{}'",
            requested, fallback
        );
        fallback
    })
}

/// Install the global subscriber
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then the configured level.
pub fn init_tracing(log_level: Option<&String>, config: &LoggingConfig) -> Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::new(resolve_level(level, config.level).as_str()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str())),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

    debug!("Tracing initialized with {:?} format", config.format);
    Ok(())
}
