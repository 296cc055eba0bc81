//! Console logging setup

use crate::config::{LogFormat, LogSettings};
use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Resolve the filter: `RUST_LOG` wins, then the configured level,
/// then plain `info`
fn build_filter(settings: &LogSettings) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("Invalid log level: {}", e))
}

/// Initialize console logging on stderr so stdout stays clean for words
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    let filter = build_filter(settings)?;

    let layer = match settings.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_ansi(settings.ansi)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(settings.ansi)
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
