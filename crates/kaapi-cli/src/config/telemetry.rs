//! Log output configuration.

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Shape of emitted log lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable, colored when attached to a terminal.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
///
/// The level filter comes from `RUST_LOG`:
///
/// ```bash
/// RUST_LOG=debug kaapi-cli
/// RUST_LOG=kaapi_server=trace,tower_http=debug kaapi-cli --log-format json
/// ```
#[derive(Debug, Default, Clone, Args, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    /// Installs the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already set.
    pub fn init_tracing(&self) -> anyhow::Result<()> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.log_format {
            LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_current_span(true))
                .try_init(),
        };

        result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
    }
}
