//! Logging and tracing utilities

use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize tracing with a human-readable formatter.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize tracing with the JSON formatter
pub fn init_tracing_json(default_filter: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initialize tracing according to the application config
pub fn init_from_config(config: &AppConfig) {
    match config.log_format {
        LogFormat::Text => init_tracing(&config.log_filter),
        LogFormat::Json => init_tracing_json(&config.log_filter),
    }
}
