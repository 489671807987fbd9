//! Configuration management utilities

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format: {other}"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Log record format
    pub log_format: LogFormat,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "pricescope".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Text,
            log_filter: "warn,pricescope_core=info,pricescope_cli=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Build from `PRICESCOPE_ENV` and `PRICESCOPE_LOG_FORMAT`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(env) = std::env::var("PRICESCOPE_ENV") {
            config.environment = env;
        }
        if let Ok(format) = std::env::var("PRICESCOPE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        Ok(config)
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production") || self.environment == "prod"
    }
}
