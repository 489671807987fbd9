//! Configuration for the dashboard controller and its service client

use crate::error::{DashboardError, Result};
use crate::model::{Horizon, ModelId, Timeframe};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the market data service
    pub api_base_url: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Timeframe reported for the history that comes back with a resolution
    pub default_timeframe: Timeframe,

    /// Model selected at startup
    pub default_model: ModelId,

    /// Horizon selected at startup
    pub default_horizon: Horizon,

    /// Number of trailing history points shown in front of a forecast
    pub overlay_window: usize,

    /// Cache TTL for the company list and history replies; zero disables caching
    pub cache_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            default_timeframe: Timeframe::OneYear,
            default_model: ModelId::linear(),
            default_horizon: Horizon::OneWeek,
            overlay_window: 30,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Defaults overridden by `PRICESCOPE_API_URL` and `PRICESCOPE_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.overlay_window == 0 {
            return Err(DashboardError::Config(
                "overlay_window must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed service base URL
    pub fn base_url(&self) -> Result<Url> {
        if self.api_base_url.trim().is_empty() {
            return Err(DashboardError::Config("api_base_url is empty".to_string()));
        }
        let url = Url::parse(self.api_base_url.trim())?;
        if url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "api_base_url cannot be a base: {}",
                self.api_base_url
            )));
        }
        Ok(url)
    }

    pub fn caching_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    default_timeframe: Option<Timeframe>,
    default_model: Option<ModelId>,
    default_horizon: Option<Horizon>,
    overlay_window: Option<usize>,
    cache_ttl: Option<Duration>,
}

impl DashboardConfigBuilder {
    /// Set the service base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn default_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.default_timeframe = Some(timeframe);
        self
    }

    pub fn default_model(mut self, model: ModelId) -> Self {
        self.default_model = Some(model);
        self
    }

    pub fn default_horizon(mut self, horizon: Horizon) -> Self {
        self.default_horizon = Some(horizon);
        self
    }

    /// Set the trailing history window used by forecast overlays
    pub fn overlay_window(mut self, points: usize) -> Self {
        self.overlay_window = Some(points);
        self
    }

    /// Set cache TTL; `Duration::ZERO` disables the cache
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Load URL and timeout from the environment when present
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("PRICESCOPE_API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(secs) = std::env::var("PRICESCOPE_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
        {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            default_timeframe: self.default_timeframe.unwrap_or(defaults.default_timeframe),
            default_model: self.default_model.unwrap_or(defaults.default_model),
            default_horizon: self.default_horizon.unwrap_or(defaults.default_horizon),
            overlay_window: self.overlay_window.unwrap_or(defaults.overlay_window),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_timeframe, Timeframe::OneYear);
        assert_eq!(config.default_model, ModelId::linear());
        assert_eq!(config.default_horizon, Horizon::OneWeek);
        assert_eq!(config.overlay_window, 30);
        assert!(config.caching_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .api_base_url("https://prices.example.com/api/")
            .default_model(ModelId::tree())
            .request_timeout(Duration::from_secs(5))
            .cache_ttl(Duration::ZERO)
            .build()
            .unwrap();

        assert_eq!(config.default_model, ModelId::tree());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.caching_enabled());
        assert_eq!(config.base_url().unwrap().path(), "/api/");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(DashboardConfig::builder().api_base_url("").build().is_err());
        assert!(DashboardConfig::builder().api_base_url("not a url").build().is_err());
        assert!(DashboardConfig::builder().api_base_url("mailto:ops@example.com").build().is_err());
        assert!(DashboardConfig::builder().overlay_window(0).build().is_err());
        assert!(
            DashboardConfig::builder()
                .request_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
    }
}
