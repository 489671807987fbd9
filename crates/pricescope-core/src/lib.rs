//! Stock price dashboard orchestration
//!
//! This crate holds the non-rendering logic of a stock price dashboard:
//!
//! - A company directory loaded once at startup
//! - Free-text search resolving to a company or a list of suggestions
//! - The displayed price series per timeframe, with its price change
//! - Display formatting for fundamentals (market cap, yield, 52-week range)
//! - Forecast overlays composed with the trailing history for charting
//! - A state machine that applies user intents with last-intent-wins ordering
//!
//! # Architecture
//!
//! [`DashboardController`] is a pure state machine. [`DashboardRuntime`] runs
//! it as a single tokio actor against any [`MarketDataService`], such as
//! [`HttpMarketClient`] optionally wrapped in [`CachedMarketService`], and
//! publishes a [`DashboardView`] after every change.
//!
//! # Example
//!
//! ```rust,ignore
//! use pricescope_core::{DashboardConfig, DashboardRuntime, HttpMarketClient, Intent};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::from_env()?;
//!     let service = Arc::new(HttpMarketClient::new(&config)?);
//!     let dashboard = DashboardRuntime::spawn(service, &config);
//!
//!     dashboard.dispatch(Intent::Submit("Apple".to_string())).await?;
//!     let view = dashboard.wait_idle().await?;
//!     println!("{:?}", view.selection);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;
pub mod overlay;
pub mod search;

// Re-export main types for convenience
pub use api::{HttpMarketClient, MarketDataService};
pub use cache::{CachedMarketService, ResponseCache};
pub use config::DashboardConfig;
pub use dashboard::{
    DashboardController, DashboardRuntime, DashboardState, DashboardView, Intent, OverlayView,
    SelectionView,
};
pub use directory::CompanyDirectory;
pub use error::{DashboardError, ErrorKind, Result};
pub use history::{Direction, HistoryStore, PriceChange};
pub use metrics::{FormattedMetrics, MetricsProjector};
pub use model::{
    CompanyRef, FundamentalsSnapshot, Horizon, LabelGranularity, ModelId, PredictionPoint,
    PricePoint, SearchResult, Timeframe,
};
pub use overlay::{ChartPoint, ComposedSeries, PointKind, PredictionOverlay};
pub use search::SearchResolver;
