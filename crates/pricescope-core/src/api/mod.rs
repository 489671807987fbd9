//! Remote market data service
//!
//! The dashboard consumes four operations. [`MarketDataService`] is the seam;
//! [`HttpMarketClient`] talks to the REST backend and
//! [`crate::cache::CachedMarketService`] decorates any implementation with a
//! response cache.

pub mod http;
pub mod wire;

use crate::error::Result;
use crate::model::{Horizon, ModelId, PredictionPoint, PricePoint, SearchResult, Timeframe};
use async_trait::async_trait;
use std::sync::Arc;

pub use http::HttpMarketClient;

/// Operations the dashboard needs from the market data backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// All known company names, in server order
    async fn list_companies(&self) -> Result<Vec<String>>;

    /// Resolve a free-text query to a company (with its initial history) or suggestions
    async fn search_or_resolve(&self, query: &str) -> Result<SearchResult>;

    /// Historical closes for a company over a timeframe
    async fn get_history(&self, company: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>>;

    /// Forecast closes for a company
    async fn get_prediction(
        &self,
        company: &str,
        horizon: Horizon,
        model: &ModelId,
    ) -> Result<Vec<PredictionPoint>>;
}

#[async_trait]
impl<T: MarketDataService + ?Sized> MarketDataService for Arc<T> {
    async fn list_companies(&self) -> Result<Vec<String>> {
        (**self).list_companies().await
    }

    async fn search_or_resolve(&self, query: &str) -> Result<SearchResult> {
        (**self).search_or_resolve(query).await
    }

    async fn get_history(&self, company: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        (**self).get_history(company, timeframe).await
    }

    async fn get_prediction(
        &self,
        company: &str,
        horizon: Horizon,
        model: &ModelId,
    ) -> Result<Vec<PredictionPoint>> {
        (**self).get_prediction(company, horizon, model).await
    }
}
