//! REST client for the market data backend

use super::MarketDataService;
use super::wire::{self, HistoryBody, PredictionBody, SearchBody};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::model::{Horizon, ModelId, PredictionPoint, PricePoint, SearchResult, Timeframe};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// HTTP client for the backend's `/all_companies` and `/stock/...` routes
#[derive(Debug, Clone)]
pub struct HttpMarketClient {
    client: Client,
    base_url: Url,
}

impl HttpMarketClient {
    /// Create a client from the dashboard configuration
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DashboardError::Config(format!("cannot extend base url {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T> {
        debug!(%url, ?query, "GET");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message: wire::error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketDataService for HttpMarketClient {
    async fn list_companies(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["all_companies"])?;
        self.get(url, &[]).await
    }

    async fn search_or_resolve(&self, query: &str) -> Result<SearchResult> {
        let url = self.endpoint(&["stock", query])?;

        match self.get::<SearchBody>(url, &[]).await {
            Ok(body) => body.into_result(query),
            Err(DashboardError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(DashboardError::NoMatch(query.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn get_history(&self, company: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        let url = self.endpoint(&["stock", "history", company])?;
        let body: HistoryBody = self.get(url, &[("timeframe", timeframe.as_str())]).await?;
        body.into_series()
    }

    async fn get_prediction(
        &self,
        company: &str,
        horizon: Horizon,
        model: &ModelId,
    ) -> Result<Vec<PredictionPoint>> {
        let url = self.endpoint(&["stock", "predict", company])?;
        let body: PredictionBody = self
            .get(
                url,
                &[("timeframe", horizon.as_str()), ("model_type", model.as_str())],
            )
            .await?;
        body.into_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpMarketClient {
        let config = DashboardConfig::builder().api_base_url(base).build().unwrap();
        HttpMarketClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_company_names() {
        let client = client("http://localhost:8000");
        let url = client.endpoint(&["stock", "history", "AT&T Inc./Class A"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/stock/history/AT&T%20Inc.%2FClass%20A"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://example.com/api/");
        let url = client.endpoint(&["all_companies"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/all_companies");
    }

    #[tokio::test]
    #[ignore] // Requires a running backend
    async fn test_list_companies_live() {
        let client = HttpMarketClient::new(&DashboardConfig::from_env().unwrap()).unwrap();
        let names = client.list_companies().await.unwrap();
        assert!(!names.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires a running backend
    async fn test_history_live() {
        let client = HttpMarketClient::new(&DashboardConfig::from_env().unwrap()).unwrap();
        let names = client.list_companies().await.unwrap();
        let series = client
            .get_history(&names[0], Timeframe::OneMonth)
            .await
            .unwrap();
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }
}
