//! Caching layer for service replies to reduce repeated fetches

use crate::api::MarketDataService;
use crate::error::Result;
use crate::model::{Horizon, ModelId, PredictionPoint, PricePoint, SearchResult, Timeframe};
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for service requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Operation name
    pub endpoint: String,
    /// Company the request is about; empty for list operations
    pub subject: String,
    /// Additional parameters as JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(endpoint: impl Into<String>, subject: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            endpoint: endpoint.into(),
            subject: subject.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe TTL cache of JSON-encoded replies
pub struct ResponseCache {
    cache: Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>,
}

impl ResponseCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get a typed value, or fetch and cache it.
    ///
    /// Entries that no longer decode as `T` are treated as misses.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key).await {
            if let Ok(hit) = serde_json::from_value(value) {
                tracing::debug!("Cache hit for key: {:?}", key);
                return Ok(hit);
            }
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let fetched = fetcher().await?;
        self.insert(key, serde_json::to_value(&fetched)?).await;

        Ok(fetched)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for ResponseCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Service decorator caching the company list and history replies.
///
/// Searches and predictions always go to the inner service.
pub struct CachedMarketService<S> {
    inner: S,
    cache: ResponseCache,
}

impl<S: MarketDataService> CachedMarketService<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: ResponseCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

#[async_trait]
impl<S: MarketDataService> MarketDataService for CachedMarketService<S> {
    async fn list_companies(&self) -> Result<Vec<String>> {
        let key = CacheKey::new("all_companies", "", ());
        self.cache
            .get_or_fetch(key, || self.inner.list_companies())
            .await
    }

    async fn search_or_resolve(&self, query: &str) -> Result<SearchResult> {
        self.inner.search_or_resolve(query).await
    }

    async fn get_history(&self, company: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
        let key = CacheKey::new("history", company, timeframe);
        self.cache
            .get_or_fetch(key, || self.inner.get_history(company, timeframe))
            .await
    }

    async fn get_prediction(
        &self,
        company: &str,
        horizon: Horizon,
        model: &ModelId,
    ) -> Result<Vec<PredictionPoint>> {
        self.inner.get_prediction(company, horizon, model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataService;
    use crate::error::DashboardError;
    use crate::model::fixtures;

    #[tokio::test]
    async fn test_cache_key_creation() {
        let key = CacheKey::new("history", "Acme Corp", Timeframe::OneMonth);
        assert_eq!(key.subject, "Acme Corp");
        assert_eq!(key.endpoint, "history");
        assert_eq!(key.params, "\"1M\"");
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::new("all_companies", "", ());
        let value = serde_json::json!(["Acme Corp"]);

        cache.insert(key.clone(), value.clone()).await;

        assert_eq!(cache.get(&key).await, Some(value));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::new("history", "Acme Corp", Timeframe::OneYear);
        let series = fixtures::series(&[10.0, 11.0]);

        let mut call_count = 0;
        let first: Vec<PricePoint> = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                let series = series.clone();
                async move { Ok(series) }
            })
            .await
            .unwrap();
        assert_eq!(first, series);
        assert_eq!(call_count, 1);

        let second: Vec<PricePoint> = cache
            .get_or_fetch(key, || {
                call_count += 1;
                async { Ok(Vec::new()) }
            })
            .await
            .unwrap();
        assert_eq!(second, series);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::new("all_companies", "", ());

        let result: Result<Vec<String>> = cache
            .get_or_fetch(key.clone(), || async {
                Err(DashboardError::Other("down".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60));

        for tf in Timeframe::ALL {
            let key = CacheKey::new("history", "Acme Corp", tf);
            cache.insert(key, serde_json::json!([])).await;
        }
        assert_eq!(cache.len().await, 7);

        cache
            .invalidate(&CacheKey::new("history", "Acme Corp", Timeframe::Max))
            .await;
        assert_eq!(cache.len().await, 6);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cached_service_hits_inner_once_per_key() {
        let mut inner = MockMarketDataService::new();
        inner
            .expect_get_history()
            .withf(|company, tf| company == "Acme Corp" && *tf == Timeframe::OneYear)
            .times(1)
            .returning(|_, _| Ok(fixtures::series(&[1.0, 2.0, 3.0])));
        inner
            .expect_get_history()
            .withf(|_, tf| *tf == Timeframe::OneMonth)
            .times(1)
            .returning(|_, _| Ok(fixtures::series(&[2.0, 3.0])));
        inner
            .expect_list_companies()
            .times(1)
            .returning(|| Ok(vec!["Acme Corp".to_string()]));

        let service = CachedMarketService::new(inner, Duration::from_secs(60));

        let a = service.get_history("Acme Corp", Timeframe::OneYear).await.unwrap();
        let b = service.get_history("Acme Corp", Timeframe::OneYear).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);

        let month = service.get_history("Acme Corp", Timeframe::OneMonth).await.unwrap();
        assert_eq!(month.len(), 2);

        service.list_companies().await.unwrap();
        let names = service.list_companies().await.unwrap();
        assert_eq!(names, vec!["Acme Corp".to_string()]);
        assert_eq!(service.cache().len().await, 3);
    }

    #[tokio::test]
    async fn test_cached_service_never_caches_predictions() {
        let mut inner = MockMarketDataService::new();
        inner
            .expect_get_prediction()
            .times(2)
            .returning(|_, _, _| Ok(Vec::new()));

        let service = CachedMarketService::new(inner, Duration::from_secs(60));
        let model = ModelId::tree();
        service.get_prediction("Acme Corp", Horizon::OneWeek, &model).await.unwrap();
        service.get_prediction("Acme Corp", Horizon::OneWeek, &model).await.unwrap();
        assert!(service.cache().is_empty().await);
    }
}
