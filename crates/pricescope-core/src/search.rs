//! Free-text company search

use crate::api::MarketDataService;
use crate::error::{DashboardError, Result};
use crate::model::{CompanyRef, SearchResult};

/// Holds the suggestion slot and runs resolutions against the service
#[derive(Debug, Clone, Default)]
pub struct SearchResolver {
    suggestions: Vec<CompanyRef>,
}

impl SearchResolver {
    /// Trimmed query, or `None` when there is nothing to search for
    pub fn normalize(query: &str) -> Option<String> {
        let trimmed = query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Resolve a normalized query.
    ///
    /// An empty suggestion list or a resolution without a name is reported as
    /// [`DashboardError::NoMatch`], so callers only see usable results.
    pub async fn resolve(service: &dyn MarketDataService, query: &str) -> Result<SearchResult> {
        match service.search_or_resolve(query).await? {
            SearchResult::Suggestions(list) if list.is_empty() => {
                Err(DashboardError::NoMatch(query.to_string()))
            }
            SearchResult::Resolved(resolution) if resolution.company.name.trim().is_empty() => {
                Err(DashboardError::NoMatch(query.to_string()))
            }
            result => Ok(result),
        }
    }

    pub fn suggestions(&self) -> &[CompanyRef] {
        &self.suggestions
    }

    pub fn suggestion(&self, index: usize) -> Option<&CompanyRef> {
        self.suggestions.get(index)
    }

    pub fn show(&mut self, suggestions: Vec<CompanyRef>) {
        self.suggestions = suggestions;
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
    }
}
