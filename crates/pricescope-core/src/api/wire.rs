//! JSON bodies of the REST backend and their conversion into domain types

use crate::error::{DashboardError, Result};
use crate::model::{
    CompanyRef, FundamentalsSnapshot, PredictionPoint, PricePoint, Resolution, SearchResult,
};
use serde::Deserialize;

/// Reply of `GET /stock/{query}`
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub suggestions: Option<Vec<CompanyRef>>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<PricePoint>>,
    #[serde(default)]
    pub metrics: Option<FundamentalsSnapshot>,
}

impl SearchBody {
    /// Interpret the body; a reply with neither variant is a miss for `query`
    pub fn into_result(self, query: &str) -> Result<SearchResult> {
        if let Some(suggestions) = self.suggestions.filter(|s| !s.is_empty()) {
            return Ok(SearchResult::Suggestions(suggestions));
        }

        match self.company_name {
            Some(name) if !name.trim().is_empty() => Ok(SearchResult::Resolved(Resolution {
                company: CompanyRef::new(name, self.ticker.unwrap_or_default()),
                history: self.history.unwrap_or_default(),
                fundamentals: self.metrics.unwrap_or_default(),
            })),
            _ => Err(DashboardError::NoMatch(query.to_string())),
        }
    }
}

/// Reply of `GET /stock/history/{name}`
#[derive(Debug, Deserialize)]
pub struct HistoryBody {
    #[serde(default)]
    pub history: Option<Vec<PricePoint>>,
}

impl HistoryBody {
    pub fn into_series(self) -> Result<Vec<PricePoint>> {
        self.history
            .ok_or_else(|| DashboardError::MalformedReply("history reply without history".to_string()))
    }
}

/// Reply of `GET /stock/predict/{name}`
#[derive(Debug, Deserialize)]
pub struct PredictionBody {
    #[serde(default)]
    pub predictions: Option<Vec<PredictionPoint>>,
}

impl PredictionBody {
    pub fn into_points(self) -> Result<Vec<PredictionPoint>> {
        self.predictions.ok_or_else(|| {
            DashboardError::MalformedReply("prediction reply without predictions".to_string())
        })
    }
}

/// FastAPI error body, `{"detail": "..."}`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

/// Best-effort human message from an error reply
pub fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}
