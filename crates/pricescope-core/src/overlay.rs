//! Forecast overlay and chart series composition

use crate::api::MarketDataService;
use crate::error::{DashboardError, Result};
use crate::model::{Horizon, LabelGranularity, ModelId, PredictionPoint, PricePoint};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Whether a chart point is observed or forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointKind {
    Historical,
    Predicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDateTime,
    pub close: f64,
    pub kind: PointKind,
}

/// Renderable sequence, optionally split by a history/forecast boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposedSeries {
    pub points: Vec<ChartPoint>,
    /// Date of the first forecast point
    pub boundary: Option<NaiveDateTime>,
}

impl ComposedSeries {
    /// Plain history chart with no forecast
    pub fn history(series: &[PricePoint]) -> Self {
        Self {
            points: series
                .iter()
                .map(|p| ChartPoint {
                    date: p.date,
                    close: p.close,
                    kind: PointKind::Historical,
                })
                .collect(),
            boundary: None,
        }
    }

    pub fn has_forecast(&self) -> bool {
        self.boundary.is_some()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forecast charts always label by month and day
    pub fn label_granularity(&self, history: LabelGranularity) -> LabelGranularity {
        if self.has_forecast() {
            LabelGranularity::MonthDay
        } else {
            history
        }
    }
}

/// Keep only points strictly after `last_history` and strictly increasing.
///
/// Returns the kept points and how many were dropped.
pub fn sanitize(
    last_history: Option<NaiveDateTime>,
    points: Vec<PredictionPoint>,
) -> (Vec<PredictionPoint>, usize) {
    let total = points.len();
    let mut floor = last_history;
    let kept: Vec<_> = points
        .into_iter()
        .filter(|p| {
            if floor.is_some_and(|f| p.date <= f) {
                return false;
            }
            floor = Some(p.date);
            true
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Trailing `window` history points followed by the forecast
pub fn compose(history: &[PricePoint], predictions: &[PredictionPoint], window: usize) -> ComposedSeries {
    let tail = &history[history.len().saturating_sub(window)..];
    let (predictions, _) = sanitize(tail.last().map(|p| p.date), predictions.to_vec());

    let mut composed = ComposedSeries::history(tail);
    composed.boundary = predictions.first().map(|p| p.date);
    composed.points.extend(predictions.iter().map(|p| ChartPoint {
        date: p.date,
        close: p.close,
        kind: PointKind::Predicted,
    }));
    composed
}

/// A forecast and the request it answered
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub model: ModelId,
    pub horizon: Horizon,
    pub points: Vec<PredictionPoint>,
}

impl Overlay {
    /// Whether the overlay no longer matches the next request's parameters
    pub fn is_stale(&self, model: &ModelId, horizon: Horizon) -> bool {
        &self.model != model || self.horizon != horizon
    }
}

/// Slot holding at most one forecast overlay
#[derive(Debug, Clone, Default)]
pub struct PredictionOverlay {
    current: Option<Overlay>,
}

impl PredictionOverlay {
    pub async fn request(
        service: &dyn MarketDataService,
        company: &str,
        horizon: Horizon,
        model: &ModelId,
    ) -> Result<Vec<PredictionPoint>> {
        service.get_prediction(company, horizon, model).await
    }

    /// Replace the overlay, dropping points that overlap the history.
    ///
    /// Returns the number of dropped points.
    pub fn install(
        &mut self,
        company: &str,
        model: ModelId,
        horizon: Horizon,
        points: Vec<PredictionPoint>,
        last_history: Option<NaiveDateTime>,
    ) -> usize {
        let (points, dropped) = sanitize(last_history, points);
        if dropped > 0 {
            let anomaly = DashboardError::DataIntegrity(format!(
                "{dropped} forecast point(s) not after the last observed date"
            ));
            tracing::warn!("Dropping forecast for {}: {}", company, anomaly);
        }
        self.current = Some(Overlay {
            model,
            horizon,
            points,
        });
        dropped
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Overlay> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Chart for the given history: overlay composition when a forecast is
    /// present, the full series otherwise
    pub fn chart(&self, history: &[PricePoint], window: usize) -> ComposedSeries {
        match &self.current {
            Some(overlay) if !overlay.points.is_empty() => compose(history, &overlay.points, window),
            _ => ComposedSeries::history(history),
        }
    }
}
