//! View model handed to the rendering side

use crate::directory::CompanyDirectory;
use crate::history::PriceChange;
use crate::metrics::FormattedMetrics;
use crate::model::{CompanyRef, Horizon, ModelId, PricePoint, Timeframe};
use crate::overlay::ComposedSeries;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Controller state as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DashboardState {
    Idle,
    Searching,
    SuggestionsShown,
    CompanySelected,
    HistoryLoading,
    Predicting,
}

impl DashboardState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::SuggestionsShown => "suggestions",
            Self::CompanySelected => "selected",
            Self::HistoryLoading => "loading history",
            Self::Predicting => "predicting",
        }
    }
}

impl fmt::Display for DashboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected company with its series and everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionView {
    pub company: CompanyRef,
    pub timeframe: Timeframe,
    pub series: Vec<PricePoint>,
    pub current_price: Option<f64>,
    pub price_change: Option<PriceChange>,
    pub metrics: FormattedMetrics,
}

impl SelectionView {
    /// `+1.23 (0.45%) 1Y`, if the series allows one
    pub fn change_label(&self) -> Option<String> {
        self.price_change.map(|change| change.display(self.timeframe))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub model: ModelId,
    pub horizon: Horizon,
    /// The model or horizon selection has changed since the forecast was made
    pub stale: bool,
    pub boundary: Option<NaiveDateTime>,
}

/// Snapshot of everything the renderer may show
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub state: DashboardState,
    #[serde(skip)]
    pub companies: Arc<CompanyDirectory>,
    pub companies_loaded: bool,
    pub suggestions: Vec<CompanyRef>,
    pub selection: Option<SelectionView>,
    pub chart: ComposedSeries,
    pub overlay: Option<OverlayView>,
    pub model: ModelId,
    pub horizon: Horizon,
    pub is_loading_companies: bool,
    pub is_searching: bool,
    pub is_loading_history: bool,
    pub is_predicting: bool,
}

impl DashboardView {
    /// No request of any kind is outstanding
    pub fn is_idle(&self) -> bool {
        !(self.is_loading_companies || self.is_searching || self.is_loading_history || self.is_predicting)
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.company.name.as_str())
    }

    pub fn predict_label(&self) -> String {
        if self.is_predicting {
            "Predicting...".to_string()
        } else {
            format!("Predict {} Ahead", self.horizon)
        }
    }
}
