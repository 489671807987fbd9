//! Intent handling and response application

use super::view::{DashboardState, DashboardView, OverlayView, SelectionView};
use crate::api::MarketDataService;
use crate::config::DashboardConfig;
use crate::directory::CompanyDirectory;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::metrics::MetricsProjector;
use crate::model::{Horizon, ModelId, PredictionPoint, PricePoint, SearchResult, Timeframe};
use crate::overlay::PredictionOverlay;
use crate::search::SearchResolver;
use std::sync::Arc;

/// User intents the dashboard accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Free-text search
    Submit(String),
    /// Exact company name, e.g. picked from the directory
    SelectCompany(String),
    /// Zero-based index into the shown suggestions
    PickSuggestion(usize),
    ChangeTimeframe(Timeframe),
    SelectModel(ModelId),
    SelectHorizon(Horizon),
    Predict,
}

/// Independent data slots; at most one request per slot is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Companies,
    Search,
    History,
    Prediction,
}

/// Identity of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub slot: Slot,
    pub seq: u64,
}

/// A remote call the controller wants performed
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Companies {
        ticket: Ticket,
    },
    Search {
        ticket: Ticket,
        query: String,
    },
    History {
        ticket: Ticket,
        company: String,
        timeframe: Timeframe,
    },
    Prediction {
        ticket: Ticket,
        company: String,
        horizon: Horizon,
        model: ModelId,
    },
}

impl Fetch {
    /// Ticket the eventual outcome will carry
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Companies { ticket }
            | Self::Search { ticket, .. }
            | Self::History { ticket, .. }
            | Self::Prediction { ticket, .. } => *ticket,
        }
    }

    /// Perform the call; failures are carried in the outcome
    pub async fn execute(self, service: Arc<dyn MarketDataService>) -> Outcome {
        match self {
            Self::Companies { ticket } => Outcome::Companies {
                ticket,
                result: service.list_companies().await,
            },
            Self::Search { ticket, query } => {
                let result = SearchResolver::resolve(service.as_ref(), &query).await;
                Outcome::Search { ticket, query, result }
            }
            Self::History {
                ticket,
                company,
                timeframe,
            } => {
                let result = HistoryStore::load(service.as_ref(), &company, timeframe).await;
                Outcome::History {
                    ticket,
                    company,
                    timeframe,
                    result,
                }
            }
            Self::Prediction {
                ticket,
                company,
                horizon,
                model,
            } => {
                let result = PredictionOverlay::request(service.as_ref(), &company, horizon, &model).await;
                Outcome::Prediction {
                    ticket,
                    company,
                    horizon,
                    model,
                    result,
                }
            }
        }
    }
}

/// A completed fetch, tagged with the request it answers
#[derive(Debug)]
pub enum Outcome {
    Companies {
        ticket: Ticket,
        result: Result<Vec<String>>,
    },
    Search {
        ticket: Ticket,
        query: String,
        result: Result<SearchResult>,
    },
    History {
        ticket: Ticket,
        company: String,
        timeframe: Timeframe,
        result: Result<Vec<PricePoint>>,
    },
    Prediction {
        ticket: Ticket,
        company: String,
        horizon: Horizon,
        model: ModelId,
        result: Result<Vec<PredictionPoint>>,
    },
}

impl Outcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Companies { ticket, .. }
            | Self::Search { ticket, .. }
            | Self::History { ticket, .. }
            | Self::Prediction { ticket, .. } => *ticket,
        }
    }
}

/// Currently active ticket per slot
#[derive(Debug, Default)]
struct InFlight {
    companies: Option<Ticket>,
    search: Option<Ticket>,
    history: Option<Ticket>,
    prediction: Option<Ticket>,
}

impl InFlight {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Ticket> {
        match slot {
            Slot::Companies => &mut self.companies,
            Slot::Search => &mut self.search,
            Slot::History => &mut self.history,
            Slot::Prediction => &mut self.prediction,
        }
    }

    /// Release the slot if `ticket` is its active request
    fn settle(&mut self, ticket: Ticket) -> bool {
        let active = self.slot_mut(ticket.slot);
        if *active == Some(ticket) {
            *active = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Suggestions,
    Selected,
}

/// The dashboard state machine.
///
/// Owns every data slot. Nothing here performs I/O; see
/// [`super::DashboardRuntime`] for the driver.
#[derive(Debug)]
pub struct DashboardController {
    directory: Arc<CompanyDirectory>,
    companies_loaded: bool,
    resolver: SearchResolver,
    history: HistoryStore,
    overlay: PredictionOverlay,
    phase: Phase,
    model: ModelId,
    horizon: Horizon,
    initial_timeframe: Timeframe,
    overlay_window: usize,
    inflight: InFlight,
    next_seq: u64,
}

impl DashboardController {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            directory: Arc::new(CompanyDirectory::default()),
            companies_loaded: false,
            resolver: SearchResolver::default(),
            history: HistoryStore::default(),
            overlay: PredictionOverlay::default(),
            phase: Phase::Idle,
            model: config.default_model.clone(),
            horizon: config.default_horizon,
            initial_timeframe: config.default_timeframe,
            overlay_window: config.overlay_window,
            inflight: InFlight::default(),
            next_seq: 0,
        }
    }

    /// Company list request, issued once
    pub fn start(&mut self) -> Option<Fetch> {
        if self.companies_loaded || self.inflight.companies.is_some() {
            return None;
        }
        let ticket = self.issue(Slot::Companies);
        Some(Fetch::Companies { ticket })
    }

    /// Apply an intent, returning the fetch it requires if any
    pub fn handle(&mut self, intent: Intent) -> Option<Fetch> {
        tracing::debug!("Handling intent: {:?}", intent);

        match intent {
            Intent::Submit(query) | Intent::SelectCompany(query) => {
                let query = SearchResolver::normalize(&query)?;
                Some(self.begin_search(query))
            }
            Intent::PickSuggestion(index) => {
                let Some(name) = self.resolver.suggestion(index).map(|c| c.name.clone()) else {
                    tracing::debug!("No suggestion at index {}", index);
                    return None;
                };
                Some(self.begin_search(name))
            }
            Intent::ChangeTimeframe(timeframe) => {
                let company = self.history.company()?.name.clone();
                let ticket = self.issue(Slot::History);
                Some(Fetch::History {
                    ticket,
                    company,
                    timeframe,
                })
            }
            Intent::SelectModel(model) => {
                self.model = model;
                None
            }
            Intent::SelectHorizon(horizon) => {
                self.horizon = horizon;
                None
            }
            Intent::Predict => {
                let company = self.history.company()?.name.clone();
                let ticket = self.issue(Slot::Prediction);
                Some(Fetch::Prediction {
                    ticket,
                    company,
                    horizon: self.horizon,
                    model: self.model.clone(),
                })
            }
        }
    }

    /// Apply a completed fetch; superseded responses are discarded
    pub fn apply(&mut self, outcome: Outcome) {
        let ticket = outcome.ticket();
        if !self.inflight.settle(ticket) {
            tracing::debug!("Discarding superseded {:?} response #{}", ticket.slot, ticket.seq);
            return;
        }

        match outcome {
            Outcome::Companies { result, .. } => match result {
                Ok(names) => {
                    self.directory = Arc::new(CompanyDirectory::new(names));
                    self.companies_loaded = true;
                    tracing::info!("Loaded {} companies", self.directory.len());
                }
                Err(e) => tracing::warn!("Failed to load company list: {}", e),
            },
            Outcome::Search { query, result, .. } => self.apply_search(&query, result),
            Outcome::History {
                company,
                timeframe,
                result,
                ..
            } => match result {
                Ok(series) if self.history.is_selected(&company) => {
                    self.history.replace_series(timeframe, series);
                }
                Ok(_) => tracing::debug!("Dropping {} history for deselected {}", timeframe, company),
                Err(e) => {
                    tracing::warn!("Failed to load {} history for {}: {}", timeframe, company, e);
                }
            },
            Outcome::Prediction {
                company,
                horizon,
                model,
                result,
                ..
            } => match (result, self.history.company()) {
                (Ok(points), Some(selected)) if selected.name == company => {
                    let last = self.history.last_date();
                    self.overlay.install(&company, model, horizon, points, last);
                }
                (Ok(_), _) => tracing::debug!("Dropping forecast for deselected {}", company),
                (Err(e), _) => {
                    tracing::warn!("Prediction failed for {}: {}", company, e);
                    self.overlay.clear();
                }
            },
        }
    }

    fn apply_search(&mut self, query: &str, result: Result<SearchResult>) {
        match result {
            Ok(SearchResult::Resolved(resolution)) => {
                tracing::debug!("Resolved '{}' to {}", query, resolution.company);
                self.history.select(
                    resolution.company,
                    self.initial_timeframe,
                    resolution.history,
                    resolution.fundamentals,
                );
                self.phase = Phase::Selected;
            }
            Ok(SearchResult::Suggestions(suggestions)) => {
                tracing::debug!("'{}' is ambiguous: {} suggestions", query, suggestions.len());
                self.resolver.show(suggestions);
                self.phase = Phase::Suggestions;
            }
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {}", query, e);
                self.reset();
            }
        }
    }

    /// Clear every slot and supersede outstanding data requests
    fn begin_search(&mut self, query: String) -> Fetch {
        self.reset();
        self.inflight.history = None;
        self.inflight.prediction = None;
        let ticket = self.issue(Slot::Search);
        Fetch::Search { ticket, query }
    }

    fn reset(&mut self) {
        self.resolver.clear();
        self.history.clear();
        self.overlay.clear();
        self.phase = Phase::Idle;
    }

    fn issue(&mut self, slot: Slot) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket {
            slot,
            seq: self.next_seq,
        };
        *self.inflight.slot_mut(slot) = Some(ticket);
        ticket
    }

    pub fn state(&self) -> DashboardState {
        if self.inflight.search.is_some() {
            return DashboardState::Searching;
        }
        match self.phase {
            Phase::Idle => DashboardState::Idle,
            Phase::Suggestions => DashboardState::SuggestionsShown,
            Phase::Selected if self.inflight.history.is_some() => DashboardState::HistoryLoading,
            Phase::Selected if self.inflight.prediction.is_some() => DashboardState::Predicting,
            Phase::Selected => DashboardState::CompanySelected,
        }
    }

    pub fn directory(&self) -> &CompanyDirectory {
        &self.directory
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Project the current slots into a view model
    pub fn view(&self) -> DashboardView {
        let selection = self.history.company().map(|company| SelectionView {
            company: company.clone(),
            timeframe: self.history.timeframe(),
            series: self.history.series().to_vec(),
            current_price: self.history.current_price(),
            price_change: self.history.price_change(),
            metrics: MetricsProjector::project(self.history.fundamentals()),
        });

        let chart = self.overlay.chart(self.history.series(), self.overlay_window);
        let overlay = self.overlay.current().map(|overlay| OverlayView {
            model: overlay.model.clone(),
            horizon: overlay.horizon,
            stale: overlay.is_stale(&self.model, self.horizon),
            boundary: chart.boundary,
        });

        DashboardView {
            state: self.state(),
            companies: Arc::clone(&self.directory),
            companies_loaded: self.companies_loaded,
            suggestions: self.resolver.suggestions().to_vec(),
            selection,
            chart,
            overlay,
            model: self.model.clone(),
            horizon: self.horizon,
            is_loading_companies: self.inflight.companies.is_some(),
            is_searching: self.inflight.search.is_some(),
            is_loading_history: self.inflight.history.is_some(),
            is_predicting: self.inflight.prediction.is_some(),
        }
    }
}
