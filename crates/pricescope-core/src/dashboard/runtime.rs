//! Single-actor driver for the dashboard controller

use super::controller::{DashboardController, Fetch, Intent, Outcome};
use super::view::DashboardView;
use crate::api::MarketDataService;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const INTENT_BUFFER: usize = 32;

struct Envelope {
    intent: Intent,
    handled: oneshot::Sender<()>,
}

/// Handle to a running dashboard.
///
/// One task owns the controller. Intents are processed in the order they are
/// sent; remote calls run concurrently and are applied as they complete.
pub struct DashboardRuntime {
    intents: mpsc::Sender<Envelope>,
    views: watch::Receiver<DashboardView>,
    task: JoinHandle<()>,
}

impl DashboardRuntime {
    /// Spawn the actor and start loading the company list
    pub fn spawn(service: Arc<dyn MarketDataService>, config: &DashboardConfig) -> Self {
        let mut controller = DashboardController::new(config);
        let startup = controller.start();
        let (view_tx, views) = watch::channel(controller.view());
        let (intents, intent_rx) = mpsc::channel(INTENT_BUFFER);
        let task = tokio::spawn(run(controller, startup, service, intent_rx, view_tx));

        Self { intents, views, task }
    }

    /// Send an intent and wait until the controller has handled it.
    ///
    /// Returns once the intent is reflected in the published view; any fetch
    /// it started may still be in flight.
    pub async fn dispatch(&self, intent: Intent) -> Result<()> {
        let (handled, ack) = oneshot::channel();
        self.intents
            .send(Envelope { intent, handled })
            .await
            .map_err(|_| stopped())?;
        ack.await.map_err(|_| stopped())
    }

    /// Latest published view
    pub fn view(&self) -> DashboardView {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.views.clone()
    }

    /// Wait for the first view satisfying `predicate`
    pub async fn wait_for(&self, predicate: impl FnMut(&DashboardView) -> bool) -> Result<DashboardView> {
        let mut views = self.views.clone();
        let view = views.wait_for(predicate).await.map_err(|_| stopped())?;
        Ok(view.clone())
    }

    /// Wait until no request is outstanding
    pub async fn wait_idle(&self) -> Result<DashboardView> {
        self.wait_for(DashboardView::is_idle).await
    }

    /// Stop the actor; in-flight responses are dropped
    pub async fn shutdown(self) {
        drop(self.intents);
        if let Err(e) = self.task.await {
            tracing::warn!("Dashboard task ended abnormally: {}", e);
        }
    }
}

fn stopped() -> DashboardError {
    DashboardError::Other("dashboard runtime has stopped".to_string())
}

async fn run(
    mut controller: DashboardController,
    startup: Option<Fetch>,
    service: Arc<dyn MarketDataService>,
    mut intents: mpsc::Receiver<Envelope>,
    views: watch::Sender<DashboardView>,
) {
    let mut pending: FuturesUnordered<BoxFuture<'static, Outcome>> = FuturesUnordered::new();
    let launch = |fetch: Fetch| {
        let ticket = fetch.ticket();
        tracing::trace!("Starting {:?} request #{}", ticket.slot, ticket.seq);
        fetch.execute(Arc::clone(&service)).boxed()
    };

    if let Some(fetch) = startup {
        pending.push(launch(fetch));
    }

    loop {
        tokio::select! {
            envelope = intents.recv() => {
                let Some(Envelope { intent, handled }) = envelope else {
                    tracing::debug!("Intent channel closed, stopping dashboard");
                    break;
                };
                if let Some(fetch) = controller.handle(intent) {
                    pending.push(launch(fetch));
                }
                views.send_replace(controller.view());
                let _ = handled.send(());
            }
            Some(outcome) = pending.next(), if !pending.is_empty() => {
                controller.apply(outcome);
                views.send_replace(controller.view());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardState;
    use crate::model::fixtures::{day, series};
    use crate::model::{
        CompanyRef, FundamentalsSnapshot, Horizon, ModelId, PredictionPoint, PricePoint, Resolution,
        SearchResult, Timeframe,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// In-memory service whose replies can be held back per request key
    #[derive(Default)]
    struct GatedService {
        gates: Mutex<HashMap<String, Arc<Notify>>>,
    }

    impl GatedService {
        fn hold(&self, key: &str) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.gates
                .lock()
                .unwrap()
                .insert(key.to_string(), Arc::clone(&gate));
            gate
        }

        async fn pass(&self, key: &str) {
            let gate = self.gates.lock().unwrap().get(key).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
        }
    }

    fn closes_for(name: &str) -> &'static [f64] {
        if name == "Acme Corp" { &[1.0, 2.0] } else { &[7.0, 8.0, 9.0] }
    }

    #[async_trait]
    impl MarketDataService for GatedService {
        async fn list_companies(&self) -> Result<Vec<String>> {
            Ok(vec!["Acme Corp".to_string(), "Other Co".to_string()])
        }

        async fn search_or_resolve(&self, query: &str) -> Result<SearchResult> {
            self.pass(query).await;
            match query {
                "ac" => Ok(SearchResult::Suggestions(vec![
                    CompanyRef::new("Acme Corp", "ACME"),
                    CompanyRef::new("Other Co", "OTH"),
                ])),
                "zzz" => Err(DashboardError::NoMatch(query.to_string())),
                name => Ok(SearchResult::Resolved(Resolution {
                    company: CompanyRef::new(name, ""),
                    history: series(closes_for(name)),
                    fundamentals: FundamentalsSnapshot::default(),
                })),
            }
        }

        async fn get_history(&self, company: &str, timeframe: Timeframe) -> Result<Vec<PricePoint>> {
            self.pass(&format!("{company}/{timeframe}")).await;
            let len = match timeframe {
                Timeframe::OneMonth => 4,
                Timeframe::SixMonths => 6,
                _ => 2,
            };
            Ok(series(&[10.0].repeat(len)))
        }

        async fn get_prediction(
            &self,
            company: &str,
            _horizon: Horizon,
            model: &ModelId,
        ) -> Result<Vec<PredictionPoint>> {
            self.pass(&format!("{company}/predict/{}", model.as_str())).await;
            let close = if *model == ModelId::tree() { 12.0 } else { 11.0 };
            Ok(vec![PredictionPoint::new(day(30), close)])
        }
    }

    async fn started(service: Arc<GatedService>) -> DashboardRuntime {
        let runtime = DashboardRuntime::spawn(service, &DashboardConfig::default());
        let view = runtime.wait_idle().await.unwrap();
        assert!(view.companies_loaded);
        runtime
    }

    #[tokio::test]
    async fn test_search_resolves_through_runtime() {
        let runtime = started(Arc::new(GatedService::default())).await;
        assert_eq!(runtime.view().companies.len(), 2);

        runtime.dispatch(Intent::Submit("ac".to_string())).await.unwrap();
        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.suggestions.len(), 2);

        runtime.dispatch(Intent::PickSuggestion(0)).await.unwrap();
        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.selected_name(), Some("Acme Corp"));
        assert!(view.suggestions.is_empty());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_search_response_is_discarded() {
        let service = Arc::new(GatedService::default());
        let gate = service.hold("Acme Corp");
        let runtime = started(Arc::clone(&service)).await;

        runtime.dispatch(Intent::Submit("Acme Corp".to_string())).await.unwrap();
        assert!(runtime.view().is_searching);
        runtime.dispatch(Intent::Submit("Other Co".to_string())).await.unwrap();

        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.selected_name(), Some("Other Co"));

        let mut views = runtime.subscribe();
        views.borrow_and_update();
        gate.notify_one();
        views.changed().await.unwrap();

        let view = views.borrow().clone();
        assert_eq!(view.selected_name(), Some("Other Co"));
        assert!(view.is_idle());
        assert_eq!(view.selection.as_ref().unwrap().series.len(), 3);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_history_response_is_discarded() {
        let service = Arc::new(GatedService::default());
        let gate = service.hold("Acme Corp/1M");
        let runtime = started(Arc::clone(&service)).await;

        runtime.dispatch(Intent::SelectCompany("Acme Corp".to_string())).await.unwrap();
        runtime.wait_idle().await.unwrap();

        runtime.dispatch(Intent::ChangeTimeframe(Timeframe::OneMonth)).await.unwrap();
        runtime.dispatch(Intent::ChangeTimeframe(Timeframe::SixMonths)).await.unwrap();
        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.selection.as_ref().unwrap().timeframe, Timeframe::SixMonths);

        let mut views = runtime.subscribe();
        views.borrow_and_update();
        gate.notify_one();
        views.changed().await.unwrap();

        let selection = runtime.view().selection.unwrap();
        assert_eq!(selection.timeframe, Timeframe::SixMonths);
        assert_eq!(selection.series.len(), 6);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_prediction_flag_resets_and_overlay_appears() {
        let service = Arc::new(GatedService::default());
        let gate = service.hold("Acme Corp/predict/linear");
        let runtime = started(Arc::clone(&service)).await;

        runtime.dispatch(Intent::SelectCompany("Acme Corp".to_string())).await.unwrap();
        runtime.wait_idle().await.unwrap();

        runtime.dispatch(Intent::Predict).await.unwrap();
        let view = runtime.view();
        assert!(view.is_predicting);
        assert_eq!(view.predict_label(), "Predicting...");

        gate.notify_one();
        let view = runtime.wait_idle().await.unwrap();
        assert!(!view.is_predicting);
        assert_eq!(view.chart.boundary, Some(day(30)));

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_prediction_response_is_discarded() {
        let service = Arc::new(GatedService::default());
        let gate = service.hold("Acme Corp/predict/linear");
        let runtime = started(Arc::clone(&service)).await;

        runtime.dispatch(Intent::SelectCompany("Acme Corp".to_string())).await.unwrap();
        runtime.wait_idle().await.unwrap();

        runtime.dispatch(Intent::Predict).await.unwrap();
        runtime.dispatch(Intent::SelectModel(ModelId::tree())).await.unwrap();
        runtime.dispatch(Intent::Predict).await.unwrap();
        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.chart.points.last().map(|p| p.close), Some(12.0));

        let mut views = runtime.subscribe();
        views.borrow_and_update();
        gate.notify_one();
        views.changed().await.unwrap();

        let view = runtime.view();
        assert!(view.is_idle());
        assert_eq!(view.chart.points.last().map(|p| p.close), Some(12.0));
        assert_eq!(view.overlay.as_ref().unwrap().model, ModelId::tree());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_search_returns_to_idle() {
        let runtime = started(Arc::new(GatedService::default())).await;

        runtime.dispatch(Intent::SelectCompany("Acme Corp".to_string())).await.unwrap();
        runtime.wait_idle().await.unwrap();
        runtime.dispatch(Intent::Submit("zzz".to_string())).await.unwrap();

        let view = runtime.wait_idle().await.unwrap();
        assert_eq!(view.state, DashboardState::Idle);
        assert!(view.selection.is_none());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_views_close_after_shutdown() {
        let runtime = started(Arc::new(GatedService::default())).await;
        let views = runtime.subscribe();
        runtime.shutdown().await;
        assert!(views.has_changed().is_err());
    }
}
