pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::DashboardConfig;
use errors::DashboardError;
use models::holding::Holding;
use models::market_data::Quote;
use services::refresher::DashboardRefresher;
use services::resolver::MarketDataResolver;
use services::scheduler::{RefreshScheduler, SharedDashboardState};
use store::HoldingsStore;

/// Main entry point for the Portfolio Dashboard core library.
/// Owns the holdings, the market-data resolution pipeline, and the
/// refresh scheduler that keeps the published snapshot current.
#[must_use]
pub struct PortfolioDashboard {
    config: DashboardConfig,
    store: HoldingsStore,
    resolver: Arc<MarketDataResolver>,
    scheduler: Option<RefreshScheduler>,
}

impl PortfolioDashboard {
    /// Build a dashboard over a loaded holdings store with the default
    /// market-data sources.
    pub fn new(store: HoldingsStore, config: DashboardConfig) -> Self {
        let resolver = Arc::new(MarketDataResolver::with_defaults(&config));
        Self {
            config,
            store,
            resolver,
            scheduler: None,
        }
    }

    /// Build a dashboard with a custom resolver (alternate or mock data
    /// sources).
    pub fn with_resolver(
        store: HoldingsStore,
        config: DashboardConfig,
        resolver: MarketDataResolver,
    ) -> Self {
        Self {
            config,
            store,
            resolver: Arc::new(resolver),
            scheduler: None,
        }
    }

    // ── Refresh lifecycle ───────────────────────────────────────────

    /// Start periodic refreshing; the first cycle begins immediately.
    /// Returns the shared state the serving layer reads snapshots from.
    /// Must be called from within a Tokio runtime.
    ///
    /// Calling `start` while already running restarts the scheduler.
    pub fn start(&mut self) -> SharedDashboardState {
        self.stop();
        let refresher = Arc::new(DashboardRefresher::new(
            self.store.clone(),
            self.resolver.clone(),
        ));
        let scheduler = RefreshScheduler::start(refresher, self.config.refresh_interval);
        let state = scheduler.state();
        self.scheduler = Some(scheduler);
        state
    }

    /// Stop the refresh timer. An in-flight cycle completes and
    /// publishes; no new cycle starts afterwards.
    pub fn stop(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }

    /// `true` while the refresh scheduler is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Handle to the shared dashboard state, if the scheduler has been
    /// started.
    #[must_use]
    pub fn state(&self) -> Option<SharedDashboardState> {
        self.scheduler.as_ref().map(RefreshScheduler::state)
    }

    // ── Direct queries ──────────────────────────────────────────────

    /// Fetch a single quote through the primary sources, bypassing the
    /// refresh cycle. Unlike the cycle this is fallible: upstream
    /// failure surfaces to the caller.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DashboardError> {
        self.resolver.fetch_quote(symbol).await
    }

    /// The resolver, shareable with the serving layer for per-symbol
    /// queries.
    #[must_use]
    pub fn resolver(&self) -> Arc<MarketDataResolver> {
        self.resolver.clone()
    }

    /// The loaded holdings, in source order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        self.store.holdings()
    }
}
