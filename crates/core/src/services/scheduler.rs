use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::errors::DashboardError;
use crate::models::snapshot::PortfolioSnapshot;

/// Where the dashboard is in its refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum RefreshStatus {
    /// No cycle in flight; the latest snapshot (if any) is current.
    Idle,
    /// A cycle is fetching and aggregating right now.
    Refreshing,
    /// The last cycle failed. The previous snapshot is retained and
    /// timer-driven retries continue.
    Error(String),
}

/// The consumer-facing state: latest completed snapshot plus refresh
/// status. The snapshot is only ever replaced wholesale after a cycle
/// finishes, so readers never observe a partially-built one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub snapshot: Option<PortfolioSnapshot>,
    pub status: RefreshStatus,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            snapshot: None,
            status: RefreshStatus::Idle,
            last_refreshed: None,
        }
    }
}

/// Shared handle to the dashboard state. Readers take the lock briefly
/// to clone what they need; the scheduler takes it briefly to publish.
pub type SharedDashboardState = Arc<RwLock<DashboardState>>;

/// One complete fetch-resolve-aggregate pass.
///
/// The production implementation fans out per-symbol resolution and
/// aggregates the results; the seam exists so scheduler behavior is
/// testable with deterministic cycles.
#[async_trait]
pub trait Refresher: Send + Sync {
    async fn refresh(&self) -> Result<PortfolioSnapshot, DashboardError>;
}

/// Drives refresh cycles: one immediately on start, then one per
/// interval.
///
/// At most one cycle is ever in flight: the cycle runs inline in the
/// scheduler task, and ticks that fire while a slow cycle overruns the
/// interval are skipped rather than queued, so a stalled upstream can
/// never pile up concurrent cycles.
pub struct RefreshScheduler {
    state: SharedDashboardState,
    shutdown: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the scheduler task. The first cycle starts immediately.
    pub fn start(refresher: Arc<dyn Refresher>, interval: Duration) -> Self {
        let state: SharedDashboardState = Arc::new(RwLock::new(DashboardState::default()));
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let loop_state = state.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycle = 0u64;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }
                if *shutdown_rx.borrow() {
                    break;
                }
                cycle += 1;
                run_cycle(&loop_state, refresher.as_ref(), cycle).await;
            }
            info!("Refresh scheduler stopped");
        });

        Self {
            state,
            shutdown,
            handle,
        }
    }

    /// Handle to the shared state for consumers (the serving layer).
    pub fn state(&self) -> SharedDashboardState {
        self.state.clone()
    }

    /// The latest published snapshot, if any cycle has completed.
    pub async fn snapshot(&self) -> Option<PortfolioSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    /// Stop the timer. No future cycle will start; a cycle already in
    /// flight completes and publishes its snapshot.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Stop the timer and wait for the scheduler task to exit.
    pub async fn shutdown(self) {
        self.stop();
        let _ = self.handle.await;
    }
}

async fn run_cycle(state: &SharedDashboardState, refresher: &dyn Refresher, cycle: u64) {
    state.write().await.status = RefreshStatus::Refreshing;

    match refresher.refresh().await {
        Ok(snapshot) => {
            info!(cycle, stocks = snapshot.stocks.len(), "Refresh cycle completed");
            let mut s = state.write().await;
            s.last_refreshed = Some(snapshot.as_of);
            s.snapshot = Some(snapshot);
            s.status = RefreshStatus::Idle;
        }
        Err(e) => {
            // Keep the previous snapshot; the next tick retries.
            error!(cycle, error = %e, "Refresh cycle failed");
            state.write().await.status = RefreshStatus::Error(e.to_string());
        }
    }
}
