use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use portfolio_dashboard_core::errors::DashboardError;
use portfolio_dashboard_core::services::resolver::MarketDataResolver;
use portfolio_dashboard_core::services::scheduler::{RefreshStatus, SharedDashboardState};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Latest snapshot + refresh status, published by the scheduler.
    pub dashboard: SharedDashboardState,
    /// Resolver for direct per-symbol quote queries.
    pub resolver: Arc<MarketDataResolver>,
    /// Number of holdings being tracked.
    pub holdings_count: usize,
    /// Process start, for the health endpoint.
    pub started_at: Instant,
}

/// Build the API router. The dashboard frontend is served separately,
/// so cross-origin GETs are allowed.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET]);

    Router::new()
        .route("/api/stocks", get(get_stock_handler))
        .route("/api/portfolio", get(get_portfolio_handler))
        .route("/api/sectors", get(get_sectors_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

// ── /api/stocks ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockResponse {
    symbol: String,
    current_price: f64,
    pe_ratio: f64,
    earnings: f64,
}

/// GET /api/stocks?symbol=HDFCBANK.NS
///
/// Direct quote lookup through the primary sources. Upstream failure is
/// surfaced here (unlike the refresh cycle, which zero-fills).
pub async fn get_stock_handler(
    State(state): State<AppState>,
    Query(params): Query<StockQuery>,
) -> Response {
    let Some(symbol) = params
        .symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        let err = DashboardError::MissingParameter("symbol".into());
        return error_response(StatusCode::BAD_REQUEST, &err);
    };

    match state.resolver.fetch_quote(&symbol).await {
        Ok(quote) => Json(StockResponse {
            symbol,
            current_price: quote.price,
            pe_ratio: quote.pe_ratio.unwrap_or(0.0),
            earnings: quote.earnings.unwrap_or(0.0),
        })
        .into_response(),
        Err(e) => {
            warn!(%symbol, error = %e, "Quote lookup failed");
            error_response(StatusCode::BAD_GATEWAY, &e)
        }
    }
}

// ── /api/portfolio and /api/sectors ─────────────────────────────────

/// GET /api/portfolio
///
/// The latest complete snapshot plus refresh status. 503 until the
/// first cycle has published.
pub async fn get_portfolio_handler(State(state): State<AppState>) -> Response {
    let dashboard = state.dashboard.read().await;
    match &dashboard.snapshot {
        Some(snapshot) => Json(json!({
            "status": &dashboard.status,
            "snapshot": snapshot,
        }))
        .into_response(),
        None => no_snapshot_response(&dashboard.status),
    }
}

/// GET /api/sectors
///
/// The sector-grouped view of the latest snapshot.
pub async fn get_sectors_handler(State(state): State<AppState>) -> Response {
    let dashboard = state.dashboard.read().await;
    match &dashboard.snapshot {
        Some(snapshot) => Json(json!({
            "asOf": snapshot.as_of,
            "sectorSummaries": &snapshot.sector_summaries,
        }))
        .into_response(),
        None => no_snapshot_response(&dashboard.status),
    }
}

// ── /health ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    uptime_secs: u64,
    holdings: usize,
    status: RefreshStatus,
    last_refreshed: Option<DateTime<Utc>>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Response {
    let dashboard = state.dashboard.read().await;
    Json(HealthResponse {
        uptime_secs: state.started_at.elapsed().as_secs(),
        holdings: state.holdings_count,
        status: dashboard.status.clone(),
        last_refreshed: dashboard.last_refreshed,
    })
    .into_response()
}

// ── Helpers ─────────────────────────────────────────────────────────

fn error_response(code: StatusCode, error: &DashboardError) -> Response {
    (code, Json(json!({ "error": error.to_string() }))).into_response()
}

fn no_snapshot_response(status: &RefreshStatus) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "No snapshot available yet",
            "status": status,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use portfolio_dashboard_core::config::DashboardConfig;
    use portfolio_dashboard_core::services::scheduler::DashboardState;
    use tokio::sync::RwLock;

    fn test_state() -> AppState {
        let config = DashboardConfig::default();
        AppState {
            dashboard: Arc::new(RwLock::new(DashboardState::default())),
            resolver: Arc::new(MarketDataResolver::with_defaults(&config)),
            holdings_count: 0,
            started_at: Instant::now(),
        }
    }

    #[tokio::test]
    async fn stocks_without_symbol_is_bad_request() {
        let response =
            get_stock_handler(State(test_state()), Query(StockQuery { symbol: None })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stocks_with_blank_symbol_is_bad_request() {
        let response = get_stock_handler(
            State(test_state()),
            Query(StockQuery {
                symbol: Some("   ".into()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn portfolio_before_first_cycle_is_unavailable() {
        let response = get_portfolio_handler(State(test_state())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn sectors_before_first_cycle_is_unavailable() {
        let response = get_sectors_handler(State(test_state())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
