mod api;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use portfolio_dashboard_core::config::DashboardConfig;
use portfolio_dashboard_core::store::HoldingsStore;
use portfolio_dashboard_core::PortfolioDashboard;

#[derive(Debug, Parser)]
#[command(name = "portfolio-dashboard-server", about = "Serves the portfolio dashboard API")]
struct Cli {
    /// Path to the pre-generated holdings JSON file
    #[arg(long, default_value = "portfolio.json")]
    holdings: PathBuf,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Seconds between refresh cycles
    #[arg(long, default_value_t = 15)]
    refresh_secs: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let store = match HoldingsStore::load_from_file(&cli.holdings) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load holdings from {}: {e}", cli.holdings.display());
            std::process::exit(1);
        }
    };
    info!(
        holdings = store.len(),
        path = %cli.holdings.display(),
        "Holdings loaded"
    );

    let config = DashboardConfig {
        refresh_interval: Duration::from_secs(cli.refresh_secs),
        ..DashboardConfig::default()
    };

    let holdings_count = store.len();
    let mut dashboard = PortfolioDashboard::new(store, config);
    let resolver = dashboard.resolver();
    let state = dashboard.start();
    info!(refresh_secs = cli.refresh_secs, "Refresh scheduler started");

    let app = api::router(api::AppState {
        dashboard: state,
        resolver,
        holdings_count,
        started_at: Instant::now(),
    });

    info!("Registering routes:");
    info!("  GET /api/stocks?symbol=HDFCBANK.NS");
    info!("  GET /api/portfolio");
    info!("  GET /api/sectors");
    info!("  GET /health");

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!(%addr, "Server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
