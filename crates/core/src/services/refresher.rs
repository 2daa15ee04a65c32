use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future;

use super::aggregator::PortfolioAggregator;
use super::resolver::MarketDataResolver;
use super::scheduler::Refresher;
use crate::errors::DashboardError;
use crate::models::market_data::MarketData;
use crate::models::snapshot::PortfolioSnapshot;
use crate::store::HoldingsStore;

/// The production refresh cycle: resolve market data for every holding
/// concurrently, wait for the full set, then aggregate.
///
/// One slow or failing symbol never holds up the others beyond the
/// fan-in itself, and aggregation only starts once every symbol has a
/// (possibly zero-filled) record.
pub struct DashboardRefresher {
    store: HoldingsStore,
    resolver: Arc<MarketDataResolver>,
    aggregator: PortfolioAggregator,
}

impl DashboardRefresher {
    pub fn new(store: HoldingsStore, resolver: Arc<MarketDataResolver>) -> Self {
        Self {
            store,
            resolver,
            aggregator: PortfolioAggregator::new(),
        }
    }
}

#[async_trait]
impl Refresher for DashboardRefresher {
    async fn refresh(&self) -> Result<PortfolioSnapshot, DashboardError> {
        let holdings = self.store.holdings();

        let resolutions = holdings
            .iter()
            .map(|h| self.resolver.resolve(&h.stock_name, h.exchange));
        let resolved = future::join_all(resolutions).await;

        let market_data: HashMap<String, MarketData> = resolved
            .into_iter()
            .map(|data| (data.symbol.clone(), data))
            .collect();

        Ok(self.aggregator.aggregate(holdings, &market_data, Utc::now()))
    }
}
