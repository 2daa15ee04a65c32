use async_trait::async_trait;

use crate::errors::DashboardError;
use crate::models::holding::Exchange;
use crate::models::market_data::{Fundamentals, Quote};

/// Trait abstraction for primary quote sources.
///
/// The dashboard only needs the latest price plus whatever valuation
/// fields the source happens to carry; anything the source omits is
/// filled in through a `FundamentalsProvider`. If a source stops working
/// or changes, only its implementation is touched — the resolver and
/// everything above it stay the same.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest quote for a fully-suffixed ticker (e.g., "HDFCBANK.NS").
    async fn get_quote(&self, symbol: &str) -> Result<Quote, DashboardError>;
}

/// Trait abstraction for supplemental fundamentals sources.
///
/// Implementations extract P/E ratio and trailing earnings from a
/// rendered finance page. The label-matching involved is brittle by
/// nature, so it lives behind this seam where tests can swap it out
/// without touching the resolver.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// P/E and trailing earnings for a stock on a given exchange.
    /// Fields the page did not yield come back as 0; an `Err` means the
    /// page itself could not be fetched.
    async fn get_fundamentals(
        &self,
        stock_name: &str,
        exchange: Exchange,
    ) -> Result<Fundamentals, DashboardError>;
}
