use tracing::warn;

use crate::config::DashboardConfig;
use crate::errors::DashboardError;
use crate::models::holding::Exchange;
use crate::models::market_data::{MarketData, Quote};
use crate::providers::google_finance::GoogleFinanceScraper;
use crate::providers::registry::QuoteProviderRegistry;
use crate::providers::traits::FundamentalsProvider;

/// Resolves complete market data for one symbol.
///
/// Orchestrates the quote registry and the supplemental fundamentals
/// source, and guarantees a complete record per symbol: any upstream
/// failure is caught here, logged, and converted into zero-filled
/// fields. A failure for one symbol never affects any other symbol, and
/// resolution time is bounded by the underlying clients' own timeouts.
///
/// No state is retained between calls beyond the HTTP clients
/// themselves, so one resolver is safely shared across the concurrent
/// per-symbol resolutions of a refresh cycle.
pub struct MarketDataResolver {
    registry: QuoteProviderRegistry,
    fundamentals: Box<dyn FundamentalsProvider>,
}

impl MarketDataResolver {
    pub fn new(registry: QuoteProviderRegistry, fundamentals: Box<dyn FundamentalsProvider>) -> Self {
        Self {
            registry,
            fundamentals,
        }
    }

    /// Resolver with the default sources: Yahoo Finance quotes,
    /// Google Finance fundamentals.
    pub fn with_defaults(config: &DashboardConfig) -> Self {
        Self::new(
            QuoteProviderRegistry::new_with_defaults(),
            Box::new(GoogleFinanceScraper::new(config)),
        )
    }

    /// Resolve market data for one holding. Never fails: fields that
    /// could not be resolved are 0 in the returned record.
    ///
    /// 1. Ask the quote registry for the latest quote (price plus any
    ///    valuation fields the source carries).
    /// 2. If P/E or earnings are still unresolved, consult the
    ///    supplemental fundamentals source.
    /// 3. Merge: the primary source's price always wins; P/E and
    ///    earnings come from whichever source supplied a non-zero value,
    ///    primary preferred.
    pub async fn resolve(&self, stock_name: &str, exchange: Exchange) -> MarketData {
        let symbol = format!("{}{}", stock_name, exchange.quote_suffix());
        let mut data = MarketData::unavailable(&symbol);

        match self.fetch_quote(&symbol).await {
            Ok(quote) => {
                data.current_price = quote.price;
                data.pe_ratio = quote.pe_ratio.unwrap_or(0.0);
                data.latest_earnings = quote.earnings.unwrap_or(0.0);
            }
            Err(e) => {
                warn!(%symbol, error = %e, "Quote fetch failed; price unavailable this cycle");
            }
        }

        if data.pe_ratio == 0.0 || data.latest_earnings == 0.0 {
            match self.fundamentals.get_fundamentals(stock_name, exchange).await {
                Ok(supplement) => {
                    if data.pe_ratio == 0.0 {
                        data.pe_ratio = supplement.pe_ratio;
                    }
                    if data.latest_earnings == 0.0 {
                        data.latest_earnings = supplement.latest_earnings;
                    }
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "Fundamentals fetch failed");
                }
            }
        }

        data
    }

    /// Fetch a quote through the registry with automatic fallback.
    ///
    /// Unlike `resolve`, this path is fallible: it backs the direct
    /// query endpoint, which surfaces upstream failure to its caller
    /// instead of zero-filling. Quotes with a non-finite or negative
    /// price are rejected and the next provider is tried.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote, DashboardError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(DashboardError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.get_quote(symbol).await {
                Ok(quote) => {
                    if !quote.price.is_finite() || quote.price < 0.0 {
                        last_error = Some(DashboardError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {} (must be finite and non-negative)",
                                quote.price
                            ),
                        });
                        continue;
                    }
                    return Ok(quote);
                }
                Err(e) => {
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or(DashboardError::NoProvider))
    }
}
