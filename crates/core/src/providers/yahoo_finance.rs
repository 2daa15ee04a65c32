use async_trait::async_trait;

use super::traits::QuoteProvider;
use crate::errors::DashboardError;
use crate::models::market_data::Quote;

/// Yahoo Finance quote provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities; NSE/BSE tickers via ".NS"/".BO"
///   suffixes.
/// - **Data**: Latest close price from the chart endpoint. Trailing P/E
///   and earnings are not part of that payload, so they are left unset
///   here and picked up by the supplemental scrape.
///
/// Uses the `yahoo_finance_api` crate, which wraps Yahoo Finance's
/// public endpoints.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, DashboardError> {
        let connector =
            yahoo_finance_api::YahooConnector::new().map_err(|e| DashboardError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, DashboardError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| DashboardError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| DashboardError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        Ok(Quote {
            price: quote.close,
            pe_ratio: None,
            earnings: None,
        })
    }
}
