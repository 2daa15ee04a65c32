use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::holding::Holding;
use crate::models::market_data::MarketData;
use crate::models::snapshot::{EnrichedStock, PortfolioSnapshot, SectorSummary};

/// Combines holdings with resolved market data into a full snapshot.
///
/// Pure computation: no I/O, deterministic given its inputs. Holdings
/// with no entry in the market-data map are joined against a zero-filled
/// record, so the snapshot is always complete. Every percentage that
/// would divide by zero is defined as 0 instead of NaN or infinity.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot for `as_of` from the holdings and the market
    /// data resolved this cycle, keyed by fully-suffixed symbol.
    pub fn aggregate(
        &self,
        holdings: &[Holding],
        market_data: &HashMap<String, MarketData>,
        as_of: DateTime<Utc>,
    ) -> PortfolioSnapshot {
        // Pass 1: join and compute per-stock values plus portfolio totals.
        let mut stocks = Vec::with_capacity(holdings.len());
        let mut total_investment = 0.0;
        let mut current_value = 0.0;

        for holding in holdings {
            let symbol = holding.symbol();
            let data = market_data
                .get(&symbol)
                .cloned()
                .unwrap_or_else(|| MarketData::unavailable(&symbol));

            let quantity = f64::from(holding.quantity);
            let investment = holding.purchase_price * quantity;
            let value = data.current_price * quantity;
            let gain_loss = value - investment;

            total_investment += investment;
            current_value += value;

            stocks.push(EnrichedStock {
                stock_name: holding.stock_name.clone(),
                exchange: holding.exchange,
                sector: holding.sector.clone(),
                purchase_price: holding.purchase_price,
                quantity: holding.quantity,
                symbol: data.symbol,
                current_price: data.current_price,
                pe_ratio: data.pe_ratio,
                latest_earnings: data.latest_earnings,
                total_investment: investment,
                current_value: value,
                gain_loss,
                gain_loss_percentage: percentage_of(gain_loss, investment),
                portfolio_percentage: 0.0, // needs the portfolio total, filled below
            });
        }

        // Pass 2: portfolio weights against the portfolio-wide total.
        for stock in &mut stocks {
            stock.portfolio_percentage = percentage_of(stock.total_investment, total_investment);
        }

        let sector_summaries = summarize_sectors(&stocks);

        let total_gain_loss = current_value - total_investment;
        PortfolioSnapshot {
            as_of,
            total_investment,
            current_value,
            total_gain_loss,
            total_gain_loss_percentage: percentage_of(total_gain_loss, total_investment),
            stocks,
            sector_summaries,
        }
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Group stocks by sector label, preserving first-seen order.
/// Every stock lands in exactly one bucket, so sector totals partition
/// the portfolio totals.
fn summarize_sectors(stocks: &[EnrichedStock]) -> Vec<SectorSummary> {
    let mut summaries: Vec<SectorSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for stock in stocks {
        let i = match index.get(stock.sector.as_str()) {
            Some(&i) => i,
            None => {
                summaries.push(SectorSummary {
                    sector: stock.sector.clone(),
                    total_investment: 0.0,
                    current_value: 0.0,
                    gain_loss: 0.0,
                });
                index.insert(stock.sector.as_str(), summaries.len() - 1);
                summaries.len() - 1
            }
        };
        summaries[i].total_investment += stock.total_investment;
        summaries[i].current_value += stock.current_value;
    }

    for summary in &mut summaries {
        summary.gain_loss = summary.current_value - summary.total_investment;
    }
    summaries
}

/// `part / whole × 100`, defined as 0 when `whole` is 0.
fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        (part / whole) * 100.0
    }
}
