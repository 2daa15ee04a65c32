use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::holding::Exchange;

/// A holding joined with its current market data plus derived metrics.
/// Rebuilt from scratch every refresh cycle — nothing is patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedStock {
    pub stock_name: String,
    pub exchange: Exchange,
    pub sector: String,

    /// Price per share at purchase
    pub purchase_price: f64,
    /// Number of shares held
    pub quantity: u32,

    /// Fully-suffixed symbol market data was resolved under
    pub symbol: String,
    /// Current market price; 0 when unavailable this cycle
    pub current_price: f64,
    /// Trailing P/E ratio; 0 when unavailable
    pub pe_ratio: f64,
    /// Trailing earnings per share; 0 when unavailable
    pub latest_earnings: f64,

    /// purchase_price × quantity
    pub total_investment: f64,
    /// current_price × quantity
    pub current_value: f64,
    /// current_value - total_investment
    pub gain_loss: f64,
    /// gain_loss / total_investment × 100; defined as 0 when
    /// total_investment is 0
    pub gain_loss_percentage: f64,
    /// total_investment / portfolio total_investment × 100; defined as 0
    /// when the portfolio total is 0
    pub portfolio_percentage: f64,
}

/// Aggregated totals for all holdings sharing a sector label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorSummary {
    pub sector: String,
    pub total_investment: f64,
    pub current_value: f64,
    pub gain_loss: f64,
}

/// The complete computed state of the portfolio at one point in time.
///
/// Snapshots are replaced wholesale at the end of each refresh cycle, so
/// a consumer always reads an internally consistent set of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// When the cycle that produced this snapshot finished
    pub as_of: DateTime<Utc>,

    /// Sum of every stock's total_investment
    pub total_investment: f64,

    /// Sum of every stock's current_value
    pub current_value: f64,

    /// current_value - total_investment
    pub total_gain_loss: f64,

    /// total_gain_loss / total_investment × 100; 0 when nothing is
    /// invested
    pub total_gain_loss_percentage: f64,

    /// All stocks, in holdings-store order
    pub stocks: Vec<EnrichedStock>,

    /// Per-sector roll-ups, in first-seen order
    pub sector_summaries: Vec<SectorSummary>,
}
