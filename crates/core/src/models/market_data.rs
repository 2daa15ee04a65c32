use serde::{Deserialize, Serialize};

/// Live-fetched valuation fields for one symbol, rebuilt every refresh
/// cycle.
///
/// Every field is always present: 0 means "unavailable", so downstream
/// arithmetic never sees a missing value. `latest_earnings` may be
/// negative for loss-making companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    /// Fully-suffixed symbol this record was resolved for
    pub symbol: String,

    /// Current market price; 0 when no source could supply one
    pub current_price: f64,

    /// Trailing price-to-earnings ratio; 0 when unavailable
    pub pe_ratio: f64,

    /// Trailing earnings per share; 0 when unavailable
    pub latest_earnings: f64,
}

impl MarketData {
    /// A fully zero-filled record: what a symbol resolves to when every
    /// upstream source failed.
    pub fn unavailable(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            current_price: 0.0,
            pe_ratio: 0.0,
            latest_earnings: 0.0,
        }
    }
}

/// Quote as returned by a primary quote provider.
///
/// The price is mandatory; valuation fields are optional because not
/// every source carries them. Whatever is missing here is filled in from
/// a supplemental source.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub pe_ratio: Option<f64>,
    pub earnings: Option<f64>,
}

/// Fundamentals extracted from a supplemental finance page.
///
/// Extraction misses are values, not errors: a field the page did not
/// yield comes back as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fundamentals {
    pub pe_ratio: f64,
    pub latest_earnings: f64,
}
