use serde::{Deserialize, Serialize};

/// The exchange a holding is listed on.
/// Determines the ticker suffix for the quote source and the exchange
/// code used in scraped finance-page URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// National Stock Exchange (primary) — quote tickers end in ".NS"
    #[serde(rename = "NSE")]
    Nse,
    /// Bombay Stock Exchange — quote tickers end in ".BO"
    #[serde(rename = "BSE")]
    Bse,
}

impl Exchange {
    /// Ticker suffix understood by the quote source (e.g., "HDFCBANK.NS").
    pub fn quote_suffix(&self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
        }
    }

    /// Exchange code used in Google Finance quote-page URLs.
    /// Google identifies the Bombay exchange as "BOM".
    pub fn google_code(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BOM",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Nse => write!(f, "NSE"),
            Exchange::Bse => write!(f, "BSE"),
        }
    }
}

/// One portfolio line item as originally purchased.
///
/// Holdings are validated and coerced exactly once, at the
/// `HoldingsStore` boundary; after that the record is immutable and no
/// downstream component re-validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Ticker-style stock name (e.g., "HDFCBANK"), never empty
    pub stock_name: String,

    /// Price per share at purchase, non-negative
    pub purchase_price: f64,

    /// Number of shares held
    pub quantity: u32,

    /// Exchange the position was bought on
    pub exchange: Exchange,

    /// Sector label used for grouping; "Unknown" when the source data
    /// had none
    pub sector: String,
}

impl Holding {
    /// The fully-suffixed symbol used to resolve market data
    /// (e.g., "HDFCBANK.NS").
    pub fn symbol(&self) -> String {
        format!("{}{}", self.stock_name, self.exchange.quote_suffix())
    }
}
