use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::DashboardError;
use crate::models::holding::{Exchange, Holding};

/// Sector label applied when the source data carries none.
const UNKNOWN_SECTOR: &str = "Unknown";

/// Immutable, pre-loaded sequence of holdings.
///
/// The holdings file is produced by an external spreadsheet-conversion
/// step, so its rows arrive loosely typed: numbers may be encoded as
/// strings, fields may be missing entirely. All coercion happens here,
/// once. Downstream components receive strictly-typed records and never
/// re-validate.
///
/// The store is cheaply cloneable and safe to share across concurrent
/// resolutions — the underlying slice is never mutated after load.
#[derive(Debug, Clone)]
pub struct HoldingsStore {
    holdings: Arc<[Holding]>,
}

/// One row as found in the converted spreadsheet output.
/// `Value` fields absorb whatever the conversion step emitted; they are
/// coerced to numbers below.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHolding {
    #[serde(default)]
    stock_name: Option<String>,
    #[serde(default)]
    purchase_price: Option<Value>,
    #[serde(default)]
    quantity: Option<Value>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    sector: Option<String>,
}

impl HoldingsStore {
    /// Parse a holdings list from its JSON representation.
    ///
    /// Rows without a stock name are skipped (the conversion step can
    /// leave blank spreadsheet rows behind); everything else is coerced
    /// into a valid `Holding`. Input order is preserved.
    pub fn from_json_str(json: &str) -> Result<Self, DashboardError> {
        let raw: Vec<RawHolding> = serde_json::from_str(json)
            .map_err(|e| DashboardError::InvalidHoldings(e.to_string()))?;

        let mut holdings = Vec::with_capacity(raw.len());
        for row in raw {
            let Some(name) = row.stock_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
            else {
                warn!("Skipping holdings row without a stock name");
                continue;
            };

            holdings.push(Holding {
                stock_name: name.to_string(),
                purchase_price: coerce_number(row.purchase_price.as_ref()).max(0.0),
                quantity: coerce_number(row.quantity.as_ref()).max(0.0) as u32,
                exchange: parse_exchange(row.exchange.as_deref(), name),
                sector: row
                    .sector
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_SECTOR)
                    .to_string(),
            });
        }

        Ok(Self {
            holdings: holdings.into(),
        })
    }

    /// Load the holdings file from disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// All holdings, in source order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

/// Coerce a loosely-typed JSON value into a non-NaN number.
/// Strings are trimmed and parsed; anything unparseable becomes 0.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Map the exchange tag from the source data. Unrecognized tags fall
/// back to the primary exchange.
fn parse_exchange(tag: Option<&str>, stock_name: &str) -> Exchange {
    match tag.map(|t| t.trim().to_uppercase()).as_deref() {
        Some("NSE") => Exchange::Nse,
        Some("BSE") => Exchange::Bse,
        other => {
            debug!(
                stock_name,
                tag = other.unwrap_or(""),
                "Unrecognized exchange tag, defaulting to NSE"
            );
            Exchange::Nse
        }
    }
}
