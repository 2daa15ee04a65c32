use thiserror::Error;

/// Unified error type for the entire portfolio-dashboard-core library.
/// Every fallible public function returns `Result<T, DashboardError>`.
///
/// Note that most upstream failures never reach the caller during a
/// refresh cycle: the resolver catches them and degrades to zero-filled
/// market data. These variants surface on the direct query path and at
/// the holdings-store boundary.
#[derive(Debug, Error)]
pub enum DashboardError {
    // ── Query surface ───────────────────────────────────────────────
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No quote provider registered")]
    NoProvider,

    // ── Scraping ────────────────────────────────────────────────────
    #[error("Extraction failed: {0}")]
    Extraction(String),

    // ── Holdings boundary ───────────────────────────────────────────
    #[error("Invalid holdings data: {0}")]
    InvalidHoldings(String),

    #[error("File I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so that
        // upstream request details never leak into logs or API responses.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        DashboardError::Network(sanitized)
    }
}
