use std::time::Duration;

/// User-agent sent with scrape requests. The finance pages return a
/// stripped-down document to clients that don't identify as a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Construction-time configuration for the dashboard core.
///
/// Every timing and identification knob lives here and is passed in
/// explicitly where it is needed; no component reads ambient globals.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How often a new refresh cycle starts.
    pub refresh_interval: Duration,

    /// User-agent string for the scrape client.
    pub user_agent: String,

    /// Per-request timeout for all outbound HTTP calls.
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
