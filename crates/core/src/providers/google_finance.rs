use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::traits::FundamentalsProvider;
use crate::config::DashboardConfig;
use crate::errors::DashboardError;
use crate::models::holding::Exchange;
use crate::models::market_data::Fundamentals;

const BASE_URL: &str = "https://www.google.com/finance/quote";

/// Label preceding the trailing P/E value on the quote page.
const PE_LABEL: &str = "P/E Ratio";
/// Label preceding the trailing earnings value on the quote page.
const EARNINGS_LABEL: &str = "Earnings";

/// Google Finance page scraper for P/E ratio and trailing earnings.
///
/// The quote page renders key statistics as label/value element pairs;
/// we locate the leaf element whose text equals the label and read the
/// next sibling element's text. This is markup-dependent by nature: an
/// extraction miss is an expected, recoverable condition that yields 0
/// for the affected field, never an error. The two labels are searched
/// independently, so one going missing does not block the other.
pub struct GoogleFinanceScraper {
    client: Client,
}

impl GoogleFinanceScraper {
    pub fn new(config: &DashboardConfig) -> Self {
        let builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout);
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch the rendered quote page for a stock.
    async fn fetch_document(
        &self,
        stock_name: &str,
        exchange: Exchange,
    ) -> Result<String, DashboardError> {
        let url = format!("{BASE_URL}/{}:{}", stock_name, exchange.google_code());
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| DashboardError::Api {
                provider: "Google Finance".into(),
                message: format!("Quote page for {stock_name} returned {e}"),
            })?
            .text()
            .await?;
        Ok(body)
    }

    /// Extract both fundamentals fields from a fetched document.
    /// Each extraction fails independently; a miss leaves that field 0.
    pub fn extract(html: &str) -> Fundamentals {
        let document = Html::parse_document(html);
        Fundamentals {
            pe_ratio: extract_labelled_value(&document, PE_LABEL).unwrap_or(0.0),
            latest_earnings: extract_labelled_value(&document, EARNINGS_LABEL).unwrap_or(0.0),
        }
    }
}

#[async_trait]
impl FundamentalsProvider for GoogleFinanceScraper {
    fn name(&self) -> &str {
        "Google Finance"
    }

    async fn get_fundamentals(
        &self,
        stock_name: &str,
        exchange: Exchange,
    ) -> Result<Fundamentals, DashboardError> {
        let html = self.fetch_document(stock_name, exchange).await?;
        let fundamentals = Self::extract(&html);
        if fundamentals == Fundamentals::default() {
            debug!(stock_name, "No fundamentals extracted from quote page");
        }
        Ok(fundamentals)
    }
}

/// Find the leaf `div` whose trimmed text equals `label`, then parse the
/// next sibling element's text as a number.
///
/// Matching on exact leaf text keeps container elements (whose collected
/// text also contains the label somewhere) from shadowing the actual
/// label element.
fn extract_labelled_value(document: &Html, label: &str) -> Option<f64> {
    let divs = Selector::parse("div").ok()?;
    for element in document.select(&divs) {
        let text: String = element.text().collect();
        if text.trim() != label {
            continue;
        }
        let mut node = element.next_sibling();
        while let Some(n) = node {
            if let Some(sibling) = ElementRef::wrap(n) {
                let value_text: String = sibling.text().collect();
                return parse_numeric(&value_text);
            }
            node = n.next_sibling();
        }
    }
    None
}

/// Strip currency symbols and thousands separators, then parse as f64.
/// "₹1,234.56" → 1234.56. Non-numeric text yields None.
fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
