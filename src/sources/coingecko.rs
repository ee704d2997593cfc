use crate::error::{AppError, Result};
use crate::sources::MarketDataProvider;
use crate::types::MarketChart;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const COINGECKO_PRO_API_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// CoinGecko REST client for market charts.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client with a per-request timeout.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Omen/0.1 (cryptocurrency price regression)")
            .build()?;

        let base_url = if api_key.is_some() {
            COINGECKO_PRO_API_URL
        } else {
            COINGECKO_API_URL
        };

        Ok(Self {
            client,
            api_key,
            base_url: base_url.to_string(),
        })
    }

    /// Point the client at a different API root (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the market chart URL for a coin.
    pub fn market_chart_url(&self, coin_id: &str, currency: &str, range: &str) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.base_url, coin_id, currency, range
        )
    }

    /// Fetch the market chart for a coin over `range` days.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        currency: &str,
        range: &str,
    ) -> Result<MarketChart> {
        let url = self.market_chart_url(coin_id, currency, range);
        debug!("Fetching CoinGecko market chart: {} days for {}", range, coin_id);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(ref key) = self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("CoinGecko request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("CoinGecko API returned {}: {}", status, snippet);
            return Err(AppError::Fetch(format!("CoinGecko API error: {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read CoinGecko response: {}", e)))?;

        parse_market_chart(&body)
    }
}

impl MarketDataProvider for CoinGeckoClient {
    fn fetch_chart<'a>(
        &'a self,
        coin_id: &'a str,
        currency: &'a str,
        range: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<MarketChart>> + Send + 'a>> {
        Box::pin(self.market_chart(coin_id, currency, range))
    }
}

/// Parse and validate a market chart body.
pub fn parse_market_chart(body: &str) -> Result<MarketChart> {
    let chart: MarketChart = serde_json::from_str(body)
        .map_err(|e| AppError::Fetch(format!("Failed to parse CoinGecko response: {}", e)))?;
    chart.validate()?;
    Ok(chart)
}
