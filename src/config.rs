use crate::error::{AppError, Result};
use std::env;
use std::time::Duration;

/// Application configuration.
///
/// Fixed at initialization; nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// CoinGecko coin identifier (e.g. "chainlink").
    pub coin_id: String,
    /// Quote currency for prices and market caps.
    pub currency: String,
    /// Fraction of the history used for training, in (0, 1].
    pub split_ratio: f64,
    /// Delay between live prediction ticks.
    pub poll_interval: Duration,
    /// Upper bound on a single provider request.
    pub request_timeout: Duration,
    /// Range requested for the training history.
    pub history_range: String,
    /// Range requested on each live tick; the last point is used.
    pub live_range: String,
    /// CoinGecko API key (optional, for pro tier).
    pub coingecko_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coin_id: "chainlink".to_string(),
            currency: "usd".to_string(),
            split_ratio: 0.8,
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            history_range: "max".to_string(),
            live_range: "1".to_string(),
            coingecko_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            coin_id: env::var("COIN_ID").unwrap_or(defaults.coin_id),
            currency: env::var("QUOTE_CURRENCY").unwrap_or(defaults.currency),
            split_ratio: env::var("SPLIT_RATIO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.split_ratio),
            poll_interval: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            history_range: env::var("HISTORY_RANGE").unwrap_or(defaults.history_range),
            live_range: env::var("LIVE_RANGE").unwrap_or(defaults.live_range),
            coingecko_api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.coin_id.trim().is_empty() {
            return Err(AppError::Config("coin id must not be empty".to_string()));
        }
        if self.currency.trim().is_empty() {
            return Err(AppError::Config("quote currency must not be empty".to_string()));
        }
        if !(self.split_ratio > 0.0 && self.split_ratio <= 1.0) {
            return Err(AppError::Config(format!(
                "split ratio must be in (0, 1], got {}",
                self.split_ratio
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(AppError::Config("poll interval must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}
