pub mod coingecko;

pub use coingecko::CoinGeckoClient;

use crate::error::Result;
use crate::types::MarketChart;
use std::future::Future;
use std::pin::Pin;

/// Source of historical and recent market charts.
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the price, market cap and volume series for a coin.
    ///
    /// `range` is the number of days back, or "max" for the full history.
    fn fetch_chart<'a>(
        &'a self,
        coin_id: &'a str,
        currency: &'a str,
        range: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<MarketChart>> + Send + 'a>>;
}
