use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// One raw provider sample: `[epoch_millis, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint(pub f64, pub f64);

impl ChartPoint {
    /// Sample time in Unix milliseconds.
    pub fn epoch_millis(&self) -> f64 {
        self.0
    }

    /// Sampled value.
    pub fn value(&self) -> f64 {
        self.1
    }
}

/// Market chart response: three parallel, index-aligned series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<ChartPoint>,
    pub market_caps: Vec<ChartPoint>,
    pub total_volumes: Vec<ChartPoint>,
}

impl MarketChart {
    /// Check that all three series have the same length.
    pub fn validate(&self) -> Result<()> {
        let prices = self.prices.len();
        if self.market_caps.len() != prices || self.total_volumes.len() != prices {
            return Err(AppError::Alignment {
                prices,
                market_caps: self.market_caps.len(),
                total_volumes: self.total_volumes.len(),
            });
        }
        Ok(())
    }

    /// Number of aligned samples (the price series length).
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Temporal train/test partition of a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    /// Leading fraction (the past).
    pub training: MarketChart,
    /// Trailing remainder (the "future" within the historical window).
    pub testing: MarketChart,
}
