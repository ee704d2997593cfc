use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped market record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// RFC3339 UTC timestamp, second precision.
    pub timestamp: String,
    pub price: f64,
    pub volume: f64,
    pub market_cap: f64,
}

/// An observation rescaled into [0, 1] with the run's normalization bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedObservation {
    pub timestamp: String,
    pub price: f64,
    pub volume: f64,
    pub market_cap: f64,
}

/// Numeric attribute of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Price,
    Volume,
    MarketCap,
}

impl Attribute {
    /// Read this attribute from an observation.
    pub fn of(&self, observation: &Observation) -> f64 {
        match self {
            Attribute::Price => observation.price,
            Attribute::Volume => observation.volume,
            Attribute::MarketCap => observation.market_cap,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Price => "price",
            Attribute::Volume => "volume",
            Attribute::MarketCap => "market cap",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
