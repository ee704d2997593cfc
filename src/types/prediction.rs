use serde::{Deserialize, Serialize};
use std::fmt;

/// Held-out evaluation of a fitted model.
///
/// All errors are measured on the normalized price scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Number of test observations.
    pub samples: usize,
}

/// Result of one live prediction tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePrediction {
    /// Timestamp of the observation the prediction was made for.
    pub timestamp: String,
    /// Live market cap on the training scale (may fall outside [0, 1]).
    pub normalized_market_cap: f64,
    /// Model output on the normalized price scale.
    pub normalized_prediction: f64,
    /// Model output mapped back to the quote currency.
    pub predicted_price: f64,
    /// Observed price in the quote currency.
    pub actual_price: f64,
}

impl LivePrediction {
    /// Signed prediction error in the quote currency.
    pub fn error(&self) -> f64 {
        self.predicted_price - self.actual_price
    }
}

/// Live predictor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorState {
    /// Waiting for the next tick.
    Idle,
    /// Running a fetch, predict, report cycle.
    Predicting,
}

impl fmt::Display for PredictorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorState::Idle => write!(f, "idle"),
            PredictorState::Predicting => write!(f, "predicting"),
        }
    }
}

/// Counters for the live loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    /// Ticks started.
    pub ticks: u64,
    /// Ticks that produced a prediction.
    pub successes: u64,
    /// Ticks that failed and were skipped.
    pub failures: u64,
    /// Most recent successful prediction.
    pub last_prediction: Option<LivePrediction>,
    /// Most recent failure message.
    pub last_error: Option<String>,
}
