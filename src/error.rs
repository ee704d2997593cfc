use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error(
        "Series length mismatch: {prices} prices, {market_caps} market caps, {total_volumes} volumes"
    )]
    Alignment {
        prices: usize,
        market_caps: usize,
        total_volumes: usize,
    },

    #[error("Series out of order at index {index}: {timestamp} precedes its predecessor")]
    UnorderedSeries { index: usize, timestamp: String },

    #[error("Degenerate {attribute} range [{min}, {max}]: cannot normalize")]
    DegenerateRange {
        attribute: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Insufficient history: {training} training samples out of {total}, need at least 2")]
    InsufficientHistory { training: usize, total: usize },

    #[error("Fit error: {0}")]
    Fit(String),

    #[error("Insufficient test data: no evaluation possible")]
    InsufficientTestData,

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl AppError {
    /// Whether the affected phase can be skipped and the run continued.
    ///
    /// Provider failures (including malformed or misaligned responses) and an
    /// empty test set are recoverable. A too-short history, fit,
    /// normalization, prediction and configuration failures leave no usable
    /// model.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Fetch(_)
                | AppError::Alignment { .. }
                | AppError::UnorderedSeries { .. }
                | AppError::InsufficientTestData
                | AppError::Reqwest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
