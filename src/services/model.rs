//! Price-from-market-cap regression model.

use crate::error::{AppError, Result};
use crate::services::regression::{fit_line, LinearFit};
use crate::types::NormalizedObservation;
use std::fmt;

/// Name of the observed (target) variable.
pub const OBSERVED: &str = "Price";
/// Name of the single predictor.
pub const VARIABLE: &str = "MarketCap";

/// Linear model of normalized price against normalized market cap.
///
/// Only constructed by a successful [`PriceModel::fit`]; immutable afterwards
/// and safe to share between tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceModel {
    fit: LinearFit,
}

impl PriceModel {
    /// Train on `(market_cap -> price)` pairs from the normalized training set.
    pub fn fit(training: &[NormalizedObservation]) -> Result<Self> {
        let points: Vec<(f64, f64)> = training
            .iter()
            .map(|o| (o.market_cap, o.price))
            .collect();

        let fit = fit_line(&points)?;
        Ok(Self { fit })
    }

    /// Predict the normalized price for a normalized market cap.
    pub fn predict(&self, market_cap: f64) -> Result<f64> {
        if !market_cap.is_finite() {
            return Err(AppError::Prediction(format!(
                "non-finite {} input: {}",
                VARIABLE, market_cap
            )));
        }

        let predicted = self.fit.predict(market_cap);
        if !predicted.is_finite() {
            return Err(AppError::Prediction(format!(
                "non-finite prediction for {} = {}",
                VARIABLE, market_cap
            )));
        }
        Ok(predicted)
    }

    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    pub fn slope(&self) -> f64 {
        self.fit.slope
    }

    pub fn r_squared(&self) -> f64 {
        self.fit.r_squared
    }

    /// Number of observations the model was trained on.
    pub fn samples(&self) -> usize {
        self.fit.samples
    }
}

impl fmt::Display for PriceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dependent variable: {}", OBSERVED)?;
        writeln!(
            f,
            "Regression formula: Predicted = {:.4} + {}*{:.4}",
            self.fit.intercept, VARIABLE, self.fit.slope
        )?;
        writeln!(f, "R2 = {:.6}", self.fit.r_squared)?;
        write!(f, "N = {}", self.fit.samples)
    }
}
