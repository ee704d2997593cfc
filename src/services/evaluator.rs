//! Held-out evaluation of a fitted price model.

use crate::error::{AppError, Result};
use crate::services::model::PriceModel;
use crate::types::{Evaluation, NormalizedObservation};

/// Mean squared error of `model` on `testing`, with RMSE and MAE alongside.
///
/// An empty test set has no defined error and is reported as
/// [`AppError::InsufficientTestData`].
pub fn evaluate(model: &PriceModel, testing: &[NormalizedObservation]) -> Result<Evaluation> {
    if testing.is_empty() {
        return Err(AppError::InsufficientTestData);
    }

    let mut squared = 0.0;
    let mut absolute = 0.0;
    for observation in testing {
        let residual = observation.price - model.predict(observation.market_cap)?;
        squared += residual * residual;
        absolute += residual.abs();
    }

    let n = testing.len() as f64;
    let mse = squared / n;

    Ok(Evaluation {
        mse,
        rmse: mse.sqrt(),
        mae: absolute / n,
        samples: testing.len(),
    })
}
