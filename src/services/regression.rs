//! Ordinary least squares with one predictor and an intercept.
//!
//! Solves the normal equations in closed form:
//! `slope = Sxy / Sxx`, `intercept = mean(y) - slope * mean(x)`.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Relative variance below which the feature is treated as constant.
const MIN_RELATIVE_VARIANCE: f64 = 1e-12;

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Coefficient of determination on the training data.
    pub r_squared: f64,
    /// Number of training points.
    pub samples: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a line through `(x, y)` points.
///
/// Fails on fewer than two points, non-finite input, or a feature without
/// variance (the normal equations are singular).
pub fn fit_line(points: &[(f64, f64)]) -> Result<LinearFit> {
    let n = points.len();
    if n < 2 {
        return Err(AppError::Fit(format!(
            "need at least 2 training points, got {}",
            n
        )));
    }
    if let Some(index) = points
        .iter()
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(AppError::Fit(format!(
            "non-finite training point at index {}",
            index
        )));
    }

    let n_f = n as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n_f;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n_f;

    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
    });

    let scale = mean_x * mean_x + 1.0;
    if sxx / n_f <= MIN_RELATIVE_VARIANCE * scale {
        return Err(AppError::Fit(
            "feature has zero variance; normal equations are singular".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| {
            let residual = y - (intercept + slope * x);
            residual * residual
        })
        .sum();
    // A constant target is fitted exactly by a flat line
    let r_squared = if syy > 0.0 { 1.0 - ss_res / syy } else { 1.0 };

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(AppError::Fit("solution is not finite".to_string()));
    }

    Ok(LinearFit {
        intercept,
        slope,
        r_squared,
        samples: n,
    })
}
