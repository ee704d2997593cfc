//! Min-max normalization with bounds shared across train, test and live data.
//!
//! Bounds are computed once over every observation that will be normalized
//! with them (training and testing together) and then reused unchanged. The
//! live path must not refit: a single sample has `min == max`, which is a
//! degenerate range.

use crate::error::{AppError, Result};
use crate::types::{Attribute, NormalizedObservation, Observation};
use serde::{Deserialize, Serialize};

/// Closed value range of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Empty bounds: `min = +inf`, `max = -inf`.
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Running min/max over `values`.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().fold(Self::empty(), |mut bounds, value| {
            if value < bounds.min {
                bounds.min = value;
            }
            if value > bounds.max {
                bounds.max = value;
            }
            bounds
        })
    }

    /// Bounds of one attribute across an observation population.
    pub fn of_attribute<'a>(
        population: impl IntoIterator<Item = &'a Observation>,
        attribute: Attribute,
    ) -> Self {
        Self::of(population.into_iter().map(|o| attribute.of(o)))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the range cannot be used as a divisor.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite() && self.max > self.min)
    }

    /// `(value - min) / (max - min)`.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some((value - self.min) / self.span())
    }

    /// Inverse of [`Bounds::normalize`]: `value * (max - min) + min`.
    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.span() + self.min
    }
}

/// Per-attribute bounds held for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationBounds {
    pub price: Bounds,
    pub volume: Bounds,
    pub market_cap: Bounds,
}

impl NormalizationBounds {
    /// Fit bounds over the union of `populations`.
    ///
    /// Fails if any attribute is single-valued or the union is empty.
    pub fn fit(populations: &[&[Observation]]) -> Result<Self> {
        let union = || populations.iter().flat_map(|p| p.iter());

        let bounds = Self {
            price: Bounds::of_attribute(union(), Attribute::Price),
            volume: Bounds::of_attribute(union(), Attribute::Volume),
            market_cap: Bounds::of_attribute(union(), Attribute::MarketCap),
        };

        for attribute in [Attribute::Price, Attribute::Volume, Attribute::MarketCap] {
            let b = bounds.get(attribute);
            if b.is_degenerate() {
                return Err(degenerate(attribute, b));
            }
        }

        Ok(bounds)
    }

    pub fn get(&self, attribute: Attribute) -> Bounds {
        match attribute {
            Attribute::Price => self.price,
            Attribute::Volume => self.volume,
            Attribute::MarketCap => self.market_cap,
        }
    }

    /// Normalize one value of `attribute`.
    pub fn normalize(&self, attribute: Attribute, value: f64) -> Result<f64> {
        let bounds = self.get(attribute);
        bounds
            .normalize(value)
            .ok_or_else(|| degenerate(attribute, bounds))
    }

    /// Normalize every attribute of an observation.
    pub fn apply(&self, observation: &Observation) -> Result<NormalizedObservation> {
        Ok(NormalizedObservation {
            timestamp: observation.timestamp.clone(),
            price: self.normalize(Attribute::Price, observation.price)?,
            volume: self.normalize(Attribute::Volume, observation.volume)?,
            market_cap: self.normalize(Attribute::MarketCap, observation.market_cap)?,
        })
    }

    pub fn apply_all(&self, observations: &[Observation]) -> Result<Vec<NormalizedObservation>> {
        observations.iter().map(|o| self.apply(o)).collect()
    }

    /// Map a normalized price back to the quote currency.
    pub fn denormalize_price(&self, value: f64) -> f64 {
        self.price.denormalize(value)
    }
}

fn degenerate(attribute: Attribute, bounds: Bounds) -> AppError {
    AppError::DegenerateRange {
        attribute: attribute.name(),
        min: bounds.min,
        max: bounds.max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(price: f64, volume: f64, market_cap: f64) -> Observation {
        Observation {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            price,
            volume,
            market_cap,
        }
    }

    #[test]
    fn test_bounds_scan() {
        let bounds = Bounds::of([3.0, -1.5, 7.25, 0.0]);
        assert_eq!(bounds.min, -1.5);
        assert_eq!(bounds.max, 7.25);

        let empty = Bounds::of(std::iter::empty());
        assert_eq!(empty.min, f64::INFINITY);
        assert_eq!(empty.max, f64::NEG_INFINITY);
        assert!(empty.is_degenerate());
    }

    #[test]
    fn test_normalize_endpoints_exact() {
        let bounds = Bounds::of([12.0, 3.0, 40.0, 17.5]);
        assert_eq!(bounds.normalize(3.0), Some(0.0));
        assert_eq!(bounds.normalize(40.0), Some(1.0));

        for v in [3.0, 12.0, 17.5, 40.0] {
            let n = bounds.normalize(v).unwrap();
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn test_denormalize_round_trip() {
        let bounds = Bounds::of([1.2e9, 9.7e9]);
        for v in [1.2e9, 3.3e9, 5.55e9, 9.7e9] {
            let back = bounds.denormalize(bounds.normalize(v).unwrap());
            assert!((back - v).abs() <= 1e-6 * v.abs());
        }
    }

    #[test]
    fn test_degenerate_range() {
        let bounds = Bounds::of([5.0, 5.0, 5.0]);
        assert!(bounds.is_degenerate());
        assert_eq!(bounds.normalize(5.0), None);
    }

    #[test]
    fn test_fit_over_union() {
        let train = vec![obs(1.0, 10.0, 100.0), obs(2.0, 20.0, 200.0)];
        let test = vec![obs(4.0, 15.0, 400.0)];

        let bounds = NormalizationBounds::fit(&[train.as_slice(), test.as_slice()]).unwrap();
        assert_eq!(bounds.price, Bounds { min: 1.0, max: 4.0 });
        assert_eq!(bounds.volume, Bounds { min: 10.0, max: 20.0 });
        assert_eq!(bounds.market_cap, Bounds { min: 100.0, max: 400.0 });

        let normalized = bounds.apply(&test[0]).unwrap();
        assert_eq!(normalized.price, 1.0);
        assert_eq!(normalized.volume, 0.5);
        assert_eq!(normalized.market_cap, 1.0);
    }

    #[test]
    fn test_fit_rejects_single_sample() {
        let live = vec![obs(14.0, 1.0e8, 8.0e9)];
        match NormalizationBounds::fit(&[live.as_slice()]) {
            Err(AppError::DegenerateRange { attribute, .. }) => assert_eq!(attribute, "price"),
            other => panic!("expected degenerate range, got {:?}", other),
        }

        assert!(NormalizationBounds::fit(&[]).is_err());
    }

    #[test]
    fn test_stored_bounds_extrapolate_live_sample() {
        let history = vec![obs(10.0, 1.0, 100.0), obs(20.0, 2.0, 200.0)];
        let bounds = NormalizationBounds::fit(&[history.as_slice()]).unwrap();

        let live = bounds.apply(&obs(25.0, 2.5, 250.0)).unwrap();
        assert_eq!(live.market_cap, 1.5);
        assert_eq!(bounds.denormalize_price(live.price), 25.0);
    }
}
