//! Conversion of raw chart series into per-timestamp observations.

use crate::error::{AppError, Result};
use crate::types::{MarketChart, Observation};
use chrono::{DateTime, SecondsFormat, Utc};

/// Format an epoch-millisecond sample time as RFC3339 UTC.
///
/// Milliseconds are truncated to whole seconds first.
pub fn format_timestamp(epoch_millis: f64) -> Result<String> {
    if !epoch_millis.is_finite() {
        return Err(AppError::Fetch(format!(
            "Invalid sample timestamp: {}",
            epoch_millis
        )));
    }

    let secs = (epoch_millis / 1000.0) as i64;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| AppError::Fetch(format!("Sample timestamp out of range: {}", epoch_millis)))
}

fn observation_at(chart: &MarketChart, index: usize) -> Result<Observation> {
    let price = &chart.prices[index];
    Ok(Observation {
        timestamp: format_timestamp(price.epoch_millis())?,
        price: price.value(),
        volume: chart.total_volumes[index].value(),
        market_cap: chart.market_caps[index].value(),
    })
}

/// Convert an aligned chart into observations, one per price sample.
///
/// Rejects misaligned series and samples that go back in time.
pub fn convert(chart: &MarketChart) -> Result<Vec<Observation>> {
    chart.validate()?;

    let mut observations = Vec::with_capacity(chart.len());
    let mut last_millis = f64::NEG_INFINITY;

    for index in 0..chart.len() {
        let millis = chart.prices[index].epoch_millis();
        let observation = observation_at(chart, index)?;
        if millis < last_millis {
            return Err(AppError::UnorderedSeries {
                index,
                timestamp: observation.timestamp,
            });
        }
        last_millis = millis;
        observations.push(observation);
    }

    Ok(observations)
}

/// Convert only the most recent sample of a chart.
pub fn convert_latest(chart: &MarketChart) -> Result<Observation> {
    chart.validate()?;
    if chart.is_empty() {
        return Err(AppError::Fetch("Market chart contains no samples".to_string()));
    }
    observation_at(chart, chart.len() - 1)
}
