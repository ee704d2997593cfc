//! Temporal train/test split of a raw market chart.

use crate::error::Result;
use crate::types::{ChartPoint, DatasetSplit, MarketChart};

/// Index of the first testing sample: `floor(ratio * len)`, clamped to `len`.
pub fn split_index(len: usize, ratio: f64) -> usize {
    let cut = (len as f64 * ratio).floor();
    if cut <= 0.0 {
        0
    } else {
        (cut as usize).min(len)
    }
}

fn cut_series(series: &[ChartPoint], cut: usize) -> (Vec<ChartPoint>, Vec<ChartPoint>) {
    let (head, tail) = series.split_at(cut);
    (head.to_vec(), tail.to_vec())
}

/// Split a chart into a leading training prefix and a trailing testing suffix.
///
/// The same cut is applied to every series; order is preserved.
pub fn split(chart: &MarketChart, ratio: f64) -> Result<DatasetSplit> {
    chart.validate()?;

    let cut = split_index(chart.len(), ratio);
    let (train_prices, test_prices) = cut_series(&chart.prices, cut);
    let (train_caps, test_caps) = cut_series(&chart.market_caps, cut);
    let (train_volumes, test_volumes) = cut_series(&chart.total_volumes, cut);

    Ok(DatasetSplit {
        training: MarketChart {
            prices: train_prices,
            market_caps: train_caps,
            total_volumes: train_volumes,
        },
        testing: MarketChart {
            prices: test_prices,
            market_caps: test_caps,
            total_volumes: test_volumes,
        },
    })
}
