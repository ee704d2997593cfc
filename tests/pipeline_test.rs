//! Integration tests for the training pipeline

use omen::config::Config;
use omen::error::{AppError, Result};
use omen::services::{evaluate, splitter, PriceModel, TrainingPipeline};
use omen::sources::MarketDataProvider;
use omen::types::{ChartPoint, MarketChart, NormalizedObservation};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

/// Serves a fixed history, optionally after a delay.
struct HistoryProvider {
    chart: MarketChart,
    delay: Duration,
}

impl HistoryProvider {
    fn new(chart: MarketChart) -> Arc<Self> {
        Arc::new(Self {
            chart,
            delay: Duration::ZERO,
        })
    }
}

impl MarketDataProvider for HistoryProvider {
    fn fetch_chart<'a>(
        &'a self,
        _coin_id: &'a str,
        _currency: &'a str,
        range: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<MarketChart>> + Send + 'a>> {
        Box::pin(async move {
            assert_eq!(range, "max");
            tokio::time::sleep(self.delay).await;
            Ok(self.chart.clone())
        })
    }
}

struct DownProvider;

impl MarketDataProvider for DownProvider {
    fn fetch_chart<'a>(
        &'a self,
        _coin_id: &'a str,
        _currency: &'a str,
        _range: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<MarketChart>> + Send + 'a>> {
        Box::pin(async { Err(AppError::Fetch("connection refused".to_string())) })
    }
}

/// Hourly chart where price = slope * market_cap + intercept.
fn linear_chart(len: usize, slope: f64, intercept: f64) -> MarketChart {
    let t = |i: usize| 1_672_531_200_000.0 + i as f64 * 3_600_000.0;
    let cap = |i: usize| 1.0e9 + i as f64 * 2.5e7;
    MarketChart {
        prices: (0..len)
            .map(|i| ChartPoint(t(i), slope * cap(i) + intercept))
            .collect(),
        market_caps: (0..len).map(|i| ChartPoint(t(i), cap(i))).collect(),
        total_volumes: (0..len)
            .map(|i| ChartPoint(t(i), 4.0e7 + (i * 7 % 5) as f64 * 1.0e6))
            .collect(),
    }
}

#[tokio::test]
async fn test_ten_point_scenario() {
    let chart = linear_chart(10, 2.0, 0.0);
    let pipeline = TrainingPipeline::new(HistoryProvider::new(chart), Arc::new(Config::default()));

    let trained = assert_ok!(pipeline.run().await);
    assert_eq!(trained.training_len, 8);
    assert_eq!(trained.testing_len, 2);

    let evaluation = trained.evaluation.expect("two test points");
    assert!(evaluation.mse >= 0.0);
    assert!(evaluation.mse < 1e-12, "mse = {}", evaluation.mse);
}

#[tokio::test]
async fn test_linear_relation_is_recovered() {
    let slope = 1.5e-8;
    let intercept = 3.0;
    let chart = linear_chart(60, slope, intercept);
    let pipeline = TrainingPipeline::new(HistoryProvider::new(chart), Arc::new(Config::default()));

    let trained = assert_ok!(pipeline.run().await);

    // Normalized price is an exact affine image of normalized market cap
    let model = &trained.model;
    assert!((model.slope() - 1.0).abs() < 1e-9);
    assert!(model.intercept().abs() < 1e-9);

    // Back on the raw scale, the generating coefficients come out
    let bounds = trained.bounds;
    let price_at = |cap: f64| {
        let n = bounds.market_cap.normalize(cap).unwrap();
        bounds.denormalize_price(model.predict(n).unwrap())
    };
    let raw_slope = (price_at(2.0e9) - price_at(1.0e9)) / 1.0e9;
    let raw_intercept = price_at(1.0e9) - raw_slope * 1.0e9;
    assert!((raw_slope - slope).abs() < 1e-15);
    assert!((raw_intercept - intercept).abs() < 1e-6);

    assert!(trained.evaluation.unwrap().mse < 1e-12);
}

#[tokio::test]
async fn test_fetch_failure_is_fatal_at_startup() {
    let pipeline = TrainingPipeline::new(Arc::new(DownProvider), Arc::new(Config::default()));

    let err = assert_err!(pipeline.run().await);
    assert!(matches!(err, AppError::Fetch(_)));
}

#[tokio::test]
async fn test_history_request_times_out() {
    let provider = Arc::new(HistoryProvider {
        chart: linear_chart(10, 2.0, 0.0),
        delay: Duration::from_millis(200),
    });
    let config = Config {
        request_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let pipeline = TrainingPipeline::new(provider, Arc::new(config));

    let err = assert_err!(pipeline.run().await);
    assert!(matches!(err, AppError::Fetch(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_flat_market_cap_cannot_be_fitted() {
    let mut chart = linear_chart(10, 2.0, 0.0);
    // Constant market cap in training, varying only in the test tail
    for point in chart.market_caps.iter_mut().take(8) {
        point.1 = 5.0e9;
    }
    let pipeline = TrainingPipeline::new(HistoryProvider::new(chart), Arc::new(Config::default()));

    let err = assert_err!(pipeline.run().await);
    assert!(matches!(err, AppError::Fit(_)));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_misaligned_history_is_rejected() {
    let mut chart = linear_chart(10, 2.0, 0.0);
    chart.total_volumes.pop();
    let pipeline = TrainingPipeline::new(HistoryProvider::new(chart), Arc::new(Config::default()));

    let err = assert_err!(pipeline.run().await);
    assert!(matches!(err, AppError::Alignment { .. }));
}

#[tokio::test]
async fn test_empty_history_aborts_startup() {
    let pipeline = TrainingPipeline::new(
        HistoryProvider::new(MarketChart::default()),
        Arc::new(Config::default()),
    );

    let err = assert_err!(pipeline.run().await);
    assert!(matches!(err, AppError::InsufficientHistory { .. }));
    assert!(!err.is_recoverable());
    assert_eq!(
        err.to_string(),
        "Insufficient history: 0 training samples out of 0, need at least 2"
    );
}

#[test]
fn test_empty_series_reports_insufficient_data() {
    let split = assert_ok!(splitter::split(&MarketChart::default(), 0.8));
    assert!(split.training.is_empty());
    assert!(split.testing.is_empty());

    let model = assert_ok!(PriceModel::fit(&[
        NormalizedObservation {
            timestamp: "2023-01-01T00:00:00Z".to_string(),
            price: 0.0,
            volume: 0.0,
            market_cap: 0.0,
        },
        NormalizedObservation {
            timestamp: "2023-01-01T01:00:00Z".to_string(),
            price: 1.0,
            volume: 1.0,
            market_cap: 1.0,
        },
    ]));
    let err = assert_err!(evaluate(&model, &[]));
    assert!(matches!(err, AppError::InsufficientTestData));
    assert_eq!(err.to_string(), "Insufficient test data: no evaluation possible");
}
