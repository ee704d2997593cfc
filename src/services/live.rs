//! Live Prediction Service
//!
//! Polls the provider for the latest observation on a fixed interval,
//! predicts its price with the trained model and reports predicted against
//! actual. Runs until shut down; a failed tick is logged and skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::converter;
use crate::services::model::PriceModel;
use crate::services::normalizer::NormalizationBounds;
use crate::services::pipeline::TrainedModel;
use crate::sources::MarketDataProvider;
use crate::types::{Attribute, LivePrediction, LiveStats, PredictorState};

/// Periodic fetch, predict, report loop.
pub struct LivePredictor<P: MarketDataProvider> {
    provider: Arc<P>,
    config: Arc<Config>,
    /// Fitted during training; never refit here.
    model: Arc<PriceModel>,
    /// Training-time bounds, reused for every live sample.
    bounds: NormalizationBounds,
    state: RwLock<PredictorState>,
    stats: RwLock<LiveStats>,
    /// Set once by `shutdown`; stays set so a later `run` returns at once.
    stopped: AtomicBool,
    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,
}

impl<P: MarketDataProvider> LivePredictor<P> {
    pub fn new(provider: Arc<P>, config: Arc<Config>, trained: &TrainedModel) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            provider,
            config,
            model: trained.model.clone(),
            bounds: trained.bounds,
            state: RwLock::new(PredictorState::Idle),
            stats: RwLock::new(LiveStats::default()),
            stopped: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    /// Run ticks until [`LivePredictor::shutdown`] is called.
    ///
    /// The first tick fires one interval after start. Ticks never overlap:
    /// a slow fetch delays the next tick rather than queueing more. Returns
    /// immediately if `shutdown` was already called.
    pub async fn run(&self) {
        // Subscribe before checking the flag so a concurrent shutdown is
        // either seen here or delivered on the channel.
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        if self.stopped.load(Ordering::SeqCst) {
            info!("Live predictor already shut down");
            return;
        }

        info!(
            "Live predictor tick interval: {:?} ({} in {})",
            self.config.poll_interval, self.config.coin_id, self.config.currency
        );
        let period = self.config.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        if e.is_recoverable() {
                            warn!("Live prediction tick skipped: {}", e);
                        } else {
                            error!("Live prediction tick error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Live predictor received shutdown signal");
                    break;
                }
            }
        }

        self.set_state(PredictorState::Idle);
    }

    /// Stop the loop. Also stops a `run` that has not started yet.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    /// Run one fetch, predict, report cycle and record its outcome.
    pub async fn tick(&self) -> Result<LivePrediction> {
        self.set_state(PredictorState::Predicting);
        if let Ok(mut stats) = self.stats.write() {
            stats.ticks += 1;
        }

        let result = self.predict_latest().await;

        if let Ok(mut stats) = self.stats.write() {
            match &result {
                Ok(prediction) => {
                    stats.successes += 1;
                    stats.last_prediction = Some(prediction.clone());
                }
                Err(e) => {
                    stats.failures += 1;
                    stats.last_error = Some(e.to_string());
                }
            }
        }
        self.set_state(PredictorState::Idle);

        if let Ok(prediction) = &result {
            info!(
                "Real-time Predicted Price: {:.2}, Actual Price: {:.2}",
                prediction.predicted_price, prediction.actual_price
            );
        }
        result
    }

    async fn predict_latest(&self) -> Result<LivePrediction> {
        let fetch = self.provider.fetch_chart(
            &self.config.coin_id,
            &self.config.currency,
            &self.config.live_range,
        );
        let chart = tokio::time::timeout(self.config.request_timeout, fetch)
            .await
            .map_err(|_| {
                AppError::Fetch(format!(
                    "latest data request timed out after {:?}",
                    self.config.request_timeout
                ))
            })??;

        let latest = converter::convert_latest(&chart)?;
        let normalized_market_cap = self
            .bounds
            .normalize(Attribute::MarketCap, latest.market_cap)?;
        if !(0.0..=1.0).contains(&normalized_market_cap) {
            debug!(
                "Live market cap {} is outside the training range ({:.4} normalized)",
                latest.market_cap, normalized_market_cap
            );
        }

        let normalized_prediction = self.model.predict(normalized_market_cap)?;

        Ok(LivePrediction {
            timestamp: latest.timestamp,
            normalized_market_cap,
            normalized_prediction,
            predicted_price: self.bounds.denormalize_price(normalized_prediction),
            actual_price: latest.price,
        })
    }

    fn set_state(&self, state: PredictorState) {
        if let Ok(mut current) = self.state.write() {
            *current = state;
        }
    }

    pub fn state(&self) -> PredictorState {
        self.state
            .read()
            .map(|s| *s)
            .unwrap_or(PredictorState::Idle)
    }

    /// Snapshot of the loop counters.
    pub fn stats(&self) -> LiveStats {
        self.stats.read().map(|s| s.clone()).unwrap_or_default()
    }
}
