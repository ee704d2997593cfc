//! Startup pipeline: fetch history, split, normalize, fit, evaluate.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::converter;
use crate::services::evaluator::evaluate;
use crate::services::model::PriceModel;
use crate::services::normalizer::NormalizationBounds;
use crate::services::splitter;
use crate::sources::MarketDataProvider;
use crate::types::{Evaluation, MarketChart};
use std::sync::Arc;
use tracing::{info, warn};

/// Fewest training samples a line can be fitted through.
const MIN_TRAINING_SAMPLES: usize = 2;

/// Everything the live predictor needs from training.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: Arc<PriceModel>,
    /// Bounds fitted on training and testing together.
    pub bounds: NormalizationBounds,
    /// `None` when the test split was empty.
    pub evaluation: Option<Evaluation>,
    pub training_len: usize,
    pub testing_len: usize,
}

/// Trains a [`PriceModel`] from a provider's full history.
pub struct TrainingPipeline<P: MarketDataProvider> {
    provider: Arc<P>,
    config: Arc<Config>,
}

impl<P: MarketDataProvider> TrainingPipeline<P> {
    pub fn new(provider: Arc<P>, config: Arc<Config>) -> Self {
        Self { provider, config }
    }

    /// Fetch the history and train on it.
    ///
    /// Fetch, normalization and fit failures are returned; an empty test set
    /// is logged and leaves `evaluation` unset.
    pub async fn run(&self) -> Result<TrainedModel> {
        info!(
            "Loading {} history for {} in {}",
            self.config.history_range, self.config.coin_id, self.config.currency
        );

        let fetch = self.provider.fetch_chart(
            &self.config.coin_id,
            &self.config.currency,
            &self.config.history_range,
        );
        let chart = tokio::time::timeout(self.config.request_timeout, fetch)
            .await
            .map_err(|_| {
                AppError::Fetch(format!(
                    "history request timed out after {:?}",
                    self.config.request_timeout
                ))
            })??;

        self.train(&chart)
    }

    /// Train on an already fetched chart.
    pub fn train(&self, chart: &MarketChart) -> Result<TrainedModel> {
        train_on_chart(chart, self.config.split_ratio)
    }
}

/// Split, normalize, fit and evaluate a chart.
pub fn train_on_chart(chart: &MarketChart, split_ratio: f64) -> Result<TrainedModel> {
    let split = splitter::split(chart, split_ratio)?;
    if split.training.len() < MIN_TRAINING_SAMPLES {
        return Err(AppError::InsufficientHistory {
            training: split.training.len(),
            total: chart.len(),
        });
    }
    let training = converter::convert(&split.training)?;
    let testing = converter::convert(&split.testing)?;
    info!(
        "Split {} samples into {} training and {} testing",
        chart.len(),
        training.len(),
        testing.len()
    );

    let bounds = NormalizationBounds::fit(&[training.as_slice(), testing.as_slice()])?;
    let normalized_training = bounds.apply_all(&training)?;
    let normalized_testing = bounds.apply_all(&testing)?;

    let model = PriceModel::fit(&normalized_training)?;
    info!("Trained Model Summary:\n{}", model);

    let evaluation = match evaluate(&model, &normalized_testing) {
        Ok(evaluation) => {
            info!("Model evaluation results (MSE): {}", evaluation.mse);
            Some(evaluation)
        }
        Err(AppError::InsufficientTestData) => {
            warn!("No evaluation possible: testing set is empty");
            None
        }
        Err(e) => return Err(e),
    };

    Ok(TrainedModel {
        model: Arc::new(model),
        bounds,
        evaluation,
        training_len: training.len(),
        testing_len: testing.len(),
    })
}
