use omen::config::Config;
use omen::services::{LivePredictor, TrainingPipeline};
use omen::sources::CoinGeckoClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    config.validate()?;
    info!(
        "Starting Omen for {} in {} (split {}, poll every {:?})",
        config.coin_id, config.currency, config.split_ratio, config.poll_interval
    );

    let provider = Arc::new(CoinGeckoClient::new(
        config.coingecko_api_key.clone(),
        config.request_timeout,
    )?);

    // Startup failures leave no usable model
    let trained = match TrainingPipeline::new(provider.clone(), config.clone()).run().await {
        Ok(trained) => trained,
        Err(e) => {
            error!("Training failed: {}", e);
            return Err(e.into());
        }
    };

    let predictor = Arc::new(LivePredictor::new(provider, config, &trained));

    // Stop the live loop on Ctrl-C
    {
        let predictor = predictor.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
                predictor.shutdown();
            }
        });
    }

    predictor.run().await;

    let stats = predictor.stats();
    info!(
        "Live predictor stopped after {} ticks ({} ok, {} failed)",
        stats.ticks, stats.successes, stats.failures
    );

    Ok(())
}
