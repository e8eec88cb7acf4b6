use basecred::aggregator::HttpAggregator;
use basecred::config::Config;
use basecred::server;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config_path = Path::new("basecred.toml");
    let (config, from_file) = if config_path.exists() {
        (Config::load(config_path)?, true)
    } else {
        (Config::from_env(), false)
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    info!("basecred v{} starting", env!("CARGO_PKG_VERSION"));
    if !from_file {
        info!("no basecred.toml found, using env-only config");
    }

    if !config.has_talent_key() {
        warn!(
            "TALENT_API_KEY not set - Talent Protocol requests will carry \
             an empty key and likely come back as errors"
        );
    }

    let aggregator = Arc::new(HttpAggregator::new(&config.ethos, &config.talent));
    let cache_ttl = Duration::from_secs(config.client.cache_ttl_secs);

    server::serve(aggregator, &config.server.bind_addr, cache_ttl).await
}
