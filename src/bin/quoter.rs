//! Range quoter entrypoint: wire the MEXC client, start the engine, run until
//! ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use range_quoter::client::{mexc::MexcClient, RateLimited, RateLimiter};
use range_quoter::config::QuoterConfig;
use range_quoter::engine::Engine;
use range_quoter::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Range Quoter v{}", env!("CARGO_PKG_VERSION"));

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let config = QuoterConfig::load(&config_path)?;

    let limiter = Arc::new(RateLimiter::new(
        config.exchange.rate_limit.requests,
        Duration::from_secs(config.exchange.rate_limit.window_secs),
    ));
    let client = MexcClient::new(&config.exchange)?;
    let client = Arc::new(RateLimited::new(
        client,
        limiter,
        Duration::from_millis(config.exchange.request_timeout_ms),
    ));

    let engine = Engine::new(client);
    engine.start(config)?;
    info!("Engine running; press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, cancelling outstanding quotes...");

    let status = engine.stop().await?;
    if status.buy.last_error.is_some() || status.sell.last_error.is_some() {
        warn!(
            "Stopped with errors (buy: {:?}, sell: {:?})",
            status.buy.last_error, status.sell.last_error
        );
    } else {
        info!("Stopped cleanly");
    }

    Ok(())
}
