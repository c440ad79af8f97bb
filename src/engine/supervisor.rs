//! Engine supervisor: owns the configuration and the two quoting loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use super::quoter::QuoteLoop;
use super::status::{EngineStatus, StatusBoard};
use crate::client::ExchangeClient;
use crate::config::{ConfigError, QuoterConfig};
use crate::domain::Side;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("engine already running")]
    AlreadyRunning,

    #[error("engine not running")]
    NotRunning,
}

struct ActiveRun {
    config: Arc<QuoterConfig>,
    running: Arc<AtomicBool>,
    board: StatusBoard,
    tasks: Vec<JoinHandle<()>>,
}

impl ActiveRun {
    fn status(&self, running: bool) -> EngineStatus {
        EngineStatus {
            running,
            symbol: Some(self.config.trading.symbol.clone()),
            buy_range: Some(self.config.trading.buy_range),
            sell_range: Some(self.config.trading.sell_range),
            min_competitor_size: Some(self.config.trading.min_competitor_size),
            buy: self.board.side(Side::Buy),
            sell: self.board.side(Side::Sell),
        }
    }
}

/// Idle/Running supervisor over the two per-side loops.
///
/// The two loops share only the immutable config and the exchange client;
/// each exclusively owns its side's live order. Stop is cooperative: the
/// flag is observed at cycle boundaries, so stop latency is bounded by one
/// poll interval plus any in-flight call.
pub struct Engine {
    client: Arc<dyn ExchangeClient>,
    run: Mutex<Option<ActiveRun>>,
}

impl Engine {
    pub fn new(client: Arc<dyn ExchangeClient>) -> Self {
        Self {
            client,
            run: Mutex::new(None),
        }
    }

    /// Validate `config` and launch both quoting loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, config: QuoterConfig) -> Result<(), EngineError> {
        config.validate()?;

        let mut run = self.run.lock();
        if run.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let config = Arc::new(config);
        let running = Arc::new(AtomicBool::new(true));
        let board = StatusBoard::new();

        let tasks = [Side::Buy, Side::Sell]
            .into_iter()
            .map(|side| {
                let quote_loop = QuoteLoop::new(
                    side,
                    &config,
                    Arc::clone(&self.client),
                    board.clone(),
                    Arc::clone(&running),
                );
                tokio::spawn(quote_loop.run())
            })
            .collect();

        info!(
            "[Engine] started for {} (buy {}..{}, sell {}..{})",
            config.trading.symbol,
            config.trading.buy_range.min,
            config.trading.buy_range.max,
            config.trading.sell_range.min,
            config.trading.sell_range.max
        );

        *run = Some(ActiveRun {
            config,
            running,
            board,
            tasks,
        });
        Ok(())
    }

    /// Signal both loops, await their best-effort cancels, return to idle.
    ///
    /// The returned status is the final per-side state, including any error a
    /// stop-time cancel left behind.
    pub async fn stop(&self) -> Result<EngineStatus, EngineError> {
        let mut active = self.run.lock().take().ok_or(EngineError::NotRunning)?;

        active.running.store(false, Ordering::Release);
        for task in std::mem::take(&mut active.tasks) {
            let _ = task.await;
        }

        info!("[Engine] stopped for {}", active.config.trading.symbol);
        Ok(active.status(false))
    }

    /// Non-blocking point-in-time status copy.
    pub fn status(&self) -> EngineStatus {
        let run = self.run.lock();
        match run.as_ref() {
            Some(active) => active.status(true),
            None => EngineStatus::idle(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }
}
