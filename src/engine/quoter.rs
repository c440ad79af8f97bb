//! Per-side quoting loop.
//!
//! Runs poll → analyze → transition on a fixed cadence. The only suspension
//! point is the shutdown check at the top of each cycle: an in-flight exchange
//! call always finishes, and leaving the loop triggers a best-effort cancel of
//! whatever is still resting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::analyzer::desired_quote_price;
use super::side::{RetryPolicy, SideQuoter};
use super::status::StatusBoard;
use crate::client::{ExchangeClient, ExchangeError};
use crate::config::{PriceRange, QuoterConfig};
use crate::domain::Side;

enum CycleOutcome {
    Continue,
    /// Permanent failure; this side stops, the other keeps running.
    Halt,
}

pub struct QuoteLoop {
    side: Side,
    symbol: String,
    book_depth: usize,
    poll_interval: Duration,
    range: PriceRange,
    tick: f64,
    min_competitor_size: f64,
    max_price_deviation: f64,
    client: Arc<dyn ExchangeClient>,
    machine: SideQuoter,
    board: StatusBoard,
    running: Arc<AtomicBool>,
    /// Mid-price of the first usable snapshot; anchors the deviation guard.
    reference_mid: Option<f64>,
}

impl QuoteLoop {
    pub fn new(
        side: Side,
        config: &QuoterConfig,
        client: Arc<dyn ExchangeClient>,
        board: StatusBoard,
        running: Arc<AtomicBool>,
    ) -> Self {
        let (range, qty) = match side {
            Side::Buy => (config.trading.buy_range, config.trading.buy_quantity),
            Side::Sell => (config.trading.sell_range, config.trading.sell_quantity),
        };

        let machine = SideQuoter::new(
            side,
            config.trading.symbol.clone(),
            qty,
            range,
            config.engine.tick_size,
            config.engine.qty_step,
            RetryPolicy::default(),
            Arc::clone(&client),
        );

        Self {
            side,
            symbol: config.trading.symbol.clone(),
            book_depth: config.engine.book_depth,
            poll_interval: Duration::from_millis(config.engine.poll_interval_ms),
            range,
            tick: config.engine.tick_size,
            min_competitor_size: config.trading.min_competitor_size,
            max_price_deviation: config.trading.max_price_deviation,
            client,
            machine,
            board,
            running,
            reference_mid: None,
        }
    }

    pub async fn run(mut self) {
        info!("[Loop:{}] starting for {}", self.side, self.symbol);

        while self.running.load(Ordering::Acquire) {
            let cycle_start = Instant::now();

            match self.cycle().await {
                CycleOutcome::Continue => {}
                CycleOutcome::Halt => break,
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < self.poll_interval {
                tokio::time::sleep(self.poll_interval - elapsed).await;
            }
        }

        // Leave nothing resting when we go.
        if let Err(e) = self.machine.cancel_outstanding().await {
            warn!("[Loop:{}] could not cancel on stop: {}", self.side, e);
            self.board.record_error(self.side, &e.to_string());
        }
        self.board.publish_order(self.side, self.machine.current());

        info!("[Loop:{}] stopped", self.side);
    }

    async fn cycle(&mut self) -> CycleOutcome {
        let book = match self.client.book_snapshot(&self.symbol, self.book_depth).await {
            Ok(book) => book,
            Err(e) => return self.handle_failure("snapshot", e),
        };

        if self.reference_mid.is_none() {
            self.reference_mid = book.mid_price();
        }

        let target = desired_quote_price(
            &book,
            self.side,
            &self.range,
            self.min_competitor_size,
            self.tick,
            self.machine.current(),
        );

        if self.deviates_too_far(target) {
            debug!(
                "[Loop:{}] target {} outside deviation band, holding position",
                self.side, target
            );
            self.board.publish_order(self.side, self.machine.current());
            return CycleOutcome::Continue;
        }

        match self.machine.sync_to_target(target).await {
            Ok(()) => {
                self.board.publish_order(self.side, self.machine.current());
                self.board.clear_error(self.side);
                CycleOutcome::Continue
            }
            Err(e) => self.handle_failure("order sync", e),
        }
    }

    /// Transient errors surface on status and the loop keeps cycling;
    /// permanent ones stop this side only.
    fn handle_failure(&self, context: &str, error: ExchangeError) -> CycleOutcome {
        if error.is_transient() {
            warn!("[Loop:{}] {} failed: {}", self.side, context, error);
            self.board.record_error(self.side, &error.to_string());
            CycleOutcome::Continue
        } else {
            error!(
                "[Loop:{}] {} failed permanently, halting side: {}",
                self.side, context, error
            );
            self.board.record_error(self.side, &error.to_string());
            CycleOutcome::Halt
        }
    }

    fn deviates_too_far(&self, target: f64) -> bool {
        if self.max_price_deviation <= 0.0 {
            return false;
        }
        match self.reference_mid {
            Some(reference) if reference > 0.0 => {
                (target - reference).abs() / reference > self.max_price_deviation
            }
            _ => false,
        }
    }
}
