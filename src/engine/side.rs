//! Per-side order lifecycle.
//!
//! Each side owns at most one live order. Repositioning is cancel-then-place:
//! exchange orders are immutable once resting, so there is no price-amend path.
//! A cancel that comes back "not found" means the exchange matched the order
//! between our poll and the cancel. That is a normal transition back to idle,
//! not a failure, and the next cycle re-quotes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::client::{CancelOutcome, ExchangeClient, Result};
use crate::config::PriceRange;
use crate::domain::{round_down_to_step, LiveOrder, OrderStatus, QuoteIntent, Side};

/// Bounded retry for transient exchange failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

/// Does the live order need to move to track `target`?
///
/// The epsilon keeps sub-tick noise from churning cancel/replace cycles; an
/// order that drifted outside the valid range always repositions.
pub fn needs_reposition(order: &LiveOrder, target: f64, epsilon: f64, range: &PriceRange) -> bool {
    if !range.contains(order.price) {
        return true;
    }
    (order.price - target).abs() > epsilon
}

pub struct SideQuoter {
    side: Side,
    symbol: String,
    qty: f64,
    range: PriceRange,
    tick: f64,
    qty_step: f64,
    retry: RetryPolicy,
    client: Arc<dyn ExchangeClient>,
    current: Option<LiveOrder>,
}

impl SideQuoter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        side: Side,
        symbol: String,
        qty: f64,
        range: PriceRange,
        tick: f64,
        qty_step: f64,
        retry: RetryPolicy,
        client: Arc<dyn ExchangeClient>,
    ) -> Self {
        Self {
            side,
            symbol,
            qty,
            range,
            tick,
            qty_step,
            retry,
            client,
            current: None,
        }
    }

    /// The side's live order, if one is resting.
    pub fn current(&self) -> Option<&LiveOrder> {
        self.current.as_ref()
    }

    /// The quote this side wants resting at `target`.
    pub fn intent(&self, target: f64) -> QuoteIntent {
        QuoteIntent {
            side: self.side,
            price: target,
            qty: round_down_to_step(self.qty, self.qty_step),
        }
    }

    /// Drive the live order toward `target` for this cycle.
    ///
    /// Idle → place at target. Placed and drifted → cancel, then place fresh.
    /// A cancel that raced a fill leaves the side idle for this cycle.
    pub async fn sync_to_target(&mut self, target: f64) -> Result<()> {
        if let Some(order) = &self.current {
            if !needs_reposition(order, target, self.tick / 2.0, &self.range) {
                return Ok(());
            }

            let order_id = order.order_id.clone();
            match self.cancel_with_retry(&order_id).await? {
                CancelOutcome::Cancelled => {
                    debug!("[Quote:{}] cancelled {} to reposition", self.side, order_id);
                    self.current = None;
                }
                CancelOutcome::NotFound => {
                    // Filled (or expired) before the cancel landed; re-quote
                    // from scratch next cycle once the book reflects it.
                    info!("[Quote:{}] {} already gone, back to idle", self.side, order_id);
                    self.current = None;
                    return Ok(());
                }
            }
        }

        let intent = self.intent(target);
        let order_id = self.place_with_retry(&intent).await?;
        info!(
            "[Quote:{}] placed {} {} @ {}",
            self.side, intent.qty, self.symbol, intent.price
        );
        self.current = Some(LiveOrder {
            order_id,
            side: self.side,
            price: intent.price,
            qty: intent.qty,
            status: OrderStatus::Open,
        });
        Ok(())
    }

    /// Best-effort cancel of the live order, used when the loop stops.
    pub async fn cancel_outstanding(&mut self) -> Result<()> {
        if let Some(order) = self.current.take() {
            match self.cancel_with_retry(&order.order_id).await {
                Ok(_) => {
                    info!("[Quote:{}] cancelled {} on stop", self.side, order.order_id);
                }
                Err(e) => {
                    // Put it back so status still shows what may be resting.
                    self.current = Some(order);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn place_with_retry(&self, intent: &QuoteIntent) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .client
                .place_order(&self.symbol, intent.side, intent.price, intent.qty)
                .await
            {
                Ok(order_id) => return Ok(order_id),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.base_delay * 2_u32.pow(attempt - 1);
                    debug!(
                        "[Quote:{}] place attempt {} failed ({}), retrying in {:?}",
                        self.side, attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn cancel_with_retry(&self, order_id: &str) -> Result<CancelOutcome> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.cancel_order(&self.symbol, order_id).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.base_delay * 2_u32.pow(attempt - 1);
                    debug!(
                        "[Quote:{}] cancel attempt {} failed ({}), retrying in {:?}",
                        self.side, attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
