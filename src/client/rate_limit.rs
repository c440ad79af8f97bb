//! Token-bucket gate in front of the exchange client.
//!
//! Both quoting loops share one bucket sized to the exchange request budget. A
//! caller without a deadline waits for a token; with a deadline it gives up and
//! reports the call as a transient failure instead of stalling its cycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CancelOutcome, ExchangeClient, ExchangeError, Result};
use crate::domain::{BookSnapshot, Side};

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Bucket allowing `requests` per `window`, refilled continuously.
    pub fn new(requests: u32, window: Duration) -> Self {
        let capacity = f64::from(requests.max(1));
        Self {
            capacity,
            refill_per_sec: capacity / window.as_secs_f64().max(0.001),
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take one token, sleeping until one is available.
    pub async fn acquire(&self) {
        loop {
            match self.try_take() {
                Ok(()) => return,
                Err(wait) => tokio::time::sleep(wait).await,
            }
        }
    }

    /// Take one token, giving up once `deadline` has elapsed.
    pub async fn acquire_within(&self, deadline: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            match self.try_take() {
                Ok(()) => return Ok(()),
                Err(wait) => {
                    let remaining = deadline.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        return Err(ExchangeError::Timeout);
                    }
                    tokio::time::sleep(wait.min(remaining)).await;
                }
            }
        }
    }

    /// Take a token if one is available; otherwise report how long until the
    /// next one accrues.
    fn try_take(&self) -> std::result::Result<(), Duration> {
        let mut state = self.state.lock();

        let elapsed = state.last_refill.elapsed().as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        state.last_refill = Instant::now();

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - state.tokens;
            Err(Duration::from_secs_f64(deficit / self.refill_per_sec))
        }
    }
}

/// [`ExchangeClient`] wrapper that takes a token before every call.
pub struct RateLimited<C> {
    inner: C,
    limiter: Arc<RateLimiter>,
    /// How long a call may wait on the bucket before being abandoned.
    permit_deadline: Duration,
}

impl<C> RateLimited<C> {
    pub fn new(inner: C, limiter: Arc<RateLimiter>, permit_deadline: Duration) -> Self {
        Self {
            inner,
            limiter,
            permit_deadline,
        }
    }
}

#[async_trait]
impl<C: ExchangeClient> ExchangeClient for RateLimited<C> {
    async fn book_snapshot(&self, symbol: &str, depth: usize) -> Result<BookSnapshot> {
        self.limiter.acquire_within(self.permit_deadline).await?;
        self.inner.book_snapshot(symbol, depth).await
    }

    async fn place_order(&self, symbol: &str, side: Side, price: f64, qty: f64) -> Result<String> {
        self.limiter.acquire_within(self.permit_deadline).await?;
        self.inner.place_order(symbol, side, price, qty).await
    }

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CancelOutcome> {
        self.limiter.acquire_within(self.permit_deadline).await?;
        self.inner.cancel_order(symbol, order_id).await
    }
}
