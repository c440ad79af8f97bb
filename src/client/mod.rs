//! Exchange client abstraction.
//!
//! The engine talks to the exchange only through [`ExchangeClient`], so the
//! quoting logic is independent of the transport. The shipped implementation is
//! the signed MEXC REST adapter in [`mexc`], usually wrapped in
//! [`RateLimited`] to keep the two quoting loops inside the request budget.

pub mod mexc;
pub mod rate_limit;

pub use rate_limit::{RateLimited, RateLimiter};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BookSnapshot, Side};

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited by exchange")]
    RateLimited,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    BadResponse(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

impl ExchangeError {
    /// Transient failures are worth retrying with backoff; permanent ones
    /// (bad credentials, invalid parameters) stop the affected side.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExchangeError::Timeout
                | ExchangeError::RateLimited
                | ExchangeError::Transport(_)
                | ExchangeError::BadResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Outcome of a cancel request. `NotFound` is not an error: the exchange may
/// have matched or expired the order between our poll and the cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
}

/// Capability the quoting engine consumes.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the top `depth` levels per side for `symbol`.
    async fn book_snapshot(&self, symbol: &str, depth: usize) -> Result<BookSnapshot>;

    /// Place a limit order, returning the exchange-assigned id.
    async fn place_order(&self, symbol: &str, side: Side, price: f64, qty: f64) -> Result<String>;

    /// Cancel an order by id.
    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CancelOutcome>;
}
