//! Order types owned by the per-side quoting machinery.

use serde::Serialize;

/// Side of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Wire representation expected by the exchange API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an exchange order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Map an exchange status string onto our lifecycle. Unknown strings fall
    /// back to `Open`; the next cancel/replace resolves the truth anyway.
    pub fn from_exchange(raw: &str) -> Self {
        match raw {
            "NEW" => OrderStatus::Open,
            "PARTIALLY_FILLED" => OrderStatus::PartiallyFilled,
            "FILLED" => OrderStatus::Filled,
            "CANCELED" | "PARTIALLY_CANCELED" => OrderStatus::Cancelled,
            _ => OrderStatus::Open,
        }
    }
}

/// The single live order a side may have resting on the exchange.
///
/// Exclusively owned by that side's quoting machine; everything else sees
/// point-in-time copies via the status board.
#[derive(Debug, Clone)]
pub struct LiveOrder {
    pub order_id: String,
    pub side: Side,
    pub price: f64,
    pub qty: f64,
    pub status: OrderStatus,
}

/// The price/quantity a side wants resting this cycle. Recomputed every poll,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteIntent {
    pub side: Side,
    pub price: f64,
    pub qty: f64,
}
