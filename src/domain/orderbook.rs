//! Point-in-time order book snapshots.
//!
//! A snapshot is replaced wholesale every poll cycle and never merged with a
//! prior one, so staleness is bounded by the poll interval.

use chrono::{DateTime, Utc};

use super::Side;

/// One aggregated price level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevel {
    pub price: f64,
    pub qty: f64,
}

impl PriceLevel {
    pub fn new(price: f64, qty: f64) -> Self {
        Self { price, qty }
    }

    /// Size of the level in quote currency.
    pub fn notional(&self) -> f64 {
        self.price * self.qty
    }
}

/// Top levels of the book at one instant.
///
/// Invariant: `bids` sorted descending by price, `asks` ascending.
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub captured_at: DateTime<Utc>,
}

impl BookSnapshot {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self {
            bids,
            asks,
            captured_at: Utc::now(),
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Mid of the best bid/ask, if both sides have depth.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(b), Some(a)) => Some((b.price + a.price) / 2.0),
            _ => None,
        }
    }

    /// The levels a quote on `side` queues against: buy quotes compete with
    /// other bids, sell quotes with other asks.
    pub fn levels_for(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }
}
