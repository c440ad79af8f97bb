//! Shared status published by the quoting loops.
//!
//! Each loop writes its own side; readers take a point-in-time copy and never
//! block a loop. Nothing here is a source of truth: the live order is owned
//! by the side's quoting machine and only mirrored into the board.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::PriceRange;
use crate::domain::{LiveOrder, OrderStatus, Side};

/// Read-only view of a live order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_id: String,
    pub side: Side,
    pub price: f64,
    pub qty: f64,
    pub status: OrderStatus,
}

impl From<&LiveOrder> for OrderView {
    fn from(order: &LiveOrder) -> Self {
        Self {
            order_id: order.order_id.clone(),
            side: order.side,
            price: order.price,
            qty: order.qty,
            status: order.status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SideStatus {
    pub order: Option<OrderView>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// What the status surface reports for the whole engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub running: bool,
    pub symbol: Option<String>,
    pub buy_range: Option<PriceRange>,
    pub sell_range: Option<PriceRange>,
    pub min_competitor_size: Option<f64>,
    pub buy: SideStatus,
    pub sell: SideStatus,
}

impl EngineStatus {
    pub fn idle() -> Self {
        Self {
            running: false,
            symbol: None,
            buy_range: None,
            sell_range: None,
            min_competitor_size: None,
            buy: SideStatus::default(),
            sell: SideStatus::default(),
        }
    }
}

/// Both sides' latest published state behind one lock.
#[derive(Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<Board>>,
}

#[derive(Default)]
struct Board {
    buy: SideStatus,
    sell: SideStatus,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the side's current order. Does not touch the error slot: the
    /// final publish on loop exit must not erase a halt-causing failure.
    pub fn publish_order(&self, side: Side, order: Option<&LiveOrder>) {
        let mut board = self.inner.write();
        let entry = board.side_mut(side);
        entry.order = order.map(OrderView::from);
        entry.updated_at = Some(Utc::now());
    }

    /// Forget a recorded error once the side completes a healthy cycle.
    pub fn clear_error(&self, side: Side) {
        let mut board = self.inner.write();
        board.side_mut(side).last_error = None;
    }

    /// Record a failure on the side without touching the opposite side or the
    /// last known order view.
    pub fn record_error(&self, side: Side, error: &str) {
        let mut board = self.inner.write();
        let entry = board.side_mut(side);
        entry.last_error = Some(error.to_string());
        entry.updated_at = Some(Utc::now());
    }

    /// Point-in-time copy of one side.
    pub fn side(&self, side: Side) -> SideStatus {
        let board = self.inner.read();
        match side {
            Side::Buy => board.buy.clone(),
            Side::Sell => board.sell.clone(),
        }
    }
}

impl Board {
    fn side_mut(&mut self, side: Side) -> &mut SideStatus {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}
