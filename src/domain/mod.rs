//! Core domain types shared across the engine and the exchange client.

pub mod order;
pub mod orderbook;
pub mod ticks;

pub use order::{LiveOrder, OrderStatus, QuoteIntent, Side};
pub use orderbook::{BookSnapshot, PriceLevel};
pub use ticks::{round_down_to_step, round_to_tick_down, round_to_tick_up};
