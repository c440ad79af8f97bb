//! Range Quoter
//!
//! Automated market-quoting engine for a single pair on MEXC spot. Keeps one
//! buy and one sell limit order resting, each confined to its configured price
//! interval, repositioning ahead of competitors large enough to matter.

pub mod client;
pub mod config;
pub mod domain;
pub mod engine;
pub mod utils;

// Re-export commonly used items
pub use client::{
    mexc::MexcClient, CancelOutcome, ExchangeClient, ExchangeError, RateLimited, RateLimiter,
};
pub use config::{ConfigError, PriceRange, QuoterConfig, TradingConfig};
pub use domain::{BookSnapshot, LiveOrder, OrderStatus, PriceLevel, QuoteIntent, Side};
pub use engine::{Engine, EngineError, EngineStatus};
pub use utils::init_tracing;
