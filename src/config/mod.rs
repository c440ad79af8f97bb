//! Configuration loading and validation.
//!
//! The YAML file carries everything except credentials; API keys come from the
//! environment so they never end up committed next to the trading parameters.
//! The whole structure is validated once at engine start and is immutable while
//! the engine runs; changing it means stop + restart.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// A closed price interval one side's quotes must stay within.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    pub fn clamp(&self, price: f64) -> f64 {
        price.clamp(self.min, self.max)
    }
}

/// Per-pair trading parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    pub symbol: String,
    pub buy_quantity: f64,
    pub sell_quantity: f64,
    pub buy_range: PriceRange,
    pub sell_range: PriceRange,
    /// Max fraction a target may drift from the first observed mid-price.
    #[serde(default = "default_max_price_deviation")]
    pub max_price_deviation: f64,
    /// Competitors below this notional (quote currency) are not worth beating.
    #[serde(default = "default_min_competitor_size")]
    pub min_competitor_size: f64,
}

fn default_max_price_deviation() -> f64 {
    0.05
}

fn default_min_competitor_size() -> f64 {
    10.0
}

impl TradingConfig {
    /// Validate the price ranges. Checks run in a fixed order and the first
    /// violated rule is the one reported; later rules are not evaluated.
    pub fn validate(&self) -> Result<()> {
        if self.buy_range.min <= 0.0
            || self.buy_range.max <= 0.0
            || self.sell_range.min <= 0.0
            || self.sell_range.max <= 0.0
        {
            return Err(ConfigError::ValidationError(
                "price range bounds must be positive".to_string(),
            ));
        }

        if self.buy_range.min >= self.buy_range.max {
            return Err(ConfigError::ValidationError(
                "buy_range.min must be below buy_range.max".to_string(),
            ));
        }

        if self.sell_range.min >= self.sell_range.max {
            return Err(ConfigError::ValidationError(
                "sell_range.min must be below sell_range.max".to_string(),
            ));
        }

        if self.buy_range.max >= self.sell_range.min {
            return Err(ConfigError::ValidationError(
                "buy_range must not overlap sell_range".to_string(),
            ));
        }

        if self.buy_quantity <= 0.0 || self.sell_quantity <= 0.0 {
            return Err(ConfigError::ValidationError(
                "order quantities must be positive".to_string(),
            ));
        }

        if self.min_competitor_size < 0.0 {
            return Err(ConfigError::ValidationError(
                "min_competitor_size must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Engine cadence and exchange market metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Poll interval for each side's quoting loop.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Book levels to request per side; enough to find an in-range competitor
    /// even when the best level sits outside the range.
    #[serde(default = "default_book_depth")]
    pub book_depth: usize,
    /// Exchange minimum price increment for the symbol.
    pub tick_size: f64,
    /// Exchange minimum quantity increment for the symbol.
    pub qty_step: f64,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_book_depth() -> usize {
    20
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.tick_size <= 0.0 || self.qty_step <= 0.0 {
            return Err(ConfigError::ValidationError(
                "tick_size and qty_step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Exchange transport settings. Credentials are filled from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Request budget for the token bucket gating the client.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: RateLimitConfig,

    #[serde(skip)]
    pub api_key: String,
    #[serde(skip)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub requests: u32,
    pub window_secs: u64,
}

fn default_base_url() -> String {
    "https://api.mexc.com".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_rate_limit() -> RateLimitConfig {
    // MEXC spot allows 500 weight / 10s per endpoint group; stay well under.
    RateLimitConfig {
        requests: 100,
        window_secs: 10,
    }
}

/// Top-level configuration for the quoter binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoterConfig {
    pub trading: TradingConfig,
    pub engine: EngineConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            rate_limit: default_rate_limit(),
            api_key: String::new(),
            secret_key: String::new(),
        }
    }
}

impl QuoterConfig {
    /// Load configuration from a YAML file, pulling credentials from the
    /// `MEXC_API_KEY` / `MEXC_SECRET_KEY` environment variables.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: QuoterConfig = serde_yaml::from_str(&yaml_content)?;

        config.exchange.api_key = std::env::var("MEXC_API_KEY")
            .map_err(|_| ConfigError::EnvVarMissing("MEXC_API_KEY".to_string()))?;
        config.exchange.secret_key = std::env::var("MEXC_SECRET_KEY")
            .map_err(|_| ConfigError::EnvVarMissing("MEXC_SECRET_KEY".to_string()))?;

        config.validate()?;

        info!(
            "Loaded config for {}: buy {}..{} sell {}..{}",
            config.trading.symbol,
            config.trading.buy_range.min,
            config.trading.buy_range.max,
            config.trading.sell_range.min,
            config.trading.sell_range.max
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.trading.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}
