//! Signed REST adapter for MEXC spot.

mod auth;
mod rest;
mod types;

pub use auth::Credentials;
pub use rest::MexcClient;
