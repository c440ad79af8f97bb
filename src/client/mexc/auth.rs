//! MEXC request signing.
//!
//! Signed endpoints expect the query parameters sorted by key, a millisecond
//! `timestamp`, and an HMAC-SHA256 `signature` over the whole query string,
//! keyed with the account secret.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::client::{ExchangeError, Result};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        // Keys pasted from the exchange UI tend to pick up stray whitespace.
        Self {
            api_key: api_key.into().trim().to_string(),
            secret_key: secret_key.into().trim().to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build the signed query string for a request with the given parameters.
    pub fn signed_query(&self, params: &[(&str, String)]) -> Result<String> {
        self.signed_query_at(params, Utc::now().timestamp_millis())
    }

    fn signed_query_at(&self, params: &[(&str, String)], timestamp_ms: i64) -> Result<String> {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut query = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            query = format!("timestamp={}", timestamp_ms);
        } else {
            query.push_str(&format!("&timestamp={}", timestamp_ms));
        }

        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Auth(format!("invalid secret key: {}", e)))?;
        mac.update(query.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        query.push_str(&format!("&signature={}", signature));
        Ok(query)
    }
}
