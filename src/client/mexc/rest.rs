//! REST client for MEXC spot.
//!
//! Depth is public; order placement and cancellation go through the signed
//! query-string scheme in [`super::auth`]. Errors are classified into the
//! transient/permanent taxonomy the engine's retry logic relies on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use super::auth::Credentials;
use super::types::{ApiError, CancelAck, DepthResponse, OrderAck};
use crate::client::{CancelOutcome, ExchangeClient, ExchangeError, Result};
use crate::config::ExchangeConfig;
use crate::domain::{BookSnapshot, OrderStatus, PriceLevel, Side};

/// MEXC rejects a cancel for an order it no longer knows with this code.
const CODE_UNKNOWN_ORDER: i64 = -2011;

pub struct MexcClient {
    base_url: String,
    http: Client,
    creds: Credentials,
}

impl MexcClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.request_timeout_ms.min(3_000)))
            .build()
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            creds: Credentials::new(config.api_key.clone(), config.secret_key.clone()),
        })
    }

    async fn signed_send(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Response> {
        let query = self.creds.signed_query(params)?;
        let url = format!("{}{}?{}", self.base_url, endpoint, query);

        self.http
            .request(method, url)
            .header("X-MEXC-APIKEY", self.creds.api_key())
            .send()
            .await
            .map_err(map_transport_err)
    }
}

#[async_trait]
impl ExchangeClient for MexcClient {
    async fn book_snapshot(&self, symbol: &str, depth: usize) -> Result<BookSnapshot> {
        let url = format!(
            "{}/api/v3/depth?symbol={}&limit={}",
            self.base_url, symbol, depth
        );

        let response = self.http.get(&url).send().await.map_err(map_transport_err)?;
        let response = require_success(response).await?;

        let depth: DepthResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::BadResponse(e.to_string()))?;

        Ok(BookSnapshot::new(
            parse_levels(&depth.bids)?,
            parse_levels(&depth.asks)?,
        ))
    }

    async fn place_order(&self, symbol: &str, side: Side, price: f64, qty: f64) -> Result<String> {
        let params = [
            ("symbol", symbol.to_string()),
            ("side", side.as_str().to_string()),
            ("type", "LIMIT".to_string()),
            ("quantity", fmt_decimal(qty)),
            ("price", fmt_decimal(price)),
        ];

        let response = self
            .signed_send(reqwest::Method::POST, "/api/v3/order", &params)
            .await?;
        let response = require_success(response).await?;

        let ack: OrderAck = response
            .json()
            .await
            .map_err(|e| ExchangeError::BadResponse(e.to_string()))?;

        debug!("[Mexc] Placed {} {} @ {}: {}", side, qty, price, ack.order_id);
        Ok(ack.order_id)
    }

    async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<CancelOutcome> {
        let params = [
            ("symbol", symbol.to_string()),
            ("orderId", order_id.to_string()),
        ];

        let response = self
            .signed_send(reqwest::Method::DELETE, "/api/v3/order", &params)
            .await?;

        if response.status().is_success() {
            let ack: CancelAck = response
                .json()
                .await
                .map_err(|e| ExchangeError::BadResponse(e.to_string()))?;
            let status = ack
                .status
                .as_deref()
                .map(OrderStatus::from_exchange)
                .unwrap_or(OrderStatus::Cancelled);
            debug!("[Mexc] Cancelled {} ({:?})", ack.order_id, status);
            return Ok(CancelOutcome::Cancelled);
        }

        match classify_failure(response).await {
            // The order matched or expired before the cancel arrived.
            ExchangeError::Rejected(msg) if is_unknown_order(&msg) => {
                debug!("[Mexc] Cancel raced fill for {}: {}", order_id, msg);
                Ok(CancelOutcome::NotFound)
            }
            err => Err(err),
        }
    }
}

/// Pass a successful response through, classify everything else.
async fn require_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(classify_failure(response).await)
    }
}

async fn classify_failure(response: Response) -> ExchangeError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let api_err: Option<ApiError> = serde_json::from_str(&body).ok();
    let msg = api_err
        .as_ref()
        .map(|e| format!("{} (code {})", e.msg, e.code))
        .unwrap_or_else(|| body.clone());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExchangeError::Auth(msg),
        StatusCode::TOO_MANY_REQUESTS => ExchangeError::RateLimited,
        // 418 is the exchange's temporary IP ban after repeated 429s
        StatusCode::IM_A_TEAPOT => ExchangeError::RateLimited,
        s if s.is_server_error() => ExchangeError::Transport(format!("HTTP {}: {}", s, msg)),
        _ => ExchangeError::Rejected(msg),
    }
}

fn is_unknown_order(msg: &str) -> bool {
    msg.contains(&format!("code {}", CODE_UNKNOWN_ORDER))
        || msg.contains("Unknown order")
        || msg.contains("order does not exist")
}

fn map_transport_err(e: reqwest::Error) -> ExchangeError {
    if e.is_timeout() {
        ExchangeError::Timeout
    } else {
        ExchangeError::Transport(e.to_string())
    }
}

fn parse_levels(raw: &[[String; 2]]) -> Result<Vec<PriceLevel>> {
    raw.iter()
        .map(|[price, qty]| {
            let price = price
                .parse::<f64>()
                .map_err(|_| ExchangeError::BadResponse(format!("bad price: {}", price)))?;
            let qty = qty
                .parse::<f64>()
                .map_err(|_| ExchangeError::BadResponse(format!("bad quantity: {}", qty)))?;
            Ok(PriceLevel::new(price, qty))
        })
        .collect()
}

/// Format a price/quantity without binary-float tails or scientific notation.
fn fmt_decimal(value: f64) -> String {
    let mut s = format!("{:.8}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
