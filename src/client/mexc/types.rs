//! Wire types for the MEXC spot REST API.

use serde::Deserialize;

/// `GET /api/v3/depth`; levels arrive as `[price, quantity]` string pairs.
#[derive(Debug, Deserialize)]
pub struct DepthResponse {
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

/// `POST /api/v3/order` acknowledgement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
}

/// `DELETE /api/v3/order` acknowledgement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAck {
    pub order_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}
