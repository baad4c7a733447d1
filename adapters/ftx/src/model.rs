use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every FTX REST response: a success flag independent of the HTTP status,
/// the payload on success, a message on failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Row of `GET /api/wallet/balances`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceRow {
    pub coin: String,
    pub free: f64,
    pub total: f64,
}

/// Row of `POST /api/orders` and `GET /api/orders`.
///
/// Fields are optional so a missing one surfaces as a translation error
/// rather than a decode failure of the whole envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRow {
    pub id: Option<u64>,
    pub client_id: Option<String>,
    pub market: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub side: Option<String>,
    pub price: Option<f64>,
    pub size: Option<f64>,
    pub filled_size: Option<f64>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub ioc: bool,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub reduce_only: bool,
}

/// Body of `POST /api/orders`.
///
/// ```json
/// {"market": "XRP-PERP", "side": "sell", "price": 0.306525, "type": "limit",
///  "size": 31431.0, "reduceOnly": false, "ioc": false, "postOnly": false,
///  "clientId": null}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderPayload {
    pub market: String,
    pub side: String,
    pub price: Option<Decimal>,
    #[serde(rename = "type")]
    pub order_type: String,
    pub size: Decimal,
    pub reduce_only: bool,
    pub ioc: bool,
    pub post_only: bool,
    pub client_id: Option<String>,
}
