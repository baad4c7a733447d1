use async_trait::async_trait;

use venuelink_core::Result;

use crate::model::{BalanceRow, Envelope, OrderRow, PlaceOrderPayload};

/// Authenticated transport to the FTX REST API.
///
/// Implementations sign and send one request per call and return the decoded
/// envelope untouched: `success == false` is not an error at this layer.
/// Cancellation is applied by the caller, which drops the returned future.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>>;

    async fn place_order(&self, payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>>;

    async fn open_orders(&self, market: &str) -> Result<Envelope<Vec<OrderRow>>>;
}
