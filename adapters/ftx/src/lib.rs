//! FTX Exchange Adapter
//!
//! Implements the canonical [`Exchange`] surface over the FTX REST API:
//! balance query, order submission and open-order query. Every other
//! capability answers `NotImplemented`.

use async_trait::async_trait;
use std::sync::Arc;

use venuelink_core::config::VenueLinkConfig;
use venuelink_core::prelude::*;
use venuelink_exchange::{CurrencyNormalizer, Exchange};
use venuelink_monitoring::StructuredLogger;

pub mod client;
pub mod convert;
pub mod gateway;
pub mod model;

pub use client::FtxRestClient;
pub use gateway::RequestGateway;
pub use model::{BalanceRow, Envelope, OrderRow, PlaceOrderPayload};

const CAPABILITIES: &[Capability] = &[
    Capability::AccountBalances,
    Capability::SubmitOrders,
    Capability::OpenOrders,
];

/// The only time-in-force FTX orders are placed with.
pub const SUPPORTED_TIME_IN_FORCE: TimeInForce = TimeInForce::GoodTillCanceled;

pub struct FtxExchange {
    gateway: Arc<dyn RequestGateway>,
    normalizer: CurrencyNormalizer,
    logger: StructuredLogger,
}

impl FtxExchange {
    pub fn new(gateway: Arc<dyn RequestGateway>, normalizer: CurrencyNormalizer, logger: StructuredLogger) -> Self {
        Self {
            gateway,
            normalizer,
            logger,
        }
    }

    /// Adapter backed by a signed [`FtxRestClient`].
    pub fn from_config(config: &VenueLinkConfig, logger: StructuredLogger) -> Result<Self> {
        let client = FtxRestClient::new(&config.ftx, logger.clone())?;
        let normalizer = CurrencyNormalizer::with_aliases(&config.currency_aliases);

        Ok(Self::new(Arc::new(client), normalizer, logger))
    }

    fn rejected(&self, operation: &str, message: Option<&str>) -> VenueLinkError {
        self.logger.log_venue_rejection(&self.name().to_string(), operation);
        if let Some(message) = message {
            self.logger.log_warning(message, Some(operation));
        }
        VenueLinkError::venue_rejected(self.name(), operation)
    }

    async fn submit_order(&self, ctx: &Context, order: &SubmitOrder) -> Result<Order> {
        if order.time_in_force != SUPPORTED_TIME_IN_FORCE {
            return Err(VenueLinkError::UnsupportedParameter(format!(
                "time in force {} (only {} is supported)",
                order.time_in_force, SUPPORTED_TIME_IN_FORCE
            )));
        }

        let payload = convert::to_place_order_payload(order);
        let envelope = ctx.run(self.gateway.place_order(&payload)).await?;

        if !envelope.success {
            return Err(self.rejected("placing order", envelope.error.as_deref()));
        }

        let row = envelope
            .result
            .ok_or_else(|| VenueLinkError::ResponseParse("order placement result is missing".to_string()))?;
        let created = convert::to_global_order(&row)?;

        self.logger.log_order(
            &self.name().to_string(),
            &created.symbol,
            &created.side.to_string(),
            created.quantity,
            created.price,
            created.order_id,
        );

        Ok(created)
    }
}

#[async_trait]
impl Exchange for FtxExchange {
    fn name(&self) -> VenueId {
        VenueId::Ftx
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }

    async fn query_account_balances(&self, ctx: &Context) -> Result<BalanceMap> {
        let envelope = ctx.run(self.gateway.balances()).await?;

        if !envelope.success {
            return Err(self.rejected("querying balances", envelope.error.as_deref()));
        }

        let rows = envelope
            .result
            .ok_or_else(|| VenueLinkError::ResponseParse("balances result is missing".to_string()))?;
        convert::to_balance_map(&rows, &self.normalizer)
    }

    async fn submit_orders(
        &self,
        ctx: &Context,
        orders: &[SubmitOrder],
    ) -> std::result::Result<Vec<Order>, SubmitOrdersError> {
        let mut created = Vec::with_capacity(orders.len());

        for order in orders {
            let placed = match ctx.check() {
                Ok(()) => self.submit_order(ctx, order).await,
                Err(e) => Err(e),
            };

            match placed {
                Ok(order) => created.push(order),
                Err(e) => {
                    let context = format!("submitting order for {}", order.symbol);
                    self.logger.log_error(&e.to_string(), Some(context.as_str()));
                    return Err(SubmitOrdersError::new(created, e));
                }
            }
        }

        Ok(created)
    }

    async fn query_open_orders(&self, ctx: &Context, symbol: &str) -> Result<Vec<Order>> {
        let market = venuelink_exchange::trim_upper(symbol);
        let envelope = ctx.run(self.gateway.open_orders(&market)).await?;

        if !envelope.success {
            return Err(self.rejected("querying open orders", envelope.error.as_deref()));
        }

        let rows = envelope
            .result
            .ok_or_else(|| VenueLinkError::ResponseParse("open orders result is missing".to_string()))?;
        rows.iter().map(convert::to_global_order).collect()
    }
}
