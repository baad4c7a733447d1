use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use venuelink_core::{
    AccountInfo, BalanceMap, Capability, Context, Deposit, Interval, KLine, KLineQueryOptions,
    MarketMap, Order, Result, SubmitOrder, SubmitOrdersError, Ticker, Trade, TradeQueryOptions,
    VenueId, VenueLinkError, Withdraw,
};

/// Callback for balance pushes from a stream.
///
/// Invoked on the stream's own task; keep it short and non-blocking.
pub type BalanceHandler = Arc<dyn Fn(&BalanceMap) + Send + Sync>;

/// The canonical exchange surface shared by every venue adapter.
///
/// Balance query, order submission and open-order query are mandatory. Every
/// other operation defaults to `VenueLinkError::NotImplemented`; an adapter
/// overrides the ones it supports and lists them in
/// [`Exchange::capabilities`].
#[async_trait]
pub trait Exchange: Send + Sync {
    fn name(&self) -> VenueId;

    fn capabilities(&self) -> &[Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    fn unsupported(&self, capability: Capability) -> VenueLinkError {
        VenueLinkError::not_implemented(self.name(), capability)
    }

    async fn query_account_balances(&self, ctx: &Context) -> Result<BalanceMap>;

    /// Place `orders` one by one. The first failure stops the batch; the
    /// error carries the orders created before it.
    async fn submit_orders(
        &self,
        ctx: &Context,
        orders: &[SubmitOrder],
    ) -> std::result::Result<Vec<Order>, SubmitOrdersError>;

    async fn query_open_orders(&self, ctx: &Context, symbol: &str) -> Result<Vec<Order>>;

    async fn platform_fee_currency(&self) -> Result<String> {
        Err(self.unsupported(Capability::PlatformFeeCurrency))
    }

    async fn query_markets(&self, _ctx: &Context) -> Result<MarketMap> {
        Err(self.unsupported(Capability::Markets))
    }

    async fn query_account(&self, _ctx: &Context) -> Result<AccountInfo> {
        Err(self.unsupported(Capability::Account))
    }

    async fn query_klines(
        &self,
        _ctx: &Context,
        _symbol: &str,
        _interval: Interval,
        _options: &KLineQueryOptions,
    ) -> Result<Vec<KLine>> {
        Err(self.unsupported(Capability::KLines))
    }

    async fn query_trades(
        &self,
        _ctx: &Context,
        _symbol: &str,
        _options: &TradeQueryOptions,
    ) -> Result<Vec<Trade>> {
        Err(self.unsupported(Capability::Trades))
    }

    async fn query_deposit_history(
        &self,
        _ctx: &Context,
        _asset: &str,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<Deposit>> {
        Err(self.unsupported(Capability::DepositHistory))
    }

    async fn query_withdraw_history(
        &self,
        _ctx: &Context,
        _asset: &str,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<Withdraw>> {
        Err(self.unsupported(Capability::WithdrawHistory))
    }

    async fn query_closed_orders(
        &self,
        _ctx: &Context,
        _symbol: &str,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
        _last_order_id: u64,
    ) -> Result<Vec<Order>> {
        Err(self.unsupported(Capability::ClosedOrders))
    }

    async fn cancel_orders(&self, _ctx: &Context, _orders: &[Order]) -> Result<()> {
        Err(self.unsupported(Capability::CancelOrders))
    }

    async fn query_ticker(&self, _ctx: &Context, _symbol: &str) -> Result<Ticker> {
        Err(self.unsupported(Capability::Ticker))
    }

    async fn query_tickers(&self, _ctx: &Context, _symbols: &[String]) -> Result<HashMap<String, Ticker>> {
        Err(self.unsupported(Capability::Tickers))
    }
}

/// A push source of account balances.
///
/// Both subscription points deliver complete per-currency records; snapshot
/// and update differ only in how many currencies they cover.
pub trait BalanceStream: Send + Sync {
    fn on_balance_update(&self, handler: BalanceHandler);
    fn on_balance_snapshot(&self, handler: BalanceHandler);
}
