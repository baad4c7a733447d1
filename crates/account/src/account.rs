use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tracing::debug;

use venuelink_core::config::ReconcilePolicy;
use venuelink_core::{Balance, BalanceMap, Context, VenueLinkError};
use venuelink_exchange::{BalanceHandler, BalanceStream, Exchange};
use venuelink_monitoring::StructuredLogger;

/// The initial balance query failed.
///
/// `account` is still usable: it is empty and can be bound to a stream, but
/// it holds nothing until the stream delivers.
#[derive(Error, Debug)]
#[error("failed to load account balances: {source}")]
pub struct AccountLoadError {
    pub account: Account,
    #[source]
    pub source: VenueLinkError,
}

impl AccountLoadError {
    pub fn into_parts(self) -> (Account, VenueLinkError) {
        (self.account, self.source)
    }
}

/// Per-currency balances owned behind a single lock.
///
/// Every mutation replaces whole [`Balance`] records inside one critical
/// section, and every read copies the map out under the same lock, so a
/// reader never sees half of a multi-currency update.
#[derive(Debug)]
pub struct Account {
    balances: Mutex<BalanceMap>,
    policy: ReconcilePolicy,
    logger: StructuredLogger,
}

impl Account {
    pub fn new(logger: StructuredLogger) -> Self {
        Self::with_policy(ReconcilePolicy::default(), logger)
    }

    pub fn with_policy(policy: ReconcilePolicy, logger: StructuredLogger) -> Self {
        Self::with_balances(BalanceMap::new(), policy, logger)
    }

    pub fn with_balances(balances: BalanceMap, policy: ReconcilePolicy, logger: StructuredLogger) -> Self {
        Self {
            balances: Mutex::new(balances),
            policy,
            logger,
        }
    }

    /// Seed an account from `exchange`'s balance query.
    ///
    /// On failure the error carries an empty account alongside the query
    /// error.
    pub async fn load(
        exchange: &dyn Exchange,
        ctx: &Context,
        policy: ReconcilePolicy,
        logger: StructuredLogger,
    ) -> std::result::Result<Self, AccountLoadError> {
        let account = Self::with_policy(policy, logger);

        match exchange.query_account_balances(ctx).await {
            Ok(balances) => {
                account
                    .logger
                    .log_balances_loaded(&exchange.name().to_string(), balances.len());
                account.replace_all(balances);
                Ok(account)
            }
            Err(source) => {
                account.logger.log_error(&source.to_string(), Some("account load"));
                Err(AccountLoadError { account, source })
            }
        }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Replace the whole map with `balances`.
    ///
    /// Under [`ReconcilePolicy::NewerTimestamp`] a held record that is newer
    /// than the incoming one for the same currency survives.
    pub fn replace_all(&self, balances: BalanceMap) {
        let mut held = self.balances.lock();

        match self.policy {
            ReconcilePolicy::LastWriterWins => *held = balances,
            ReconcilePolicy::NewerTimestamp => {
                let mut next = balances;
                for (currency, incoming) in next.iter_mut() {
                    if let Some(current) = held.get(currency) {
                        if current.updated_at > incoming.updated_at {
                            *incoming = current.clone();
                        }
                    }
                }
                *held = next;
            }
        }
    }

    /// Replace the record of every currency in `balances`, inserting the ones
    /// not yet held. Currencies absent from `balances` are untouched.
    pub fn apply_update(&self, balances: &BalanceMap) {
        let mut held = self.balances.lock();

        for (currency, incoming) in balances {
            if self.policy == ReconcilePolicy::NewerTimestamp {
                if let Some(current) = held.get(currency) {
                    if current.updated_at > incoming.updated_at {
                        debug!("Discarding stale {} balance from {}", currency, incoming.updated_at);
                        continue;
                    }
                }
            }
            held.insert(currency.clone(), incoming.clone());
        }

        self.logger.log_balance_event("update", balances.len());
    }

    /// A consistent copy of the whole map.
    pub fn snapshot(&self) -> BalanceMap {
        self.balances.lock().clone()
    }

    pub fn balance(&self, currency: &str) -> Option<Balance> {
        self.balances.lock().get(currency).cloned()
    }

    pub fn len(&self) -> usize {
        self.balances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.lock().is_empty()
    }

    /// Route both the update and the snapshot events of `stream` into
    /// [`Account::apply_update`]. The handler holds a weak reference and
    /// becomes a no-op once the account is dropped.
    pub fn bind_stream(self: &Arc<Self>, stream: &dyn BalanceStream) {
        let account: Weak<Self> = Arc::downgrade(self);
        let handler: BalanceHandler = Arc::new(move |balances: &BalanceMap| {
            if let Some(account) = account.upgrade() {
                account.apply_update(balances);
            }
        });

        stream.on_balance_update(handler.clone());
        stream.on_balance_snapshot(handler);
    }

    /// Log every currency with a non-zero available amount.
    pub fn print(&self) {
        let held = self.balances.lock();

        let mut currencies: Vec<&String> = held.keys().collect();
        currencies.sort();

        for currency in currencies {
            let balance = &held[currency];
            if !balance.available.is_zero() {
                self.logger.log_balance(currency, balance.available, balance.locked);
            }
        }
    }
}
