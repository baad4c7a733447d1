use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical currency code → balance record.
pub type BalanceMap = HashMap<String, Balance>;

/// A complete per-currency balance record.
///
/// Records are never merged field by field: a newer record for the same
/// currency replaces the older one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub currency: String,
    pub available: Decimal,
    pub locked: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    pub fn new(currency: impl Into<String>, available: Decimal, locked: Decimal) -> Self {
        Self {
            currency: currency.into(),
            available,
            locked,
            updated_at: Utc::now(),
        }
    }

    pub fn with_timestamp(
        currency: impl Into<String>,
        available: Decimal,
        locked: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            currency: currency.into(),
            available,
            locked,
            updated_at,
        }
    }

    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }

    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.locked.is_zero()
    }
}

/// Build a [`BalanceMap`] keyed by each record's currency.
pub fn balance_map<I>(balances: I) -> BalanceMap
where
    I: IntoIterator<Item = Balance>,
{
    balances
        .into_iter()
        .map(|balance| (balance.currency.clone(), balance))
        .collect()
}
