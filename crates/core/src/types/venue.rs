use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueId {
    Ftx,
    Custom(String),
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueId::Ftx => write!(f, "ftx"),
            VenueId::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for VenueId {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ftx" => VenueId::Ftx,
            name => VenueId::Custom(name.to_string()),
        }
    }
}

/// One operation of the canonical exchange surface.
///
/// Adapters declare the subset they implement; calling anything outside that
/// set yields `VenueLinkError::NotImplemented`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    PlatformFeeCurrency,
    Markets,
    Account,
    AccountBalances,
    KLines,
    Trades,
    DepositHistory,
    WithdrawHistory,
    SubmitOrders,
    OpenOrders,
    ClosedOrders,
    CancelOrders,
    Ticker,
    Tickers,
}

impl Capability {
    pub const ALL: [Capability; 14] = [
        Capability::PlatformFeeCurrency,
        Capability::Markets,
        Capability::Account,
        Capability::AccountBalances,
        Capability::KLines,
        Capability::Trades,
        Capability::DepositHistory,
        Capability::WithdrawHistory,
        Capability::SubmitOrders,
        Capability::OpenOrders,
        Capability::ClosedOrders,
        Capability::CancelOrders,
        Capability::Ticker,
        Capability::Tickers,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::PlatformFeeCurrency => "platform fee currency",
            Capability::Markets => "query markets",
            Capability::Account => "query account",
            Capability::AccountBalances => "query account balances",
            Capability::KLines => "query klines",
            Capability::Trades => "query trades",
            Capability::DepositHistory => "query deposit history",
            Capability::WithdrawHistory => "query withdraw history",
            Capability::SubmitOrders => "submit orders",
            Capability::OpenOrders => "query open orders",
            Capability::ClosedOrders => "query closed orders",
            Capability::CancelOrders => "cancel orders",
            Capability::Ticker => "query ticker",
            Capability::Tickers => "query tickers",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueCredentials {
    pub api_key: String,
    pub secret_key: String,
    pub subaccount: Option<String>,
}
