//! Thread-safe account balance view.
//!
//! An [`Account`] is seeded once from an exchange balance query and then kept
//! current by a [`BalanceStream`](venuelink_exchange::BalanceStream).

pub mod account;

pub use account::{Account, AccountLoadError};
pub use venuelink_core::config::ReconcilePolicy;
