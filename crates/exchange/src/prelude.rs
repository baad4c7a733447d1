//! Prelude module for venuelink-exchange
//!
//! Re-exports commonly used types and traits

pub use crate::traits::{BalanceHandler, BalanceStream, Exchange};

pub use crate::normalizer::{decimal_from_wire, trim_lower, trim_upper, CurrencyNormalizer};
pub use crate::stream::{BalanceEvent, StandardStream};

// Re-export common types from core
pub use venuelink_core::prelude::*;
