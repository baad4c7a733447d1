//! Prelude module - re-exports commonly used types for convenience

pub use crate::context::{CancelHandle, Context};
pub use crate::error::{Result, SubmitOrdersError, VenueLinkError};
pub use crate::types::{
    balance::*,
    market::*,
    order::*,
    venue::*,
};

// Re-export commonly used external types
pub use rust_decimal::Decimal;
pub use chrono::{DateTime, Utc};
