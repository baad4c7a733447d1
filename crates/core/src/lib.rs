pub mod config;
pub mod context;
pub mod error;
pub mod types;
pub mod prelude;

pub use context::{CancelHandle, Context};
pub use error::{Result, SubmitOrdersError, VenueLinkError};
pub use types::*;
