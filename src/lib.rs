pub use venuelink_account::{Account, AccountLoadError};
pub use venuelink_core::prelude::*;
pub use venuelink_exchange::prelude::*;
pub use venuelink_monitoring::prelude::*;

// Re-export venue adapters
pub use venuelink_ftx::{
    BalanceRow, Envelope, FtxExchange, FtxRestClient, OrderRow, PlaceOrderPayload, RequestGateway,
};

pub mod config {
    pub use venuelink_core::config::*;
}
