pub mod logging;

pub use logging::{env_filter, setup_logging, LoggingGuard, StructuredLogger};

pub mod prelude {
    pub use crate::logging::{setup_logging, LoggingGuard, StructuredLogger};
}
