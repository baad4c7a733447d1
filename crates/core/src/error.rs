use thiserror::Error;

use crate::types::{Capability, Order, VenueId};

pub type Result<T> = std::result::Result<T, VenueLinkError>;

#[derive(Error, Debug)]
pub enum VenueLinkError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("{venue} returns {operation} failure")]
    VenueRejected { venue: VenueId, operation: String },

    #[error("Response parse error: {0}")]
    ResponseParse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("{capability} is not implemented for {venue}")]
    NotImplemented { venue: VenueId, capability: Capability },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl VenueLinkError {
    pub fn venue_rejected(venue: VenueId, operation: impl Into<String>) -> Self {
        Self::VenueRejected {
            venue,
            operation: operation.into(),
        }
    }

    pub fn not_implemented(venue: VenueId, capability: Capability) -> Self {
        Self::NotImplemented { venue, capability }
    }

    /// The venue could not be reached, or the call was abandoned before it
    /// completed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_) | Self::Cancelled)
    }

    /// The venue answered, but not with something we could read.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::ResponseParse(_) | Self::Json(_))
    }

    pub fn is_venue_rejection(&self) -> bool {
        matches!(self, Self::VenueRejected { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedParameter(_))
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

/// Failure of a sequential order batch.
///
/// Orders are placed one at a time; `created` holds every order the venue
/// accepted before `source` stopped the batch.
#[derive(Error, Debug)]
#[error("order batch stopped after {} created order(s): {source}", .created.len())]
pub struct SubmitOrdersError {
    pub created: Vec<Order>,
    #[source]
    pub source: VenueLinkError,
}

impl SubmitOrdersError {
    pub fn new(created: Vec<Order>, source: VenueLinkError) -> Self {
        Self { created, source }
    }

    pub fn into_parts(self) -> (Vec<Order>, VenueLinkError) {
        (self.created, self.source)
    }
}
