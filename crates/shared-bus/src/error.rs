//! Bus error types.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors from publishing or dispatching.
#[derive(Debug, Error)]
pub enum BusError {
    /// The transport refused or failed the operation.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The outbound envelope could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The inbound message arrived under an unregistered pattern or channel,
    /// or carried an envelope from another wrapper.
    #[error("Channel rejected: {0}")]
    ChannelRejected(String),

    /// The inbound payload was not a valid envelope.
    #[error("Decode error on {channel}: {reason}")]
    Decode { channel: String, reason: String },

    /// The handler failed on a decoded envelope.
    #[error("Handler error on {channel}: {reason}")]
    Handler { channel: String, reason: String },
}
