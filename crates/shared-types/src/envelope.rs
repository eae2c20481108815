//! # `EventEnvelope`
//!
//! The wrapper for every event this service publishes or consumes.
//!
//! ## Properties
//!
//! - **Identity**: each envelope carries a fresh `event_reference`.
//! - **Attribution**: `event_source` is the emitting service name and
//!   `event_user_reference` the aggregate the event is about.
//! - **Immutability**: an envelope is built once at the moment of the state
//!   change and never edited. There is no outbox and no delivery receipt.
//!
//! The wire shape is
//! `{event_reference, event_name, event_date, event_type, event_source,
//! event_user_reference, event_data}` with `event_date` in RFC3339.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event envelope around a payload of type `T`.
///
/// Inbound envelopes are decoded with `T = serde_json::Value` first, then the
/// payload is decoded again into a concrete shape once the discriminator is
/// known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T = serde_json::Value> {
    pub event_reference: String,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    pub event_source: String,
    pub event_user_reference: String,
    pub event_data: T,
}

impl<T> EventEnvelope<T> {
    /// Build an envelope stamped with a new reference and the current time.
    pub fn new(
        event_name: impl Into<String>,
        event_type: impl Into<String>,
        event_source: impl Into<String>,
        event_user_reference: impl Into<String>,
        event_data: T,
    ) -> Self {
        Self {
            event_reference: Uuid::new_v4().to_string(),
            event_name: event_name.into(),
            event_date: Utc::now(),
            event_type: event_type.into(),
            event_source: event_source.into(),
            event_user_reference: event_user_reference.into(),
            event_data,
        }
    }
}

impl<T: Serialize> EventEnvelope<T> {
    /// Serialize the full envelope, nested data included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl EventEnvelope {
    /// Decode an envelope with an untyped payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Decode the payload into a concrete shape.
    pub fn decode_data<D: DeserializeOwned>(&self) -> Result<D, serde_json::Error> {
        D::deserialize(&self.event_data)
    }
}
