//! # Event Publisher
//!
//! Turns a typed event into a channel name and serialized envelope and hands
//! it to the transport. A transport failure is returned to the caller, who
//! decides whether the originating operation fails.

use std::sync::Arc;

use serde::Serialize;
use shared_types::EventEnvelope;
use tracing::debug;

use crate::error::BusError;
use crate::events::EventKind;
use crate::transport::Transport;

/// Publishes envelopes stamped with this service as their source.
#[derive(Clone)]
pub struct EventPublisher {
    transport: Arc<dyn Transport>,
    source: String,
}

impl EventPublisher {
    /// Create a publisher emitting as `source`.
    pub fn new(transport: Arc<dyn Transport>, source: impl Into<String>) -> Self {
        Self {
            transport,
            source: source.into(),
        }
    }

    /// Build the envelope for `kind` without emitting it.
    ///
    /// `event_type` is the sub-type when one is given, otherwise the event
    /// name.
    pub fn envelope<T>(
        &self,
        kind: EventKind,
        sub_type: Option<&str>,
        user_reference: &str,
        data: T,
    ) -> EventEnvelope<T> {
        let event_name = kind.event_name();
        let event_type = sub_type.map_or_else(|| event_name.clone(), str::to_string);
        EventEnvelope::new(event_name, event_type, &self.source, user_reference, data)
    }

    /// Publish `data` as a `kind` event about `user_reference`.
    ///
    /// The sub-type, when given, routes the event (`WRAPPER:SUB`) and becomes
    /// its `event_type`. Returns the channel the event went out on.
    pub async fn publish<T: Serialize + Send>(
        &self,
        kind: EventKind,
        sub_type: Option<&str>,
        user_reference: &str,
        data: T,
    ) -> Result<String, BusError> {
        let envelope = self.envelope(kind, sub_type, user_reference, data);
        self.emit(kind.channel(sub_type), envelope).await
    }

    /// Publish on the bare `kind` channel with `event_type` carried only in
    /// the envelope.
    pub async fn publish_typed<T: Serialize + Send>(
        &self,
        kind: EventKind,
        event_type: &str,
        user_reference: &str,
        data: T,
    ) -> Result<String, BusError> {
        let envelope = self.envelope(kind, Some(event_type), user_reference, data);
        self.emit(kind.channel(None), envelope).await
    }

    async fn emit<T: Serialize + Send>(
        &self,
        channel: String,
        envelope: EventEnvelope<T>,
    ) -> Result<String, BusError> {
        let payload = envelope.to_bytes()?;

        let receivers = self.transport.publish(&channel, payload).await?;
        debug!(
            channel = %channel,
            event_reference = %envelope.event_reference,
            receivers,
            "Event published"
        );
        Ok(channel)
    }
}
