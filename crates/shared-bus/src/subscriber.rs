//! # Subscriber / Dispatcher
//!
//! One long-lived pattern subscription per accepted pattern. Messages are
//! handled one at a time in delivery order:
//!
//! 1. reject if the delivering pattern is not in the registry, or the concrete
//!    channel is not covered by a registered pattern
//! 2. decode the payload to a generic envelope
//! 3. reject if the envelope's `event_name` is not the channel's wrapper
//! 4. hand the envelope to the handler, which routes by discriminator
//!
//! A failure at any step is logged and the loop moves on to the next message.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::EventEnvelope;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::channels::{wrapper_of, ChannelRegistry};
use crate::error::BusError;
use crate::transport::{InboundMessage, Transport};

/// Receives decoded envelopes from a [`Dispatcher`].
#[async_trait]
pub trait MessageHandler: Send + Sync {
    type Error: Display + Send;

    async fn handle(&self, envelope: EventEnvelope) -> Result<(), Self::Error>;
}

/// Counters for one dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    pub handled: u64,
    pub rejected: u64,
    pub failed: u64,
}

/// Drives a single pattern subscription into a handler.
pub struct Dispatcher<H> {
    pattern: String,
    registry: Arc<ChannelRegistry>,
    handler: Arc<H>,
}

impl<H: MessageHandler> Dispatcher<H> {
    pub fn new(pattern: impl Into<String>, registry: Arc<ChannelRegistry>, handler: Arc<H>) -> Self {
        Self {
            pattern: pattern.into(),
            registry,
            handler,
        }
    }

    /// Process one inbound message.
    pub async fn dispatch(&self, message: InboundMessage) -> Result<(), BusError> {
        if !self.registry.is_accepted_channel(&message.pattern) {
            return Err(BusError::ChannelRejected(message.pattern));
        }
        if !self.registry.accepts(&message.channel) {
            return Err(BusError::ChannelRejected(message.channel));
        }

        let envelope =
            EventEnvelope::from_slice(&message.payload).map_err(|e| BusError::Decode {
                channel: message.channel.clone(),
                reason: e.to_string(),
            })?;

        if !envelope
            .event_name
            .eq_ignore_ascii_case(wrapper_of(&message.channel))
        {
            warn!(
                channel = %message.channel,
                event_name = %envelope.event_name,
                "Envelope does not belong to its channel"
            );
            return Err(BusError::ChannelRejected(message.channel));
        }

        debug!(
            channel = %message.channel,
            event_reference = %envelope.event_reference,
            "Dispatching event"
        );

        self.handler
            .handle(envelope)
            .await
            .map_err(|e| BusError::Handler {
                channel: message.channel,
                reason: e.to_string(),
            })
    }

    /// Run until the transport stream ends or `shutdown` flips to `true`.
    ///
    /// Shutdown is observed between messages; a message being handled is
    /// finished, nothing queued behind it is drained.
    pub async fn run(
        self,
        transport: Arc<dyn Transport>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<DispatchStats, BusError> {
        let mut stream = transport.subscribe(&self.pattern)?;
        let mut stats = DispatchStats::default();
        info!(pattern = %self.pattern, "Subscription started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(pattern = %self.pattern, "Shutdown signal received");
                        break;
                    }
                }
                next = stream.next() => {
                    let Some(message) = next else {
                        warn!(pattern = %self.pattern, "Subscription stream closed");
                        break;
                    };
                    stats.received += 1;

                    match self.dispatch(message).await {
                        Ok(()) => stats.handled += 1,
                        Err(BusError::ChannelRejected(name)) => {
                            stats.rejected += 1;
                            warn!(channel = %name, "Rejected message outside the registry");
                        }
                        Err(e) => {
                            stats.failed += 1;
                            error!(error = %e, "Failed to process inbound message");
                        }
                    }
                }
            }
        }

        info!(
            pattern = %self.pattern,
            received = stats.received,
            handled = stats.handled,
            "Subscription stopped"
        );
        Ok(stats)
    }
}
