//! # Transport
//!
//! The publish/subscribe collaborator: `publish(channel, bytes)` and
//! `subscribe(pattern)`. The in-memory implementation backs tests and the
//! single-process deployment; a networked pub/sub client implements the same
//! trait.

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::channels::pattern_matches;
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Errors from the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport has shut down.
    #[error("Transport closed")]
    Closed,

    /// The backing client failed.
    #[error("Transport backend error: {0}")]
    Backend(String),
}

/// A message as delivered by a pattern subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The subscription pattern the message was delivered under.
    pub pattern: String,
    /// The concrete channel it was published to.
    pub channel: String,
    pub payload: Vec<u8>,
}

/// Stream of messages for one pattern subscription.
pub type MessageStream = Pin<Box<dyn Stream<Item = InboundMessage> + Send>>;

/// The publish/subscribe collaborator.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Emit `payload` on `channel`.
    ///
    /// Returns the number of subscribers the message reached. Zero is not an
    /// error.
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<usize, TransportError>;

    /// Open a pattern subscription. A trailing `*` in the pattern matches any
    /// suffix.
    fn subscribe(&self, pattern: &str) -> Result<MessageStream, TransportError>;
}

/// In-memory transport over `tokio::sync::broadcast`.
///
/// Every subscriber sees every publish and filters by its own pattern, which
/// mirrors how a pattern subscription behaves on a shared pub/sub server.
pub struct InMemoryTransport {
    /// Broadcast sender for `(channel, payload)` pairs.
    sender: broadcast::Sender<(String, Vec<u8>)>,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryTransport {
    /// Create a transport with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a transport with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Number of open subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total publishes attempted.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> Result<usize, TransportError> {
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send((channel.to_string(), payload)) {
            Ok(receivers) => {
                debug!(channel = %channel, receivers, "Message published");
                Ok(receivers)
            }
            Err(_) => {
                debug!(channel = %channel, "Message published with no subscribers");
                Ok(0)
            }
        }
    }

    fn subscribe(&self, pattern: &str) -> Result<MessageStream, TransportError> {
        let pattern = pattern.to_string();
        debug!(pattern = %pattern, "New subscription created");

        let stream = BroadcastStream::new(self.sender.subscribe()).filter_map(move |item| {
            match item {
                Ok((channel, payload)) if pattern_matches(&pattern, &channel) => {
                    Some(InboundMessage {
                        pattern: pattern.clone(),
                        channel,
                        payload,
                    })
                }
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some messages dropped");
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let transport = InMemoryTransport::new();
        let receivers = transport.publish("USERCREATEDEVENT", vec![1]).await.unwrap();
        assert_eq!(receivers, 0);
        assert_eq!(transport.messages_published(), 1);
    }

    #[tokio::test]
    async fn test_pattern_subscription_receives_matching_channel() {
        let transport = InMemoryTransport::new();
        let mut stream = transport.subscribe("OTPVALIDATEDEVENT*").unwrap();

        transport.publish("USERCREATEDEVENT", b"skip".to_vec()).await.unwrap();
        transport
            .publish("OTPVALIDATEDEVENT:CREATE_USER", b"take".to_vec())
            .await
            .unwrap();

        let message = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("message");

        assert_eq!(message.pattern, "OTPVALIDATEDEVENT*");
        assert_eq!(message.channel, "OTPVALIDATEDEVENT:CREATE_USER");
        assert_eq!(message.payload, b"take".to_vec());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let transport = InMemoryTransport::new();
        let _a = transport.subscribe("*").unwrap();
        let _b = transport.subscribe("*").unwrap();

        let receivers = transport.publish("X", vec![]).await.unwrap();
        assert_eq!(receivers, 2);
        assert_eq!(transport.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_subscription_drop_cleanup() {
        let transport = InMemoryTransport::new();
        {
            let _a = transport.subscribe("*").unwrap();
            assert_eq!(transport.subscriber_count(), 1);
        }
        assert_eq!(transport.subscriber_count(), 0);
    }

    #[test]
    fn test_default_transport() {
        let transport = InMemoryTransport::default();
        assert_eq!(transport.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(transport.subscriber_count(), 0);
        assert_eq!(transport.messages_published(), 0);
    }
}
