//! # Shared Bus - Channel-Addressed Event Bus
//!
//! Hands work to external services and receives their results.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   publish(kind, sub_type)   ┌──────────────┐
//! │   Service    │ ──────────────────────────→ │  Transport   │
//! │   (ws-01)    │   UPPER(wrapper)[:SUB]      │ (pub/sub)    │
//! └──────────────┘                             └──────────────┘
//!                                                     │ pattern subscription
//!                                                     ▼
//!                                              ┌──────────────┐
//!                                              │  Dispatcher  │──→ MessageHandler
//!                                              │  + Registry  │
//!                                              └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Fire-and-forget**: no acknowledgement, no retry, no buffering beyond
//!   the transport's own.
//! - **Fail-closed inbound**: messages delivered under an unregistered pattern
//!   never reach a handler.
//! - **Per-message isolation**: a bad message is logged and skipped; the
//!   dispatcher loop keeps running.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod channels;
pub mod error;
pub mod events;
pub mod publisher;
pub mod subscriber;
pub mod transport;

// Re-export main types
pub use channels::{channel_name, ChannelRegistry, OTP_VALIDATED};
pub use error::BusError;
pub use events::EventKind;
pub use publisher::EventPublisher;
pub use subscriber::{DispatchStats, Dispatcher, MessageHandler};
pub use transport::{InMemoryTransport, InboundMessage, MessageStream, Transport, TransportError};

/// Maximum messages buffered per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
