//! # Shared Types Crate
//!
//! Domain entities and wire types shared across the Walls user service.
//!
//! ## Design Principles
//!
//! - **Single Aggregate**: A user is one [`User`] document. Every nested
//!   sub-entity carries its own reference and is never re-used.
//! - **One Decode Path**: Storage adapters and transport payloads decode into
//!   the same structs; there is no thin/hydrated split.
//! - **Envelope Integrity**: Every event leaving the service is wrapped in an
//!   [`EventEnvelope`].

pub mod claims;
pub mod entities;
pub mod envelope;
pub mod errors;

pub use claims::CurrentUser;
pub use entities::*;
pub use envelope::EventEnvelope;
pub use errors::StoreError;

/// Generate a fresh sub-entity reference.
#[must_use]
pub fn new_reference() -> String {
    uuid::Uuid::new_v4().to_string()
}
