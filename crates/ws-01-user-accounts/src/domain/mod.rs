//! Domain layer: pure rules with no I/O.

pub mod admission;
pub mod collections;
pub mod errors;
pub mod guard;
pub mod payloads;
pub mod requests;
pub mod rules;

pub use admission::admit;
pub use errors::{AccountError, AdmissionError, AuthorizationFailure};
pub use guard::{authorize, ensure_owner, is_registered_device, is_registered_phone};
pub use requests::*;
