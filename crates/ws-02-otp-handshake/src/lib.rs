//! # OTP Handshake (ws-02)
//!
//! This service owns only the edges into and out of the external OTP
//! verifier. It holds no state of its own.
//!
//! ```text
//!            ┌──────────── REQUESTED ────────────┐
//! request_otp / validate_otp              external verifier
//!                                                 │
//!            ┌──────────── VALIDATED ◄────────────┘
//! OtpValidatedHandler ──→ UserAccountsApi ──→ APPLIED
//! ```
//!
//! ## Rules
//!
//! | OTP type | Bound caller | Contact |
//! |----------|--------------|---------|
//! | `create_user` | no | phone |
//! | `create_company` | yes | any |
//! | `verify_email` | yes | email |
//! | `verify_phone` | yes | phone |
//!
//! ## Crate Structure
//!
//! - `domain/` - OTP types, contact shapes, errors
//! - `service.rs` - Outbound request and validation forwarding
//! - `ipc/` - Inbound OTP-validated handler and event payloads

pub mod domain;
pub mod ipc;
pub mod service;

pub use domain::{HandshakeError, OtpRequest, OtpType, OtpValidationRequest};
pub use ipc::{OtpValidatedCommand, OtpValidatedHandler};
pub use service::OtpHandshakeService;
