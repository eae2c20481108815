//! # IPC Module
//!
//! Bus-facing side of the handshake.
//!
//! ## Modules
//!
//! - `handler`: [`OtpValidatedHandler`], the dispatcher target for `OTPVALIDATEDEVENT*`
//! - `payloads`: outbound request data and the typed inbound command

pub mod handler;
pub mod payloads;

pub use handler::OtpValidatedHandler;
pub use payloads::{
    OtpRequestData, OtpValidatedCommand, OtpValidation, ValidateOtpRequestData,
};
