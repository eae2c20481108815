//! OTP purposes, contact shapes and handshake errors.

pub mod contact;
pub mod errors;
pub mod otp;

pub use contact::{is_email, is_phone, ContactShape};
pub use errors::HandshakeError;
pub use otp::{OtpRequest, OtpType, OtpValidationRequest};
