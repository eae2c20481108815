//! # OTP Event Payloads
//!
//! Outbound request data and the typed decode of inbound OTP-validated data.
//!
//! Inbound data is decoded once into an [`OtpValidatedCommand`]; handlers
//! never index into untyped maps. A subject must name its user, carry a
//! complete device, and for account creation a phone contact.

use serde::{Deserialize, Serialize};
use shared_types::{Device, EventEnvelope};

use crate::domain::{ContactShape, HandshakeError};

/// Data of an `OtpRequestCreatedEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpRequestData {
    #[serde(rename = "userReference")]
    pub user_reference: String,
    pub contact: String,
    pub channel: String,
    pub device: Device,
}

/// Data of a `ValidateOtpRequestEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateOtpRequestData {
    #[serde(rename = "userReference")]
    pub user_reference: String,
    pub contact: String,
    pub otp: String,
    pub device: Device,
}

/// The subject of a validated OTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OtpValidation {
    pub user_reference: String,
    pub contact: String,
    pub device: Device,
}

impl OtpValidation {
    fn check(self, shape: Option<ContactShape>) -> Result<Self, HandshakeError> {
        if self.user_reference.trim().is_empty() {
            return Err(HandshakeError::Validation("user_reference is empty".into()));
        }

        let device = &self.device;
        let fields = [
            ("device_reference", &device.device_reference),
            ("imei", &device.imei),
            ("type", &device.device_type),
            ("brand", &device.brand),
            ("model", &device.model),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(HandshakeError::Validation(format!("device {name} is empty")));
        }

        if let Some(shape) = shape {
            if !shape.matches(&self.contact) {
                return Err(HandshakeError::Validation(format!(
                    "contact is not a valid {shape}"
                )));
            }
        }
        Ok(self)
    }
}

/// Routing fields that may sit beside the subject in inbound data.
#[derive(Debug, Default, Deserialize)]
struct Discriminator {
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    otp_type: Option<String>,
}

/// A validated OTP, keyed by what it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpValidatedCommand {
    CreateUser(OtpValidation),
    VerifyEmail(OtpValidation),
    VerifyPhone(OtpValidation),
}

impl OtpValidatedCommand {
    /// Decode the command carried by an OTP-validated envelope.
    ///
    /// The discriminator is the data's `event_type`, then its `otp_type`,
    /// then the envelope's own `event_type`.
    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, HandshakeError> {
        let routing: Discriminator = envelope
            .decode_data()
            .map_err(|e| HandshakeError::Decode(e.to_string()))?;
        let discriminator = routing
            .event_type
            .filter(|value| !value.is_empty())
            .or_else(|| routing.otp_type.filter(|value| !value.is_empty()))
            .unwrap_or_else(|| envelope.event_type.clone());

        let subject = |shape: Option<ContactShape>| -> Result<OtpValidation, HandshakeError> {
            envelope
                .decode_data::<OtpValidation>()
                .map_err(|e| HandshakeError::Decode(e.to_string()))?
                .check(shape)
        };

        match discriminator.as_str() {
            "create_user" => Ok(Self::CreateUser(subject(Some(ContactShape::Phone))?)),
            "verify_email" => Ok(Self::VerifyEmail(subject(None)?)),
            "verify_phone" => Ok(Self::VerifyPhone(subject(None)?)),
            _ => Err(HandshakeError::UnknownDiscriminator(discriminator)),
        }
    }

    #[must_use]
    pub fn subject(&self) -> &OtpValidation {
        match self {
            Self::CreateUser(subject) | Self::VerifyEmail(subject) | Self::VerifyPhone(subject) => {
                subject
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateUser(_) => "create_user",
            Self::VerifyEmail(_) => "verify_email",
            Self::VerifyPhone(_) => "verify_phone",
        }
    }
}
