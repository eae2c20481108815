//! OTP purposes and the request bodies that carry them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::Device;

use super::contact::ContactShape;
use super::errors::HandshakeError;

/// Why an OTP is being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpType {
    CreateUser,
    CreateCompany,
    VerifyEmail,
    VerifyPhone,
}

impl OtpType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::CreateCompany => "create_company",
            Self::VerifyEmail => "verify_email",
            Self::VerifyPhone => "verify_phone",
        }
    }

    /// Account creation is open to anyone; every other purpose needs a bound caller.
    #[must_use]
    pub fn requires_bound_caller(self) -> bool {
        !matches!(self, Self::CreateUser)
    }

    /// The shape the contact must have, if the purpose constrains it.
    #[must_use]
    pub fn contact_shape(self) -> Option<ContactShape> {
        match self {
            Self::CreateUser | Self::VerifyPhone => Some(ContactShape::Phone),
            Self::VerifyEmail => Some(ContactShape::Email),
            Self::CreateCompany => None,
        }
    }

    /// Reject a contact that does not fit this purpose.
    pub fn check_contact(self, contact: &str) -> Result<(), HandshakeError> {
        match self.contact_shape() {
            Some(shape) if !shape.matches(contact) => Err(HandshakeError::Validation(format!(
                "{} requires a {shape} as contact",
                self.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

impl FromStr for OtpType {
    type Err = HandshakeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create_user" => Ok(Self::CreateUser),
            "create_company" => Ok(Self::CreateCompany),
            "verify_email" => Ok(Self::VerifyEmail),
            "verify_phone" => Ok(Self::VerifyPhone),
            other => Err(HandshakeError::Validation(format!("unknown otp type {other:?}"))),
        }
    }
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a request to issue an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OtpRequest {
    pub otp_type: String,
    pub contact: String,
    /// Delivery channel: `sms`, `email` or `in_app`.
    pub channel: String,
    pub device: Device,
}

/// Body of a request to check an OTP the user received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OtpValidationRequest {
    pub otp: String,
    pub otp_type: String,
    pub contact: String,
    pub device: Device,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        for raw in ["create_user", "create_company", "verify_email", "verify_phone"] {
            let parsed: OtpType = raw.parse().unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
        assert!("reset_pin".parse::<OtpType>().is_err());
    }

    #[test]
    fn test_only_account_creation_skips_binding() {
        assert!(!OtpType::CreateUser.requires_bound_caller());
        assert!(OtpType::VerifyEmail.requires_bound_caller());
        assert!(OtpType::CreateCompany.requires_bound_caller());
    }

    #[test]
    fn test_contact_rules_per_purpose() {
        assert!(OtpType::VerifyEmail.check_contact("+2348000000000").is_err());
        assert!(OtpType::VerifyEmail.check_contact("ada@walls.africa").is_ok());
        assert!(OtpType::CreateUser.check_contact("ada@walls.africa").is_err());
        assert!(OtpType::VerifyPhone.check_contact("+2348000000000").is_ok());
        assert!(OtpType::CreateCompany.check_contact("anything").is_ok());
    }
}
