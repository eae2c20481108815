//! # Caller Claim
//!
//! What the request boundary asserts about the caller. The claim is compared
//! against the stored aggregate before any mutation; it is not a session token.

use serde::{Deserialize, Serialize};

use crate::entities::Device;

/// The caller as asserted by the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CurrentUser {
    pub user_reference: String,
    pub phone: String,
    pub device: Device,
}

impl CurrentUser {
    pub fn new(user_reference: impl Into<String>, phone: impl Into<String>, device: Device) -> Self {
        Self {
            user_reference: user_reference.into(),
            phone: phone.into(),
            device,
        }
    }
}
