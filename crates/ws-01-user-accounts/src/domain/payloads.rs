//! Event data shapes that differ from the full aggregate.

use serde::Serialize;
use shared_types::{Device, Documentation, Tier};

use super::requests::TransactionMetadata;

#[derive(Debug, Clone, Serialize)]
pub struct UserCreatedData {
    pub user_reference: String,
    pub phone: String,
    pub device: Device,
}

/// Tells the notifier which contact to reach and over which channel.
#[derive(Debug, Clone, Serialize)]
pub struct ContactNotice {
    pub user_reference: String,
    pub contact: String,
    pub channel: String,
    pub device: Device,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityRequestData {
    #[serde(rename = "userReference")]
    pub user_reference: String,
    pub phone: String,
    pub device: Device,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierUpgradeRequestData {
    pub request_reference: String,
    pub user_reference: String,
    pub current_tier: Tier,
    pub requested_tier: Tier,
    pub kyc_documents: Vec<Documentation>,
    pub tier_documents: Vec<Documentation>,
    pub request_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferSender {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_reference: String,
    pub reference: String,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceiver {
    #[serde(rename = "type")]
    pub kind: String,
    pub user_reference: String,
    pub reference: String,
    #[serde(rename = "wallsbadge_reference")]
    pub walls_badge_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequestData {
    pub request_reference: String,
    pub transaction_type: String,
    pub amount: f64,
    pub sender: TransferSender,
    pub receiver: TransferReceiver,
    pub metadata: TransactionMetadata,
}
