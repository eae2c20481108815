//! Request bodies accepted by the account operations.
//!
//! Field-level format rules (lengths, enumerations) are enforced by the
//! request boundary before these reach the service.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Device, Documentation, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CreateUser {
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserName {
    pub first_name: String,
    pub last_name: String,
}

impl UserName {
    /// Display form stored on the profile.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompanyProfileRequest {
    pub company_name: String,
    pub registration_no: String,
    pub registration_date: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

/// Only contact details of a company profile are editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompanyContactUpdate {
    pub phone: String,
    pub email: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserBadgeRequest {
    pub walls_tag: String,
    pub wallet_reference: String,
    pub user_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompanyBadgeRequest {
    pub walls_tag: String,
    pub wallet_reference: String,
    pub user_reference: String,
    pub company_profile_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BalanceUpdate {
    pub book_amount: f64,
    pub available_amount: f64,
}

/// Auto-fund and auto-withdrawal settings of a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WalletSettings {
    pub auto_fund: bool,
    pub auto_fund_level: f64,
    pub auto_fund_limit: f64,
    pub auto_withdrawal: bool,
    pub auto_withdrawal_level: f64,
    pub auto_withdrawal_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BankDetails {
    pub integration_type: String,
    pub integration_reference: String,
    pub bank_name: String,
    pub account_number: i64,
    pub account_name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardDetails {
    pub integration_type: String,
    pub integration_reference: String,
    pub card_name: String,
    pub pan: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentationDetails {
    pub documentation_type: String,
    pub documentation_number: String,
    pub expiry: String,
    pub document_reference: String,
    pub tier_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationPreferences {
    pub push_notification_enabled: bool,
    pub notification_type: String,
    /// Channel OTPs are delivered on (`sms`, `email`).
    pub otp_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactRequest {
    pub phone: String,
    pub full_name: String,
    pub walls_tag: String,
    pub is_beneficiary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentityRequest {
    pub phone: String,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TierUpgradeRequest {
    pub requested_tier: Tier,
    #[serde(rename = "tier_document")]
    pub tier_documents: Vec<Documentation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionMetadata {
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_tx: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionRequest {
    /// `wallet_wallet`, `bank_wallet`, `card_wallet` or `wallet_bank`.
    pub transaction_type: String,
    pub amount: f64,
    pub sender_reference: String,
    pub out_reference: String,
    pub receiver_reference: String,
    pub in_reference: String,
    /// Falls back to the receiver's default badge when absent.
    #[serde(default)]
    pub receiver_walls_badge_reference: Option<String>,
    pub metadata: TransactionMetadata,
}
