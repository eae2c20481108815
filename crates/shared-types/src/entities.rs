//! # User Aggregate
//!
//! The full user document as it is stored and as it travels inside events.
//!
//! ## Clusters
//!
//! - **Identity**: `User`, `UserProfile`, `CompanyProfile`, `Device`
//! - **Handles**: `WallsBadge`
//! - **Money**: `Wallet`, `Tier`, `Balance`, `Coupon`, `Reward`
//! - **Instruments**: `Bank`, `Card`
//! - **Compliance**: `Kyc`, `Documentation`
//!
//! Every struct tolerates missing fields on decode (`#[serde(default)]`) so
//! partially populated documents from the store round-trip without loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// The user aggregate. `user_reference` is the stable identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    pub user_reference: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub user_profile: UserProfile,
    pub company_profile: Vec<CompanyProfile>,
    pub contacts: Vec<Contact>,
    pub security: Security,
    pub wallet: Wallet,
    pub bank_accounts: Vec<Bank>,
    pub cards: Vec<Card>,
    pub notification_options: NotificationOptions,
    pub device: Device,
    pub kyc: Kyc,
}

impl User {
    /// Find a company profile by its reference.
    #[must_use]
    pub fn company(&self, company_profile_reference: &str) -> Option<&CompanyProfile> {
        self.company_profile
            .iter()
            .find(|c| c.company_profile_reference == company_profile_reference)
    }

    /// Find a company profile by its reference, mutably.
    pub fn company_mut(&mut self, company_profile_reference: &str) -> Option<&mut CompanyProfile> {
        self.company_profile
            .iter_mut()
            .find(|c| c.company_profile_reference == company_profile_reference)
    }

    /// The default badge on the user's own profile, if one is set.
    #[must_use]
    pub fn default_badge(&self) -> Option<&WallsBadge> {
        self.user_profile.walls_badge.iter().find(|b| b.is_default)
    }

    /// Iterate every badge on the aggregate, profile and company scopes alike.
    pub fn all_badges(&self) -> impl Iterator<Item = &WallsBadge> {
        self.user_profile
            .walls_badge
            .iter()
            .chain(self.company_profile.iter().flat_map(|c| c.walls_badge.iter()))
    }
}

/// Personal profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserProfile {
    pub user_profile_reference: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub photos: Vec<Photo>,
    pub is_verified_email: bool,
    pub is_verified_phone: bool,
    pub walls_badge: Vec<WallsBadge>,
}

/// A business profile owned by a user. Holds its own badge scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompanyProfile {
    pub company_profile_reference: String,
    pub company_name: String,
    pub registration_no: String,
    pub registration_date: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub logo: Photo,
    pub is_verified_email: bool,
    pub is_active: bool,
    pub walls_badge: Vec<WallsBadge>,
}

/// The single device bound to a user.
///
/// Equality over all five fields is the authorization signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Device {
    pub device_reference: String,
    pub imei: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub brand: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Address {
    pub address_reference: String,
    pub country: Country,
    pub state: State,
    pub city: String,
    pub address_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Country {
    pub country_reference: String,
    pub country_name: String,
    pub country_code: String,
    pub dial_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct State {
    pub state_reference: String,
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Photo {
    pub photo_reference: String,
    pub is_default: bool,
    pub is_verified: bool,
    pub document_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Contact {
    pub contact_reference: String,
    pub phone: String,
    pub full_name: String,
    pub walls_tag: String,
    pub is_beneficiary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Security {
    pub two_factor_auth_enabled: bool,
    pub two_factor_auth_method: String,
    pub failed_login_attempts: u32,
    pub last_failed_login_on: String,
    pub password_last_updated_on: String,
    pub transaction_pin_enabled: bool,
    pub fingerprint_enabled: bool,
    pub face_id_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotificationOptions {
    pub push_notification_enabled: bool,
    pub notification_type: String,
    pub otp_channel: String,
}

// =============================================================================
// CLUSTER B: HANDLES
// =============================================================================

/// A public handle (`walls_tag`) bound to a wallet.
///
/// Lives in exactly one scope: the user profile or one company profile.
/// Badges are soft-disabled through `is_active`, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WallsBadge {
    pub walls_badge_reference: String,
    pub wallet_reference: String,
    pub user_reference: String,
    pub walls_tag: String,
    pub is_default: bool,
    #[serde(rename = "is_enabled")]
    pub is_active: bool,
    pub active_for: DateTime<Utc>,
}

// =============================================================================
// CLUSTER C: MONEY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Wallet {
    pub wallet_reference: String,
    pub wallet_account_no: i64,
    pub auto_fund: bool,
    pub auto_fund_level: f64,
    pub auto_fund_limit: f64,
    pub auto_withdrawal: bool,
    pub auto_withdrawal_level: f64,
    pub auto_withdrawal_limit: f64,
    pub tier: Tier,
    pub coupons: Vec<Coupon>,
    pub reward: Reward,
    pub balance: Balance,
}

/// Limit profile for a wallet. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tier {
    #[serde(rename = "reference")]
    pub tier_reference: String,
    #[serde(rename = "name")]
    pub tier_name: String,
    pub sending_limit: f64,
    pub receiving_limit: f64,
    pub wallet_limit: f64,
    pub minimum_balance: f64,
    #[serde(rename = "transaction_limit")]
    pub daily_transaction_limit: f64,
    pub upgrade_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Balance {
    pub available_amount: f64,
    pub currency: String,
    pub pending_incoming_amount: f64,
    pub is_synced: bool,
    pub last_synced_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Coupon {
    pub coupon_reference: String,
    pub coupon_id: String,
    pub discount_percentage: f64,
    pub expiry_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Reward {
    pub points: i64,
}

// =============================================================================
// CLUSTER D: PAYMENT INSTRUMENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Bank {
    pub bank_reference: String,
    pub integration_type: String,
    pub integration_reference: String,
    pub bank_name: String,
    pub account_number: i64,
    pub account_name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Card {
    pub card_reference: String,
    pub integration_type: String,
    pub integration_reference: String,
    pub card_name: String,
    pub pan: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub is_default: bool,
}

// =============================================================================
// CLUSTER E: COMPLIANCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Kyc {
    pub documentations: Vec<Documentation>,
    pub profile_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Documentation {
    pub documentation_reference: String,
    pub documentation_type: String,
    pub documentation_number: String,
    pub expiry: String,
    pub document_reference: String,
    pub tier_reference: String,
    pub is_verified: bool,
    pub verified_on: String,
    pub verification_method: String,
}
