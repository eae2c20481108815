//! # Event Kinds
//!
//! Every outbound event the service emits, keyed by its wrapper type name.
//! The wrapper name drives channel naming; the event name is what lands in
//! the envelope's `event_name` field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The outer wrapper of an outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // User lifecycle
    UserCreated,
    UserEnabled,
    UserDisabled,

    // Badges
    UserWallsBadgeCreated,
    UserWallsBadgeDisabled,
    CompanyWallsBadgeCreated,
    CompanyWallsBadgeDisabled,

    // Company profiles
    CompanyProfileCreated,
    CompanyProfileUpdated,
    CompanyProfileDisabled,
    CompanyLogoUpdated,
    CompanyProfileEmailStatusUpdated,

    // User profile
    UsernameUpdated,
    EmailUpdated,
    DobUpdated,
    AddressUpdated,
    PhotosUpdated,
    UserProfileEmailStatusUpdated,
    UserProfilePhoneStatusUpdated,
    DeviceUpdated,
    NotificationOptionsUpdated,
    ContactAdded,

    // Wallet
    WalletUpdated,
    BalanceUpdated,
    TierUpdated,
    CouponAdded,
    RewardsUpdated,

    // Payment instruments
    BankAdded,
    BankUpdated,
    DefaultBankSet,
    CardAdded,
    CardUpdated,
    DefaultCardSet,

    // KYC
    DocumentationAdded,
    DocumentationUpdated,

    // Requests handed to other services
    OtpRequestCreated,
    ValidateOtpRequest,
    CreateIdentityRequest,
    TierUpgradeRequest,
    TransactionCreateRequest,
}

impl EventKind {
    /// The wrapper type name, from which the channel is derived.
    #[must_use]
    pub fn wrapper_name(self) -> &'static str {
        match self {
            Self::UserCreated => "UserCreatedEvent",
            Self::UserEnabled => "UserEnabledEvent",
            Self::UserDisabled => "UserDisabledEvent",
            Self::UserWallsBadgeCreated => "UserWallsBadgeCreatedEvent",
            Self::UserWallsBadgeDisabled => "UserWallsBadgeDisabledEvent",
            Self::CompanyWallsBadgeCreated => "CompanyWallsBadgeCreatedEvent",
            Self::CompanyWallsBadgeDisabled => "CompanyWallsBadgeDisabledEvent",
            Self::CompanyProfileCreated => "CompanyProfileCreatedEvent",
            Self::CompanyProfileUpdated => "CompanyProfileUpdatedEvent",
            Self::CompanyProfileDisabled => "CompanyProfileDisabledEvent",
            Self::CompanyLogoUpdated => "CompanyLogoUpdatedEvent",
            Self::CompanyProfileEmailStatusUpdated => "CompanyProfileEmailStatusUpdatedEvent",
            Self::UsernameUpdated => "UsernameUpdatedEvent",
            Self::EmailUpdated => "EmailUpdatedEvent",
            Self::DobUpdated => "DobUpdatedEvent",
            Self::AddressUpdated => "AddressUpdatedEvent",
            Self::PhotosUpdated => "PhotosUpdatedEvent",
            Self::UserProfileEmailStatusUpdated => "UserProfileEmailStatusUpdatedEvent",
            Self::UserProfilePhoneStatusUpdated => "UserProfilePhoneStatusUpdatedEvent",
            Self::DeviceUpdated => "DeviceUpdatedEvent",
            Self::NotificationOptionsUpdated => "NotificationOptionsUpdatedEvent",
            Self::ContactAdded => "ContactAddedEvent",
            Self::WalletUpdated => "WalletUpdatedEvent",
            Self::BalanceUpdated => "BalanceUpdatedEvent",
            Self::TierUpdated => "TierUpdatedEvent",
            Self::CouponAdded => "CouponAddedEvent",
            Self::RewardsUpdated => "RewardsUpdatedEvent",
            Self::BankAdded => "BankAddedEvent",
            Self::BankUpdated => "BankUpdatedEvent",
            Self::DefaultBankSet => "DefaultBankSetEvent",
            Self::CardAdded => "CardAddedEvent",
            Self::CardUpdated => "CardUpdatedEvent",
            Self::DefaultCardSet => "DefaultCardSetEvent",
            Self::DocumentationAdded => "DocumentationAddedEvent",
            Self::DocumentationUpdated => "DocumentationUpdatedEvent",
            Self::OtpRequestCreated => "OtpRequestCreatedEvent",
            Self::ValidateOtpRequest => "ValidateOtpRequestEvent",
            Self::CreateIdentityRequest => "CreateIdentityRequestEvent",
            Self::TierUpgradeRequest => "TierUpgradeRequestEvent",
            Self::TransactionCreateRequest => "TransactionCreateRequest",
        }
    }

    /// The `event_name` written into the envelope.
    ///
    /// Mostly the lower-cased wrapper name; request events keep the verb-first
    /// names downstream consumers already key on.
    #[must_use]
    pub fn event_name(self) -> String {
        match self {
            Self::PhotosUpdated => "photoupdatedevent".to_string(),
            Self::OtpRequestCreated => "createotprequestevent".to_string(),
            Self::ValidateOtpRequest => "validateotprequestevent".to_string(),
            Self::TierUpgradeRequest => "upgradetierrequestevent".to_string(),
            Self::TransactionCreateRequest => "createtransactionrequestevent".to_string(),
            other => other.wrapper_name().to_lowercase(),
        }
    }

    /// The channel this event is published on.
    #[must_use]
    pub fn channel(self, sub_type: Option<&str>) -> String {
        crate::channels::channel_name(self.wrapper_name(), sub_type)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wrapper_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_defaults_to_lowercase_wrapper() {
        assert_eq!(EventKind::UserCreated.event_name(), "usercreatedevent");
        assert_eq!(EventKind::DefaultBankSet.event_name(), "defaultbanksetevent");
    }

    #[test]
    fn test_request_event_names() {
        assert_eq!(
            EventKind::TransactionCreateRequest.event_name(),
            "createtransactionrequestevent"
        );
        assert_eq!(
            EventKind::OtpRequestCreated.event_name(),
            "createotprequestevent"
        );
    }

    #[test]
    fn test_channel_with_and_without_sub_type() {
        assert_eq!(EventKind::UserCreated.channel(None), "USERCREATEDEVENT");
        assert_eq!(
            EventKind::OtpRequestCreated.channel(Some("verify_email")),
            "OTPREQUESTCREATEDEVENT:VERIFY_EMAIL"
        );
    }
}
