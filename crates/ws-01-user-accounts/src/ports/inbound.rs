//! # Inbound Port - UserAccountsApi
//!
//! Primary driving port for the user aggregate. Called by the request
//! boundary and by the OTP handshake dispatcher.
//!
//! ## Authorization
//!
//! | Operations | Guard |
//! |------------|-------|
//! | queries, reference generation | none |
//! | `enable_user`, `disable_user`, `add_coupon`, `update_rewards` | none (administrative) |
//! | `mark_email_verified`, `mark_phone_verified`, `disable_company_profile`, `mark_company_email_verified` | none (event-driven) |
//! | everything else | device + phone binding |
//!
//! Guarded operations fail with `AccountError::Authorization` before any
//! write when the claim does not bind.

use async_trait::async_trait;
use shared_types::{Address, Coupon, CurrentUser, Device, Photo, Tier, User, WallsBadge};

use crate::domain::{
    AccountError, BalanceUpdate, BankDetails, CardDetails, CompanyBadgeRequest,
    CompanyContactUpdate, CompanyProfileRequest, ContactRequest, CreateUser,
    DocumentationDetails, IdentityRequest, NotificationPreferences, TierUpgradeRequest,
    TransactionRequest, UserBadgeRequest, UserName, WalletSettings,
};

type Result<T> = std::result::Result<T, AccountError>;

/// Primary API for user accounts.
///
/// Mutating operations return the user reference unless they create a
/// sub-entity, in which case they return the new sub-entity's reference.
#[async_trait]
pub trait UserAccountsApi: Send + Sync {
    // =========================================================================
    // IDENTITY & LIFECYCLE
    // =========================================================================

    /// Create the aggregate for the claimed caller.
    ///
    /// # Errors
    /// - `Conflict`: a user already exists under the claimed reference
    /// - `Validation`: `request.phone` differs from the claimed phone
    async fn create_user(&self, request: CreateUser, claim: &CurrentUser) -> Result<String>;

    async fn enable_user(&self, user_reference: &str) -> Result<String>;

    async fn disable_user(&self, user_reference: &str) -> Result<String>;

    fn create_user_reference(&self) -> String;

    fn create_document_reference(&self) -> String;

    /// Fetch the caller's own aggregate and check the claim binds to it.
    async fn verify_caller(&self, claim: &CurrentUser) -> Result<User>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    async fn get_user_by_reference(&self, user_reference: &str) -> Result<User>;

    async fn get_user_by_phone(&self, phone: &str) -> Result<User>;

    async fn get_user_by_walls_tag(&self, walls_tag: &str) -> Result<User>;

    async fn get_user_by_walls_badge_reference(&self, walls_badge_reference: &str)
        -> Result<User>;

    async fn get_user_by_device(&self, device: &Device) -> Result<User>;

    async fn get_user_default_badge(&self, user_reference: &str) -> Result<WallsBadge>;

    async fn list_user_badges(&self, user_reference: &str) -> Result<Vec<WallsBadge>>;

    async fn list_company_badges(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<Vec<WallsBadge>>;

    async fn get_default_company_badge(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<WallsBadge>;

    // =========================================================================
    // USER PROFILE
    // =========================================================================

    async fn update_user_name(
        &self,
        user_reference: &str,
        request: UserName,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// Replaces the email and clears its verified flag.
    async fn update_email(
        &self,
        user_reference: &str,
        email: String,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_date_of_birth(
        &self,
        user_reference: &str,
        date_of_birth: String,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_address(
        &self,
        user_reference: &str,
        address: Address,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// Upsert by `photo_reference`.
    async fn update_photo(
        &self,
        user_reference: &str,
        photo: Photo,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn mark_email_verified(&self, user_reference: &str) -> Result<String>;

    async fn mark_phone_verified(&self, user_reference: &str) -> Result<String>;

    // =========================================================================
    // COMPANY PROFILES
    // =========================================================================

    async fn create_company_profile(
        &self,
        user_reference: &str,
        request: CompanyProfileRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_company_profile(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        request: CompanyContactUpdate,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_company_logo(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        logo: Photo,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn disable_company_profile(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<String>;

    async fn mark_company_email_verified(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<String>;

    // =========================================================================
    // BADGES
    // =========================================================================

    /// # Errors
    /// - `Conflict`: the tag is already used by any badge
    /// - `Authorization`: the caller is not the target user
    async fn create_user_badge(
        &self,
        user_reference: &str,
        request: UserBadgeRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn create_company_badge(
        &self,
        user_reference: &str,
        request: CompanyBadgeRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn disable_user_badge(
        &self,
        user_reference: &str,
        walls_badge_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn disable_company_badge(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        walls_badge_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String>;

    // =========================================================================
    // WALLET
    // =========================================================================

    async fn update_balance(
        &self,
        user_reference: &str,
        request: BalanceUpdate,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_wallet(
        &self,
        user_reference: &str,
        settings: WalletSettings,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// Replace the tier wholesale.
    async fn update_tier(
        &self,
        user_reference: &str,
        tier: Tier,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn add_coupon(&self, user_reference: &str, coupon: Coupon) -> Result<String>;

    /// Add `points` to the reward balance.
    async fn update_rewards(&self, user_reference: &str, points: i64) -> Result<String>;

    // =========================================================================
    // PAYMENT INSTRUMENTS
    // =========================================================================

    async fn add_bank(
        &self,
        user_reference: &str,
        request: BankDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_bank(
        &self,
        user_reference: &str,
        bank_reference: &str,
        request: BankDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn set_default_bank(
        &self,
        user_reference: &str,
        bank_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// # Errors
    /// - `Validation`: the card is expired or the month is out of range
    async fn add_card(
        &self,
        user_reference: &str,
        request: CardDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_card(
        &self,
        user_reference: &str,
        card_reference: &str,
        request: CardDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn set_default_card(
        &self,
        user_reference: &str,
        card_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String>;

    // =========================================================================
    // KYC, DEVICE, NOTIFICATIONS, CONTACTS
    // =========================================================================

    async fn add_documentation(
        &self,
        user_reference: &str,
        request: DocumentationDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_documentation(
        &self,
        user_reference: &str,
        documentation_reference: &str,
        request: DocumentationDetails,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// Rebind the aggregate to a new device.
    ///
    /// # Errors
    /// - `Conflict`: the new device is already bound to a user
    async fn update_device(
        &self,
        user_reference: &str,
        new_device: Device,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn update_notification_options(
        &self,
        user_reference: &str,
        request: NotificationPreferences,
        claim: &CurrentUser,
    ) -> Result<String>;

    async fn add_contact(
        &self,
        user_reference: &str,
        request: ContactRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    // =========================================================================
    // REQUESTS TO OTHER SERVICES
    // =========================================================================

    async fn create_identity_request(
        &self,
        user_reference: &str,
        request: IdentityRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// # Errors
    /// - `Validation`: no tier documents supplied
    async fn upgrade_tier_request(
        &self,
        user_reference: &str,
        request: TierUpgradeRequest,
        claim: &CurrentUser,
    ) -> Result<String>;

    /// Gate a transfer through admission control and forward it.
    ///
    /// # Errors
    /// - `Authorization`: the sender is not the bound caller
    /// - `Admission`: a balance or limit check failed
    /// - `NotFound`: sender, receiver, or receiver default badge missing
    async fn create_transaction_request(
        &self,
        user_reference: &str,
        request: TransactionRequest,
        claim: &CurrentUser,
    ) -> Result<String>;
}
