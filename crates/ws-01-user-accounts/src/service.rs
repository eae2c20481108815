//! # User Account Service
//!
//! Every write follows the same pipeline:
//!
//! ```text
//! fetch(user_reference) → guard(claim, stored) → mutate → persist (full replace) → publish
//! ```
//!
//! A failure at fetch, guard, mutate or persist aborts the operation and
//! nothing after it runs. Publishing after a successful persist is
//! best-effort: a transport failure is logged and the operation still
//! succeeds. Operations that only hand a request to another service surface
//! transport failures, since the publish is the whole operation.
//!
//! There is no lock across the read-modify-write: two concurrent writes to the
//! same user race and the later persist wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use shared_bus::{EventKind, EventPublisher};
use shared_types::{
    new_reference, Address, Balance, Bank, Card, CompanyProfile, Contact, Coupon, CurrentUser, Device,
    Documentation, Photo, StoreError, Tier, User, UserProfile, Wallet, WallsBadge,
};
use tracing::{debug, error, info, warn};

use crate::domain::collections::{clear_other_defaults, find_mut, set_exclusive_default, upsert};
use crate::domain::payloads::{
    ContactNotice, IdentityRequestData, TierUpgradeRequestData, TransactionRequestData,
    TransferReceiver, TransferSender, UserCreatedData,
};
use crate::domain::rules::{new_badge, validate_card_expiry, DEFAULT_CURRENCY};
use crate::domain::{
    admit, authorize, ensure_owner, AccountError, BalanceUpdate, BankDetails, CardDetails,
    CompanyBadgeRequest, CompanyContactUpdate, CompanyProfileRequest, ContactRequest, CreateUser,
    DocumentationDetails, IdentityRequest, NotificationPreferences, TierUpgradeRequest,
    TransactionRequest, UserBadgeRequest, UserName, WalletSettings,
};
use crate::ports::{UserAccountsApi, UserRepository};

type Result<T> = std::result::Result<T, AccountError>;

/// Status attached to newly raised tier upgrade requests.
const TIER_REQUEST_PENDING: &str = "pending";

/// The user account service over a document store `R`.
pub struct UserAccountService<R: UserRepository> {
    repository: Arc<R>,
    publisher: EventPublisher,
}

impl<R: UserRepository> UserAccountService<R> {
    pub fn new(repository: Arc<R>, publisher: EventPublisher) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// The publisher this service emits through.
    #[must_use]
    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    // =========================================================================
    // PIPELINE STAGES
    // =========================================================================

    async fn fetch(&self, user_reference: &str) -> Result<User> {
        self.repository
            .get_user_by_reference(user_reference)
            .await
            .map_err(|e| {
                debug!(user_reference = %user_reference, error = %e, "User lookup failed");
                AccountError::from(e)
            })
    }

    async fn fetch_authorized(&self, user_reference: &str, claim: &CurrentUser) -> Result<User> {
        let user = self.fetch(user_reference).await?;
        authorize(claim, &user).map_err(|failure| {
            warn!(
                user_reference = %user_reference,
                caller = %claim.user_reference,
                reason = %failure,
                "Authorization rejected"
            );
            AccountError::from(failure)
        })?;
        Ok(user)
    }

    /// Stamp, persist the whole aggregate, then notify.
    async fn commit<D, F>(&self, user_reference: &str, mut user: User, kind: EventKind, data: F) -> Result<()>
    where
        D: Serialize + Send,
        F: FnOnce(&User) -> D + Send,
    {
        user.updated_on = Some(Utc::now());
        let data = data(&user);

        self.repository
            .update_user(user_reference, user)
            .await
            .map_err(|e| {
                error!(user_reference = %user_reference, error = %e, "Failed to persist user");
                AccountError::from(e)
            })?;

        self.notify(kind, user_reference, data).await;
        Ok(())
    }

    /// fetch → guard (when a claim is given) → mutate → persist → publish the aggregate.
    async fn apply<O, F>(
        &self,
        user_reference: &str,
        claim: Option<&CurrentUser>,
        kind: EventKind,
        mutation: F,
    ) -> Result<O>
    where
        O: Send,
        F: FnOnce(&mut User) -> Result<O> + Send,
    {
        let mut user = match claim {
            Some(claim) => self.fetch_authorized(user_reference, claim).await?,
            None => self.fetch(user_reference).await?,
        };
        let output = mutation(&mut user)?;
        self.commit(user_reference, user, kind, User::clone).await?;
        Ok(output)
    }

    /// Best-effort notification after a successful persist.
    async fn notify<D: Serialize + Send>(&self, kind: EventKind, user_reference: &str, data: D) {
        if let Err(e) = self.publisher.publish(kind, None, user_reference, data).await {
            warn!(
                event = %kind,
                user_reference = %user_reference,
                error = %e,
                "Event publish failed; mutation kept"
            );
        }
    }

    /// Publish a request event whose delivery is the point of the operation.
    async fn forward<D: Serialize + Send>(
        &self,
        kind: EventKind,
        user_reference: &str,
        data: D,
    ) -> Result<()> {
        self.publisher
            .publish(kind, None, user_reference, data)
            .await
            .map_err(|e| {
                error!(event = %kind, user_reference = %user_reference, error = %e, "Request publish failed");
                AccountError::from(e)
            })?;
        Ok(())
    }

    /// `Ok` when the lookup found nothing, `Conflict` when it found a user.
    fn ensure_absent<T>(lookup: std::result::Result<T, StoreError>, conflict: String) -> Result<()> {
        match lookup {
            Ok(_) => Err(AccountError::Conflict(conflict)),
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn contact_notice(user: &User, contact: &str, channel: &str) -> ContactNotice {
    ContactNotice {
        user_reference: user.user_reference.clone(),
        contact: contact.to_string(),
        channel: channel.to_string(),
        device: user.device.clone(),
    }
}

fn company_mut<'a>(user: &'a mut User, company_profile_reference: &str) -> Result<&'a mut CompanyProfile> {
    user.company_mut(company_profile_reference)
        .ok_or_else(|| AccountError::not_found("company profile", company_profile_reference))
}

#[async_trait]
impl<R: UserRepository + 'static> UserAccountsApi for UserAccountService<R> {
    // =========================================================================
    // IDENTITY & LIFECYCLE
    // =========================================================================

    async fn create_user(&self, request: CreateUser, claim: &CurrentUser) -> Result<String> {
        Self::ensure_absent(
            self.repository.get_user_by_reference(&claim.user_reference).await,
            format!("user {} already exists", claim.user_reference),
        )?;

        if request.phone != claim.phone {
            return Err(AccountError::Validation(
                "phone does not match the verified caller".to_string(),
            ));
        }

        let user = User {
            user_reference: claim.user_reference.clone(),
            created_on: Utc::now(),
            is_active: true,
            user_profile: UserProfile {
                user_profile_reference: new_reference(),
                phone: request.phone,
                ..Default::default()
            },
            wallet: Wallet {
                wallet_reference: new_reference(),
                balance: Balance {
                    currency: DEFAULT_CURRENCY.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            device: claim.device.clone(),
            ..Default::default()
        };

        let data = UserCreatedData {
            user_reference: user.user_reference.clone(),
            phone: user.user_profile.phone.clone(),
            device: user.device.clone(),
        };

        let user_reference = self.repository.create_user(user).await.map_err(|e| {
            error!(user_reference = %claim.user_reference, error = %e, "Failed to create user");
            AccountError::from(e)
        })?;
        info!(user_reference = %user_reference, "User created");

        self.notify(EventKind::UserCreated, &user_reference, data).await;
        Ok(user_reference)
    }

    async fn enable_user(&self, user_reference: &str) -> Result<String> {
        self.apply(user_reference, None, EventKind::UserEnabled, |user| {
            user.is_active = true;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn disable_user(&self, user_reference: &str) -> Result<String> {
        self.apply(user_reference, None, EventKind::UserDisabled, |user| {
            user.is_active = false;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    fn create_user_reference(&self) -> String {
        new_reference()
    }

    fn create_document_reference(&self) -> String {
        new_reference()
    }

    async fn verify_caller(&self, claim: &CurrentUser) -> Result<User> {
        self.fetch_authorized(&claim.user_reference, claim).await
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    async fn get_user_by_reference(&self, user_reference: &str) -> Result<User> {
        self.fetch(user_reference).await
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<User> {
        Ok(self.repository.get_user_by_phone(phone).await?)
    }

    async fn get_user_by_walls_tag(&self, walls_tag: &str) -> Result<User> {
        Ok(self.repository.get_user_by_walls_tag(walls_tag).await?)
    }

    async fn get_user_by_walls_badge_reference(&self, walls_badge_reference: &str) -> Result<User> {
        Ok(self
            .repository
            .get_user_by_walls_badge_reference(walls_badge_reference)
            .await?)
    }

    async fn get_user_by_device(&self, device: &Device) -> Result<User> {
        Ok(self.repository.get_user_by_device(device).await?)
    }

    async fn get_user_default_badge(&self, user_reference: &str) -> Result<WallsBadge> {
        Ok(self
            .repository
            .get_user_default_walls_badge(user_reference)
            .await?)
    }

    async fn list_user_badges(&self, user_reference: &str) -> Result<Vec<WallsBadge>> {
        let user = self.fetch(user_reference).await?;
        Ok(user.user_profile.walls_badge)
    }

    async fn list_company_badges(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<Vec<WallsBadge>> {
        let mut user = self.fetch(user_reference).await?;
        let company = company_mut(&mut user, company_profile_reference)?;
        Ok(std::mem::take(&mut company.walls_badge))
    }

    async fn get_default_company_badge(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<WallsBadge> {
        self.list_company_badges(user_reference, company_profile_reference)
            .await?
            .into_iter()
            .find(|badge| badge.is_default)
            .ok_or_else(|| {
                AccountError::not_found("default walls badge for company", company_profile_reference)
            })
    }

    // =========================================================================
    // USER PROFILE
    // =========================================================================

    async fn update_user_name(
        &self,
        user_reference: &str,
        request: UserName,
        claim: &CurrentUser,
    ) -> Result<String> {
        let mut user = self.fetch_authorized(user_reference, claim).await?;
        let profile = &mut user.user_profile;
        profile.full_name = request.full_name();
        profile.first_name = request.first_name;
        profile.last_name = request.last_name;

        self.commit(user_reference, user, EventKind::UsernameUpdated, |user| {
            contact_notice(user, &user.user_profile.phone, "sms")
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_email(
        &self,
        user_reference: &str,
        email: String,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::EmailUpdated, |user| {
            user.user_profile.email = email;
            user.user_profile.is_verified_email = false;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_date_of_birth(
        &self,
        user_reference: &str,
        date_of_birth: String,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::DobUpdated, |user| {
            user.user_profile.date_of_birth = date_of_birth;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_address(
        &self,
        user_reference: &str,
        address: Address,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::AddressUpdated, |user| {
            user.user_profile.address = address;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_photo(
        &self,
        user_reference: &str,
        photo: Photo,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::PhotosUpdated, |user| {
            upsert(&mut user.user_profile.photos, photo);
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn mark_email_verified(&self, user_reference: &str) -> Result<String> {
        let mut user = self.fetch(user_reference).await?;
        user.user_profile.is_verified_email = true;

        self.commit(
            user_reference,
            user,
            EventKind::UserProfileEmailStatusUpdated,
            |user| contact_notice(user, &user.user_profile.email, "email"),
        )
        .await?;
        info!(user_reference = %user_reference, "Email marked verified");
        Ok(user_reference.to_string())
    }

    async fn mark_phone_verified(&self, user_reference: &str) -> Result<String> {
        let mut user = self.fetch(user_reference).await?;
        user.user_profile.is_verified_phone = true;

        self.commit(
            user_reference,
            user,
            EventKind::UserProfilePhoneStatusUpdated,
            |user| contact_notice(user, &user.user_profile.phone, "sms"),
        )
        .await?;
        info!(user_reference = %user_reference, "Phone marked verified");
        Ok(user_reference.to_string())
    }

    // =========================================================================
    // COMPANY PROFILES
    // =========================================================================

    async fn create_company_profile(
        &self,
        user_reference: &str,
        request: CompanyProfileRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::CompanyProfileCreated,
            |user| {
                let company = CompanyProfile {
                    company_profile_reference: new_reference(),
                    company_name: request.company_name,
                    registration_no: request.registration_no,
                    registration_date: request.registration_date,
                    phone: request.phone,
                    email: request.email,
                    address: request.address,
                    is_verified_email: false,
                    is_active: true,
                    ..Default::default()
                };
                let reference = company.company_profile_reference.clone();
                user.company_profile.push(company);
                Ok(reference)
            },
        )
        .await
    }

    async fn update_company_profile(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        request: CompanyContactUpdate,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::CompanyProfileUpdated,
            |user| {
                let company = company_mut(user, company_profile_reference)?;
                company.phone = request.phone;
                company.email = request.email;
                company.address = request.address;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_company_logo(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        logo: Photo,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::CompanyLogoUpdated, |user| {
            company_mut(user, company_profile_reference)?.logo = logo;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn disable_company_profile(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<String> {
        self.apply(user_reference, None, EventKind::CompanyProfileDisabled, |user| {
            company_mut(user, company_profile_reference)?.is_active = false;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn mark_company_email_verified(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
    ) -> Result<String> {
        self.apply(
            user_reference,
            None,
            EventKind::CompanyProfileEmailStatusUpdated,
            |user| {
                company_mut(user, company_profile_reference)?.is_verified_email = true;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    // =========================================================================
    // BADGES
    // =========================================================================

    async fn create_user_badge(
        &self,
        user_reference: &str,
        request: UserBadgeRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        let mut user = self.fetch_authorized(user_reference, claim).await?;
        ensure_owner(claim, &user)?;
        Self::ensure_absent(
            self.repository.get_user_by_walls_tag(&request.walls_tag).await,
            format!("walls tag {} is taken", request.walls_tag),
        )?;

        let badge = new_badge(
            &user.user_profile.walls_badge,
            &user.user_reference,
            &request.wallet_reference,
            &request.walls_tag,
            Utc::now(),
        );
        let badge_reference = badge.walls_badge_reference.clone();
        user.user_profile.walls_badge.push(badge);

        self.commit(user_reference, user, EventKind::UserWallsBadgeCreated, User::clone)
            .await?;
        info!(user_reference = %user_reference, walls_tag = %request.walls_tag, "User badge created");
        Ok(badge_reference)
    }

    async fn create_company_badge(
        &self,
        user_reference: &str,
        request: CompanyBadgeRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        let mut user = self.fetch_authorized(user_reference, claim).await?;
        ensure_owner(claim, &user)?;
        Self::ensure_absent(
            self.repository.get_user_by_walls_tag(&request.walls_tag).await,
            format!("walls tag {} is taken", request.walls_tag),
        )?;

        let owner = user.user_reference.clone();
        let company = company_mut(&mut user, &request.company_profile_reference)?;
        let badge = new_badge(
            &company.walls_badge,
            &owner,
            &request.wallet_reference,
            &request.walls_tag,
            Utc::now(),
        );
        let badge_reference = badge.walls_badge_reference.clone();
        company.walls_badge.push(badge);

        self.commit(user_reference, user, EventKind::CompanyWallsBadgeCreated, User::clone)
            .await?;
        info!(
            user_reference = %user_reference,
            company_profile_reference = %request.company_profile_reference,
            walls_tag = %request.walls_tag,
            "Company badge created"
        );
        Ok(badge_reference)
    }

    async fn disable_user_badge(
        &self,
        user_reference: &str,
        walls_badge_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::UserWallsBadgeDisabled,
            |user| {
                find_mut(&mut user.user_profile.walls_badge, walls_badge_reference)?.is_active =
                    false;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    async fn disable_company_badge(
        &self,
        user_reference: &str,
        company_profile_reference: &str,
        walls_badge_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::CompanyWallsBadgeDisabled,
            |user| {
                let company = company_mut(user, company_profile_reference)?;
                find_mut(&mut company.walls_badge, walls_badge_reference)?.is_active = false;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    // =========================================================================
    // WALLET
    // =========================================================================

    async fn update_balance(
        &self,
        user_reference: &str,
        request: BalanceUpdate,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::BalanceUpdated, |user| {
            let balance = &mut user.wallet.balance;
            balance.pending_incoming_amount = request.book_amount;
            balance.available_amount = request.available_amount;
            balance.is_synced = true;
            balance.last_synced_on = Some(Utc::now());
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_wallet(
        &self,
        user_reference: &str,
        settings: WalletSettings,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::WalletUpdated, |user| {
            let wallet = &mut user.wallet;
            wallet.auto_fund = settings.auto_fund;
            wallet.auto_fund_level = settings.auto_fund_level;
            wallet.auto_fund_limit = settings.auto_fund_limit;
            wallet.auto_withdrawal = settings.auto_withdrawal;
            wallet.auto_withdrawal_level = settings.auto_withdrawal_level;
            wallet.auto_withdrawal_limit = settings.auto_withdrawal_limit;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_tier(
        &self,
        user_reference: &str,
        tier: Tier,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::TierUpdated, |user| {
            user.wallet.tier = tier;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn add_coupon(&self, user_reference: &str, coupon: Coupon) -> Result<String> {
        self.apply(user_reference, None, EventKind::CouponAdded, |user| {
            user.wallet.coupons.push(coupon);
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_rewards(&self, user_reference: &str, points: i64) -> Result<String> {
        self.apply(user_reference, None, EventKind::RewardsUpdated, |user| {
            let current = user.wallet.reward.points;
            user.wallet.reward.points = current.checked_add(points).ok_or_else(|| {
                AccountError::Validation(format!(
                    "adding {points} reward points overflows balance {current}"
                ))
            })?;
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    // =========================================================================
    // PAYMENT INSTRUMENTS
    // =========================================================================

    async fn add_bank(
        &self,
        user_reference: &str,
        request: BankDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::BankAdded, |user| {
            let bank = Bank {
                bank_reference: new_reference(),
                integration_type: request.integration_type,
                integration_reference: request.integration_reference,
                bank_name: request.bank_name,
                account_number: request.account_number,
                account_name: request.account_name,
                is_default: request.is_default,
            };
            let reference = bank.bank_reference.clone();
            user.bank_accounts.push(bank);
            if request.is_default {
                clear_other_defaults(&mut user.bank_accounts, &reference);
            }
            Ok(reference)
        })
        .await
    }

    async fn update_bank(
        &self,
        user_reference: &str,
        bank_reference: &str,
        request: BankDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::BankUpdated, |user| {
            let bank = find_mut(&mut user.bank_accounts, bank_reference)?;
            bank.integration_type = request.integration_type;
            bank.integration_reference = request.integration_reference;
            bank.bank_name = request.bank_name;
            bank.account_number = request.account_number;
            bank.account_name = request.account_name;
            bank.is_default = request.is_default;
            if request.is_default {
                clear_other_defaults(&mut user.bank_accounts, bank_reference);
            }
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn set_default_bank(
        &self,
        user_reference: &str,
        bank_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::DefaultBankSet, |user| {
            set_exclusive_default(&mut user.bank_accounts, bank_reference)
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn add_card(
        &self,
        user_reference: &str,
        request: CardDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::CardAdded, |user| {
            validate_card_expiry(
                request.expiry_month,
                request.expiry_year,
                Utc::now().date_naive(),
            )?;
            let card = Card {
                card_reference: new_reference(),
                integration_type: request.integration_type,
                integration_reference: request.integration_reference,
                card_name: request.card_name,
                pan: request.pan,
                expiry_month: request.expiry_month,
                expiry_year: request.expiry_year,
                is_default: request.is_default,
            };
            let reference = card.card_reference.clone();
            user.cards.push(card);
            if request.is_default {
                clear_other_defaults(&mut user.cards, &reference);
            }
            Ok(reference)
        })
        .await
    }

    async fn update_card(
        &self,
        user_reference: &str,
        card_reference: &str,
        request: CardDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::CardUpdated, |user| {
            validate_card_expiry(
                request.expiry_month,
                request.expiry_year,
                Utc::now().date_naive(),
            )?;
            let card = find_mut(&mut user.cards, card_reference)?;
            card.integration_type = request.integration_type;
            card.integration_reference = request.integration_reference;
            card.card_name = request.card_name;
            card.pan = request.pan;
            card.expiry_month = request.expiry_month;
            card.expiry_year = request.expiry_year;
            card.is_default = request.is_default;
            if request.is_default {
                clear_other_defaults(&mut user.cards, card_reference);
            }
            Ok(())
        })
        .await?;
        Ok(user_reference.to_string())
    }

    async fn set_default_card(
        &self,
        user_reference: &str,
        card_reference: &str,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::DefaultCardSet, |user| {
            set_exclusive_default(&mut user.cards, card_reference)
        })
        .await?;
        Ok(user_reference.to_string())
    }

    // =========================================================================
    // KYC, DEVICE, NOTIFICATIONS, CONTACTS
    // =========================================================================

    async fn add_documentation(
        &self,
        user_reference: &str,
        request: DocumentationDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::DocumentationAdded,
            |user| {
                let documentation = Documentation {
                    documentation_reference: new_reference(),
                    documentation_type: request.documentation_type,
                    documentation_number: request.documentation_number,
                    expiry: request.expiry,
                    document_reference: request.document_reference,
                    tier_reference: request.tier_reference,
                    ..Default::default()
                };
                let reference = documentation.documentation_reference.clone();
                user.kyc.documentations.push(documentation);
                Ok(reference)
            },
        )
        .await
    }

    async fn update_documentation(
        &self,
        user_reference: &str,
        documentation_reference: &str,
        request: DocumentationDetails,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::DocumentationUpdated,
            |user| {
                let documentation =
                    find_mut(&mut user.kyc.documentations, documentation_reference)?;
                documentation.documentation_type = request.documentation_type;
                documentation.documentation_number = request.documentation_number;
                documentation.expiry = request.expiry;
                documentation.document_reference = request.document_reference;
                documentation.tier_reference = request.tier_reference;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    async fn update_device(
        &self,
        user_reference: &str,
        new_device: Device,
        claim: &CurrentUser,
    ) -> Result<String> {
        let mut user = self.fetch_authorized(user_reference, claim).await?;
        Self::ensure_absent(
            self.repository.get_user_by_device(&new_device).await,
            "device is already registered".to_string(),
        )?;

        user.device = new_device;
        self.commit(user_reference, user, EventKind::DeviceUpdated, User::clone)
            .await?;
        info!(user_reference = %user_reference, "Device rebound");
        Ok(user_reference.to_string())
    }

    async fn update_notification_options(
        &self,
        user_reference: &str,
        request: NotificationPreferences,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(
            user_reference,
            Some(claim),
            EventKind::NotificationOptionsUpdated,
            |user| {
                let options = &mut user.notification_options;
                options.push_notification_enabled = request.push_notification_enabled;
                options.notification_type = request.notification_type;
                options.otp_channel = request.otp_type;
                Ok(())
            },
        )
        .await?;
        Ok(user_reference.to_string())
    }

    async fn add_contact(
        &self,
        user_reference: &str,
        request: ContactRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        self.apply(user_reference, Some(claim), EventKind::ContactAdded, |user| {
            let contact = Contact {
                contact_reference: new_reference(),
                phone: request.phone,
                full_name: request.full_name,
                walls_tag: request.walls_tag,
                is_beneficiary: request.is_beneficiary,
            };
            let reference = contact.contact_reference.clone();
            user.contacts.push(contact);
            Ok(reference)
        })
        .await
    }

    // =========================================================================
    // REQUESTS TO OTHER SERVICES
    // =========================================================================

    async fn create_identity_request(
        &self,
        user_reference: &str,
        request: IdentityRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        let user = self.fetch_authorized(user_reference, claim).await?;

        let data = IdentityRequestData {
            user_reference: user.user_reference.clone(),
            phone: request.phone,
            device: request.device,
        };
        self.forward(EventKind::CreateIdentityRequest, user_reference, data)
            .await?;
        Ok(user.user_reference)
    }

    async fn upgrade_tier_request(
        &self,
        user_reference: &str,
        request: TierUpgradeRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        let user = self.fetch_authorized(user_reference, claim).await?;

        if request.tier_documents.is_empty() {
            return Err(AccountError::Validation(
                "tier upgrade requires at least one tier document".to_string(),
            ));
        }

        let data = TierUpgradeRequestData {
            request_reference: new_reference(),
            user_reference: user.user_reference.clone(),
            current_tier: user.wallet.tier.clone(),
            requested_tier: request.requested_tier,
            kyc_documents: user.kyc.documentations.clone(),
            tier_documents: request.tier_documents,
            request_status: TIER_REQUEST_PENDING.to_string(),
        };
        let request_reference = data.request_reference.clone();

        self.forward(EventKind::TierUpgradeRequest, user_reference, data)
            .await?;
        info!(user_reference = %user_reference, request_reference = %request_reference, "Tier upgrade requested");
        Ok(request_reference)
    }

    async fn create_transaction_request(
        &self,
        user_reference: &str,
        request: TransactionRequest,
        claim: &CurrentUser,
    ) -> Result<String> {
        let sender = self.fetch(user_reference).await?;
        let receiver = self.fetch(&request.receiver_reference).await?;

        authorize(claim, &sender)?;
        ensure_owner(claim, &sender)?;

        admit(&sender, &receiver, request.amount).map_err(|rejection| {
            warn!(
                user_reference = %user_reference,
                receiver_reference = %request.receiver_reference,
                amount = request.amount,
                reason = %rejection,
                "Transaction rejected"
            );
            AccountError::from(rejection)
        })?;

        let walls_badge_reference = match request.receiver_walls_badge_reference {
            Some(reference) if !reference.is_empty() => reference,
            _ => {
                self.repository
                    .get_user_default_walls_badge(&request.receiver_reference)
                    .await?
                    .walls_badge_reference
            }
        };

        let data = TransactionRequestData {
            request_reference: new_reference(),
            transaction_type: request.transaction_type.clone(),
            amount: request.amount,
            sender: TransferSender {
                kind: request.transaction_type.clone(),
                user_reference: sender.user_reference.clone(),
                reference: request.out_reference,
                device: claim.device.clone(),
            },
            receiver: TransferReceiver {
                kind: request.transaction_type,
                user_reference: receiver.user_reference.clone(),
                reference: request.in_reference,
                walls_badge_reference,
            },
            metadata: request.metadata,
        };
        let request_reference = data.request_reference.clone();

        self.forward(EventKind::TransactionCreateRequest, user_reference, data)
            .await?;
        info!(
            user_reference = %user_reference,
            request_reference = %request_reference,
            "Transaction request forwarded"
        );
        Ok(request_reference)
    }
}
