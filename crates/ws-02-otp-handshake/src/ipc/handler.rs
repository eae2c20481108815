//! # OTP-Validated Handler
//!
//! Applies a validated OTP to the account it was issued for:
//!
//! | Discriminator | Effect |
//! |---------------|--------|
//! | `create_user` | Create the user unless one already exists under the reference |
//! | `verify_email` | Flag the email verified if the user exists |
//! | `verify_phone` | Flag the phone verified if the user exists |
//! | anything else | `UnknownDiscriminator`, logged at error level |
//!
//! Redelivery of the same `create_user` event creates nothing new because
//! existence is checked first. A subject without a user reference, with an
//! incomplete device, or creating an account for a non-phone contact is
//! rejected before the account service is called.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::MessageHandler;
use shared_types::{CurrentUser, EventEnvelope};
use tracing::{debug, error, info, warn};
use ws_01_user_accounts::{CreateUser, UserAccountsApi};

use super::payloads::{OtpValidatedCommand, OtpValidation};
use crate::domain::HandshakeError;

/// Routes OTP-validated envelopes into the account service.
pub struct OtpValidatedHandler<A: UserAccountsApi> {
    accounts: Arc<A>,
}

impl<A: UserAccountsApi> OtpValidatedHandler<A> {
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    /// Apply an already decoded command.
    pub async fn apply(&self, command: OtpValidatedCommand) -> Result<(), HandshakeError> {
        match command {
            OtpValidatedCommand::CreateUser(subject) => self.create_user(subject).await,
            OtpValidatedCommand::VerifyEmail(subject) => {
                if self.exists(&subject.user_reference).await? {
                    self.accounts.mark_email_verified(&subject.user_reference).await?;
                }
                Ok(())
            }
            OtpValidatedCommand::VerifyPhone(subject) => {
                if self.exists(&subject.user_reference).await? {
                    self.accounts.mark_phone_verified(&subject.user_reference).await?;
                }
                Ok(())
            }
        }
    }

    async fn create_user(&self, subject: OtpValidation) -> Result<(), HandshakeError> {
        if self.exists(&subject.user_reference).await? {
            debug!(user_reference = %subject.user_reference, "User already exists; create skipped");
            return Ok(());
        }

        let claim = CurrentUser::new(
            subject.user_reference.as_str(),
            subject.contact.as_str(),
            subject.device,
        );
        let reference = self
            .accounts
            .create_user(CreateUser { phone: subject.contact }, &claim)
            .await?;
        info!(user_reference = %reference, "User created from validated OTP");
        Ok(())
    }

    async fn exists(&self, user_reference: &str) -> Result<bool, HandshakeError> {
        match self.accounts.get_user_by_reference(user_reference).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(user_reference = %user_reference, "No user for validated OTP");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<A: UserAccountsApi + 'static> MessageHandler for OtpValidatedHandler<A> {
    type Error = HandshakeError;

    async fn handle(&self, envelope: EventEnvelope) -> Result<(), HandshakeError> {
        let command = OtpValidatedCommand::from_envelope(&envelope).inspect_err(|e| match e {
            HandshakeError::UnknownDiscriminator(discriminator) => error!(
                event_reference = %envelope.event_reference,
                discriminator = %discriminator,
                "Invalid OTP event type"
            ),
            HandshakeError::Validation(reason) => warn!(
                event_reference = %envelope.event_reference,
                reason = %reason,
                "Validated OTP subject rejected"
            ),
            _ => {}
        })?;

        debug!(
            event_reference = %envelope.event_reference,
            command = command.name(),
            user_reference = %command.subject().user_reference,
            "Applying validated OTP"
        );
        self.apply(command).await
    }
}
