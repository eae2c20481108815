//! # OTP Handshake Service
//!
//! Owns the edges into the external verifier:
//!
//! ```text
//! request_otp ──→ OTPREQUESTCREATEDEVENT:<TYPE> ──→ verifier
//! validate_otp ─→ VALIDATEOTPREQUESTEVENT ────────→ verifier ──→ OTPVALIDATEDEVENT:<TYPE>
//! ```
//!
//! Both requests run the same admission: account creation is open to any
//! caller, every other purpose requires a bound caller, and the contact must
//! have the shape the purpose demands. Nothing is published when admission
//! fails. The OTP value itself is checked by the verifier, not here.
//!
//! Validation requests share one channel; their purpose travels only in the
//! envelope's `event_type`.

use std::sync::Arc;

use shared_bus::{EventKind, EventPublisher};
use shared_types::CurrentUser;
use tracing::{info, warn};
use ws_01_user_accounts::{AccountError, UserAccountsApi};

use crate::domain::{HandshakeError, OtpRequest, OtpType, OtpValidationRequest};
use crate::ipc::payloads::{OtpRequestData, ValidateOtpRequestData};

/// Forwards OTP requests and validations for the account service `A`.
pub struct OtpHandshakeService<A: UserAccountsApi> {
    accounts: Arc<A>,
    publisher: EventPublisher,
}

impl<A: UserAccountsApi> OtpHandshakeService<A> {
    pub fn new(accounts: Arc<A>, publisher: EventPublisher) -> Self {
        Self {
            accounts,
            publisher,
        }
    }

    /// Ask the verifier to issue an OTP to `request.contact`.
    ///
    /// Returns the caller's user reference.
    pub async fn request_otp(
        &self,
        request: OtpRequest,
        claim: &CurrentUser,
    ) -> Result<String, HandshakeError> {
        let otp_type = self.admit(&request.otp_type, &request.contact, claim).await?;

        let data = OtpRequestData {
            user_reference: claim.user_reference.clone(),
            contact: request.contact,
            channel: request.channel,
            device: request.device,
        };
        self.publisher
            .publish(
                EventKind::OtpRequestCreated,
                Some(otp_type.as_str()),
                &claim.user_reference,
                data,
            )
            .await
            .map_err(AccountError::from)?;
        info!(user_reference = %claim.user_reference, otp_type = %otp_type, "OTP requested");
        Ok(claim.user_reference.clone())
    }

    /// Forward an OTP the caller received to the verifier.
    pub async fn validate_otp(
        &self,
        request: OtpValidationRequest,
        claim: &CurrentUser,
    ) -> Result<String, HandshakeError> {
        let otp_type = self.admit(&request.otp_type, &request.contact, claim).await?;

        let data = ValidateOtpRequestData {
            user_reference: claim.user_reference.clone(),
            contact: request.contact,
            otp: request.otp,
            device: request.device,
        };
        self.publisher
            .publish_typed(
                EventKind::ValidateOtpRequest,
                otp_type.as_str(),
                &claim.user_reference,
                data,
            )
            .await
            .map_err(AccountError::from)?;
        info!(user_reference = %claim.user_reference, otp_type = %otp_type, "OTP sent for validation");
        Ok(claim.user_reference.clone())
    }

    async fn admit(
        &self,
        otp_type: &str,
        contact: &str,
        claim: &CurrentUser,
    ) -> Result<OtpType, HandshakeError> {
        let otp_type: OtpType = otp_type.parse()?;

        if otp_type.requires_bound_caller() {
            self.accounts.verify_caller(claim).await?;
        }

        otp_type.check_contact(contact).inspect_err(|_| {
            warn!(user_reference = %claim.user_reference, otp_type = %otp_type, "Contact shape rejected");
        })?;
        Ok(otp_type)
    }
}
