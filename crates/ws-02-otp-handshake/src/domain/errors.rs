use thiserror::Error;
use ws_01_user_accounts::AccountError;

/// Errors from the OTP handshake, outbound and inbound.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// Account lookup, guard or pipeline failure.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Contact shape or OTP type does not fit the request.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Inbound data names a purpose no handler applies.
    #[error("Unknown OTP discriminator: {0}")]
    UnknownDiscriminator(String),

    /// Inbound data does not decode into the expected shape.
    #[error("Malformed OTP event data: {0}")]
    Decode(String),
}

impl HandshakeError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Account(AccountError::Validation(_))
        )
    }
}
