//! Account error types.
//!
//! Every pipeline failure maps to exactly one of these kinds so callers can
//! tell an authorization failure from a missing aggregate or a bad request.

use shared_bus::BusError;
use shared_types::StoreError;
use thiserror::Error;

/// Why the caller's claim did not bind to the stored aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationFailure {
    #[error("this device is not registered to this user")]
    UnregisteredDevice,

    #[error("the phone number is not registered to this user")]
    UnregisteredPhone,

    #[error("caller {caller} may not act on {target}")]
    NotOwner { caller: String, target: String },
}

/// Why a transfer request was refused before leaving the service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    #[error("insufficient funds: available {available}, requested {amount}")]
    InsufficientFunds { available: f64, amount: f64 },

    #[error("amount {amount} exceeds sending limit {limit}")]
    SendingLimitExceeded { amount: f64, limit: f64 },

    #[error("receiver wallet limit {limit} would be exceeded by resulting balance {resulting}")]
    WalletLimitExceeded { resulting: f64, limit: f64 },

    #[error("receiver balance {balance} already exceeds receiving limit {limit}")]
    ReceivingLimitExceeded { balance: f64, limit: f64 },
}

/// Errors from user account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Device or phone binding mismatch. Nothing was written.
    #[error("Unauthorized: {0}")]
    Authorization(#[from] AuthorizationFailure),

    /// Aggregate or sub-entity reference absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is malformed for this operation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request collides with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transfer refused by admission control.
    #[error("Transaction rejected: {0}")]
    Admission(#[from] AdmissionError),

    /// The pub/sub transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] BusError),

    /// The document store failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Duplicate(what) => Self::Conflict(what),
            StoreError::Backend(reason) => Self::Persistence(reason),
        }
    }
}

impl AccountError {
    pub fn not_found(kind: &str, reference: &str) -> Self {
        Self::NotFound(format!("{kind} {reference}"))
    }

    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
