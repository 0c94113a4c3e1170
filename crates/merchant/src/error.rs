//! Unified error handling for the merchant dashboard.

use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for merchant operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerchantError {
    /// No wallet is connected but the operation needs one.
    #[error("Identity missing: connect a wallet first")]
    IdentityMissing,

    /// The wallet already owns a merchant account.
    #[error("Duplicate identity: wallet already registered")]
    DuplicateIdentity,

    /// A form field failed validation.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// Form field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The store rejected the request for reasons opaque to this crate.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Requested document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The calling merchant does not own the product.
    #[error("Forbidden: product belongs to another merchant")]
    NotOwner,

    /// The user declined a confirmation prompt.
    #[error("Cancelled by user")]
    Cancelled,

    /// The operation needs a registered merchant.
    #[error("Merchant not registered")]
    NotRegistered,

    /// The dashboard is not in a state that allows the operation.
    #[error("Invalid dashboard state: {0}")]
    InvalidState(String),
}

impl MerchantError {
    /// Build an [`MerchantError::InvalidField`].
    pub fn invalid_field(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }

    /// Whether the error came from the store rather than local validation.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Log the error and, for store failures, capture it with Sentry.
    pub fn report(&self) {
        if self.is_store_failure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Merchant store error"
            );
        } else {
            tracing::warn!(error = %self, "Merchant operation rejected");
        }
    }
}

impl From<StoreError> for MerchantError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::DuplicateIdentity,
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Forbidden(_) => Self::NotOwner,
            StoreError::Unavailable(_) | StoreError::DataCorruption(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}
