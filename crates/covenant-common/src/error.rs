//! Error types for the Covenant lending core
//!
//! Provides a unified error type and domain-specific error variants.
//! Every failure is a pure return value; no partial mutation reaches
//! storage when an error is produced.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using LendError
pub type Result<T> = std::result::Result<T, LendError>;

/// Unified error type for Covenant operations
#[derive(Debug, Error)]
pub enum LendError {
    #[error("Offer not found: {key}")]
    OfferNotFound { key: String },

    #[error("Loan not found: {key}")]
    LoanNotFound { key: String },

    #[error("Caller {caller} is not authorized to {action}")]
    Unauthorized { caller: String, action: String },

    #[error("Invalid status for {key}: {reason}")]
    InvalidStatus { key: String, reason: String },

    #[error("Insufficient collateral: required {required}, provided {provided}")]
    InsufficientCollateral {
        required: Decimal,
        provided: Decimal,
    },

    // Token ledger errors
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Validation error: {0}")]
    Validation(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Token ledger operation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("Insufficient available balance of {token}: required {required}, available {available}")]
    InsufficientBalance {
        token: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient held balance under {hold}: required {required}, held {held}")]
    InsufficientHeld {
        hold: String,
        required: Decimal,
        held: Decimal,
    },

    #[error("Hold not found: {0}")]
    HoldNotFound(String),

    #[error("Amount must be positive")]
    InvalidAmount,
}

impl LendError {
    /// True for the error classes a caller may retry after a fresh read
    /// (the losing side of an optimistic-concurrency race lands here).
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, LendError::InvalidStatus { .. })
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for LendError {
    fn from(err: serde_json::Error) -> Self {
        LendError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LendError {
    fn from(err: std::io::Error) -> Self {
        LendError::Storage(err.to_string())
    }
}
