//! # Error Types
//!
//! Every rejected precondition surfaces as a distinct `TokenError` variant.
//! A returned error always means the call had no effect: no balance,
//! allowance, backup or blacklist entry changed and no event was emitted.

use crate::domain::value_objects::{Address, U256};
use thiserror::Error;

// =============================================================================
// TOKEN ERRORS
// =============================================================================

/// Errors returned by ledger, access-guard and recovery entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Transfer recipient is the zero address.
    #[error("transfer to the zero address")]
    InvalidRecipient,

    /// Transfer source is the zero address.
    #[error("transfer from the zero address")]
    InvalidFromAddress,

    /// Approval spender is the zero address.
    #[error("approve to the zero address")]
    InvalidSpender,

    /// Approval owner is the zero address.
    #[error("approve from the zero address")]
    InvalidOwner,

    /// Source balance is lower than the transfer amount.
    #[error("transfer amount exceeds balance")]
    InsufficientBalance {
        /// Current balance.
        available: U256,
        /// Requested amount.
        required: U256,
    },

    /// Spender allowance is lower than the transfer amount.
    #[error("transfer amount exceeds allowance")]
    InsufficientAllowance {
        /// Current allowance.
        available: U256,
        /// Requested amount.
        required: U256,
    },

    /// Allowance decrease would go below zero.
    #[error("decreased allowance below zero")]
    NegativeAllowance {
        /// Current allowance.
        current: U256,
        /// Requested decrease.
        decrease: U256,
    },

    /// An account involved in the call is blacklisted.
    #[error("blacklisted")]
    Blacklisted(Address),

    /// Recovery requested for an account without a backup address.
    #[error("backup address is not set")]
    BackupAddressNotSet(Address),

    /// The nominated backup address is itself blacklisted.
    #[error("backup address is black listed")]
    BackupAddressBlacklisted(Address),

    /// The authorization deadline has passed.
    #[error("signature expired")]
    SignatureExpired {
        /// Signed deadline, Unix seconds.
        deadline: u64,
        /// Clock reading at verification.
        now: u64,
    },

    /// The authorization was not signed by the account being recovered.
    #[error("invalid signature")]
    InvalidSignature,

    /// 256-bit arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// A staged transaction would change the total supply.
    #[error("conservation invariant violated: {0}")]
    ConservationViolated(String),
}

impl TokenError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecipient => "InvalidRecipient",
            Self::InvalidFromAddress => "InvalidFromAddress",
            Self::InvalidSpender => "InvalidSpender",
            Self::InvalidOwner => "InvalidOwner",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::InsufficientAllowance { .. } => "InsufficientAllowance",
            Self::NegativeAllowance { .. } => "NegativeAllowance",
            Self::Blacklisted(_) => "Blacklisted",
            Self::BackupAddressNotSet(_) => "BackupAddressNotSet",
            Self::BackupAddressBlacklisted(_) => "BackupAddressBlacklisted",
            Self::SignatureExpired { .. } => "SignatureExpired",
            Self::InvalidSignature => "InvalidSignature",
            Self::Overflow => "Overflow",
            Self::ConservationViolated(_) => "ConservationViolated",
        }
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

// =============================================================================
// SIGNATURE ERRORS
// =============================================================================

/// Errors from ECDSA signer recovery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// R or S is zero or not below the curve order.
    #[error("invalid signature format")]
    InvalidFormat,

    /// S is in the upper half of the curve order (EIP-2).
    #[error("malleable signature (high S value)")]
    MalleableSignature,

    /// v must be 0, 1, 27 or 28.
    #[error("invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// No public key could be recovered.
    #[error("failed to recover public key")]
    RecoveryFailed,

    /// Private key bytes are not a valid secp256k1 scalar.
    #[error("invalid private key")]
    InvalidPrivateKey,
}

impl From<SignatureError> for TokenError {
    fn from(_: SignatureError) -> Self {
        TokenError::InvalidSignature
    }
}

// =============================================================================
// TESTS
// =============================================================================
