//! Error types for the SealBet ledger.
//!
//! All errors use the `SB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by class:
//! - 1xx: Validation (caller input)
//! - 2xx: State / ordering (operation outside its window)
//! - 3xx: Authorization
//! - 4xx: Integrity (commitment verification)
//! - 5xx: Idempotency (double submission)
//! - 6xx: Outcome
//! - 7xx: Funds / custody
//! - 9xx: General / internal
//!
//! Every failure is synchronous and leaves all records untouched.

use thiserror::Error;

use crate::{Address, Identity};

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Validation,
    StateOrdering,
    Authorization,
    Integrity,
    Idempotency,
    Outcome,
    Funds,
    Internal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::StateOrdering => write!(f, "STATE_ORDERING"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Integrity => write!(f, "INTEGRITY"),
            Self::Idempotency => write!(f, "IDEMPOTENCY"),
            Self::Outcome => write!(f, "OUTCOME"),
            Self::Funds => write!(f, "FUNDS"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all SealBet operations.
#[derive(Debug, Error)]
pub enum SealbetError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// Question exceeds the configured byte limit.
    #[error("SB_ERR_100: Question too long: {len} bytes, max {max}")]
    QuestionTooLong { len: usize, max: usize },

    /// Market deadline is not in the future.
    #[error("SB_ERR_101: Deadline must be in the future")]
    DeadlineInPast,

    /// Stake of zero.
    #[error("SB_ERR_102: Bet amount must be greater than zero")]
    ZeroBetAmount,

    /// Outcome byte other than 0 or 1.
    #[error("SB_ERR_103: Invalid outcome: {0}")]
    InvalidOutcome(u8),

    /// Engine configuration rejected.
    #[error("SB_ERR_104: Invalid configuration: {0}")]
    InvalidConfig(String),

    // =================================================================
    // State / Ordering Errors (2xx)
    // =================================================================
    /// No market at this address.
    #[error("SB_ERR_200: Market not found: {0}")]
    MarketNotFound(Address),

    /// Commit attempted at or after the deadline.
    #[error("SB_ERR_201: Market deadline has already passed")]
    MarketClosed,

    /// Reveal or resolve attempted before the deadline.
    #[error("SB_ERR_202: Market deadline has not passed yet")]
    DeadlineNotReached,

    /// Reveal attempted at or after the reveal deadline.
    #[error("SB_ERR_203: Reveal window has closed")]
    RevealWindowClosed,

    /// Market already carries an outcome.
    #[error("SB_ERR_204: Market has already been resolved")]
    MarketAlreadyResolved,

    /// Claim attempted before resolution.
    #[error("SB_ERR_205: Market is not resolved yet")]
    MarketNotResolved,

    /// No commitment by this caller on this market.
    #[error("SB_ERR_206: Commitment not found: {0}")]
    CommitmentNotFound(Address),

    /// Claim attempted on a commitment that was never revealed.
    #[error("SB_ERR_207: Bet has not been revealed")]
    NotRevealed,

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// Caller is neither oracle nor creator.
    #[error("SB_ERR_300: Unauthorized resolver: {0}")]
    UnauthorizedResolver(Identity),

    // =================================================================
    // Integrity Errors (4xx)
    // =================================================================
    /// `(amount, outcome, salt)` does not reproduce the stored digest.
    #[error("SB_ERR_400: Commitment hash does not match")]
    CommitmentMismatch,

    // =================================================================
    // Idempotency Errors (5xx)
    // =================================================================
    /// A market with this (creator, id) already exists.
    #[error("SB_ERR_500: Market already exists: {0}")]
    MarketAlreadyExists(Address),

    /// Caller already committed on this market.
    #[error("SB_ERR_501: Commitment already exists: {0}")]
    CommitmentAlreadyExists(Address),

    #[error("SB_ERR_502: Bet has already been revealed")]
    AlreadyRevealed,

    #[error("SB_ERR_503: Winnings have already been claimed")]
    AlreadyClaimed,

    // =================================================================
    // Outcome Errors (6xx)
    // =================================================================
    /// Revealed outcome differs from the resolved outcome.
    #[error("SB_ERR_600: User did not win")]
    DidNotWin,

    // =================================================================
    // Funds / Custody Errors (7xx)
    // =================================================================
    /// Caller's available balance cannot cover the stake or withdrawal.
    #[error("SB_ERR_700: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    /// Vault cannot cover a payout.
    #[error("SB_ERR_701: Insufficient vault funds: need {needed}, have {available}")]
    InsufficientVaultFunds { needed: u64, available: u64 },

    /// Checked arithmetic overflowed.
    #[error("SB_ERR_702: Arithmetic overflow")]
    Overflow,

    /// Conservation invariant violated. Critical safety alert.
    #[error("SB_ERR_703: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error (e.g. a poisoned lock).
    #[error("SB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SB_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl SealbetError {
    /// Which class of failure this is.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::QuestionTooLong { .. }
            | Self::DeadlineInPast
            | Self::ZeroBetAmount
            | Self::InvalidOutcome(_)
            | Self::InvalidConfig(_) => ErrorClass::Validation,
            Self::MarketNotFound(_)
            | Self::MarketClosed
            | Self::DeadlineNotReached
            | Self::RevealWindowClosed
            | Self::MarketAlreadyResolved
            | Self::MarketNotResolved
            | Self::CommitmentNotFound(_)
            | Self::NotRevealed => ErrorClass::StateOrdering,
            Self::UnauthorizedResolver(_) => ErrorClass::Authorization,
            Self::CommitmentMismatch => ErrorClass::Integrity,
            Self::MarketAlreadyExists(_)
            | Self::CommitmentAlreadyExists(_)
            | Self::AlreadyRevealed
            | Self::AlreadyClaimed => ErrorClass::Idempotency,
            Self::DidNotWin => ErrorClass::Outcome,
            Self::InsufficientBalance { .. }
            | Self::InsufficientVaultFunds { .. }
            | Self::Overflow
            | Self::SupplyInvariantViolation { .. } => ErrorClass::Funds,
            Self::Internal(_) | Self::Serialization(_) => ErrorClass::Internal,
        }
    }

    /// Whether resubmitting (after fixing input, funding, or waiting) can
    /// succeed. Closed windows, mismatches and idempotency hits never can.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::DeadlineNotReached
            | Self::MarketNotResolved
            | Self::InsufficientBalance { .. } => true,
            Self::InvalidConfig(_) => false,
            other => other.class() == ErrorClass::Validation,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealbetError>;

impl From<serde_json::Error> for SealbetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
