//! Error types for the Presswork settlement core.
//!
//! All errors use the `PW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Rate resolution errors
//! - 2xx: Settlement entry errors
//! - 3xx: Withdrawal / balance errors
//! - 4xx: Payout webhook errors
//! - 9xx: General / internal errors
//!
//! A duplicate settlement computation is **not** an error: the calculator
//! returns the existing entry (`Computed::Existing`) instead.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{EntryId, EntryState, RuleId, WithdrawalId, WithdrawalState};

/// Central error enum for all Presswork operations.
#[derive(Debug, Error)]
pub enum PressworkError {
    // =================================================================
    // Rate Resolution Errors (1xx)
    // =================================================================
    /// A stored rate rule carries a negative value. Stored-data corruption:
    /// the resolution must abort rather than clamp or fall back to a default.
    #[error("PW_ERR_100: Corrupt rate rule {rule_id}: negative value {value}")]
    RuleCorrupt { rule_id: RuleId, value: Decimal },

    // =================================================================
    // Settlement Entry Errors (2xx)
    // =================================================================
    /// The requested settlement entry was not found in the ledger.
    #[error("PW_ERR_200: Settlement entry not found: {0}")]
    EntryNotFound(EntryId),

    /// An illegal state transition was attempted on a settlement entry.
    #[error("PW_ERR_201: Invalid entry transition: {entry_id} is {current}, cannot {action}")]
    InvalidEntryState {
        entry_id: EntryId,
        current: EntryState,
        action: &'static str,
    },

    // =================================================================
    // Withdrawal / Balance Errors (3xx)
    // =================================================================
    /// The requested withdrawal was not found.
    #[error("PW_ERR_300: Withdrawal not found: {0}")]
    WithdrawalNotFound(WithdrawalId),

    /// The withdrawal amount is zero or negative.
    #[error("PW_ERR_301: Invalid withdrawal amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// The withdrawal amount is below the configured minimum.
    #[error("PW_ERR_302: Withdrawal below minimum: requested {requested}, minimum {minimum}")]
    BelowMinimum { requested: Decimal, minimum: Decimal },

    /// The withdrawal amount exceeds the beneficiary's available balance.
    #[error("PW_ERR_303: Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    /// The beneficiary already has a pending withdrawal request.
    #[error("PW_ERR_304: A pending withdrawal already exists: {0}")]
    WithdrawalPending(WithdrawalId),

    /// An illegal state transition was attempted on a withdrawal.
    #[error("PW_ERR_305: Invalid withdrawal transition: {withdrawal_id} is {current}, cannot {action}")]
    InvalidWithdrawalState {
        withdrawal_id: WithdrawalId,
        current: WithdrawalState,
        action: &'static str,
    },

    // =================================================================
    // Payout Webhook Errors (4xx)
    // =================================================================
    /// The inbound payout event's signature didn't verify.
    #[error("PW_ERR_400: Payout event signature verification failed")]
    InvalidSignature,

    /// The inbound payout event is malformed or missing required fields.
    #[error("PW_ERR_401: Invalid payout event: {reason}")]
    InvalidPayoutEvent { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PW_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("PW_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid thresholds, missing fields, etc.).
    #[error("PW_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PressworkError>;

impl From<serde_json::Error> for PressworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
