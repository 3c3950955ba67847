//! Withdrawal request model: a beneficiary cashing out approved funds.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BeneficiaryId, WithdrawalId};

/// Lifecycle state of a withdrawal request.
///
/// `Pending -> Approved | Rejected`; `Approved -> Paid | Failed`.
/// `Rejected`, `Paid`, and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalState {
    Pending,
    Approved,
    Rejected,
    Paid,
    Failed,
}

impl WithdrawalState {
    /// Whether this request still claims balance. Pending and approved
    /// requests reserve funds; paid ones have consumed them.
    #[must_use]
    pub fn claims_balance(self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::Paid)
    }
}

impl fmt::Display for WithdrawalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Paid => write!(f, "PAID"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// How the payout should be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutMethod {
    MobileMoney {
        number: String,
    },
    Bank {
        bank_name: String,
        account: String,
        account_name: String,
    },
    Cash,
}

impl fmt::Display for PayoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MobileMoney { .. } => write!(f, "MOBILE_MONEY"),
            Self::Bank { .. } => write!(f, "BANK"),
            Self::Cash => write!(f, "CASH"),
        }
    }
}

/// A beneficiary's request to cash out approved-but-unpaid funds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: WithdrawalId,
    pub beneficiary_id: BeneficiaryId,
    /// Strictly positive and at least the configured minimum.
    pub amount: Decimal,
    pub method: PayoutMethod,
    pub state: WithdrawalState,
    pub requested_at: DateTime<Utc>,
    /// Stamped when an administrator approves or rejects.
    pub validated_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
}

impl WithdrawalRequest {
    /// Create a new pending request.
    #[must_use]
    pub fn new(beneficiary_id: BeneficiaryId, amount: Decimal, method: PayoutMethod) -> Self {
        Self {
            id: WithdrawalId::new(),
            beneficiary_id,
            amount,
            method,
            state: WithdrawalState::Pending,
            requested_at: Utc::now(),
            validated_at: None,
            paid_at: None,
            rejection_reason: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_balance_states() {
        assert!(WithdrawalState::Pending.claims_balance());
        assert!(WithdrawalState::Approved.claims_balance());
        assert!(WithdrawalState::Paid.claims_balance());
        assert!(!WithdrawalState::Rejected.claims_balance());
        assert!(!WithdrawalState::Failed.claims_balance());
    }

    #[test]
    fn new_request_is_pending() {
        let req = WithdrawalRequest::new(
            BeneficiaryId::new(),
            Decimal::new(10_000, 0),
            PayoutMethod::Cash,
        );
        assert_eq!(req.state, WithdrawalState::Pending);
        assert!(req.validated_at.is_none());
        assert!(req.paid_at.is_none());
    }

    #[test]
    fn method_serde_roundtrip() {
        let method = PayoutMethod::Bank {
            bank_name: "BGFI".into(),
            account: "0001234".into(),
            account_name: "A. Author".into(),
        };
        let json = serde_json::to_string(&method).unwrap();
        assert!(json.contains("BANK"));
        let back: PayoutMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(method, back);
    }
}
