//! Configuration for the settlement core.
//!
//! The fallback rates and the withdrawal minimum are deployment
//! configuration, not literals buried in the calculators — tests override
//! them freely and operators tune them per deployment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BeneficiaryKind, PressworkError, Result};

/// Injected configuration for rate resolution and withdrawals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Percentage applied to author royalties when no rate rule matches.
    pub default_author_rate: Decimal,
    /// Percentage applied to partner rebates when no rate rule matches.
    pub default_partner_rate: Decimal,
    /// Minimum amount a single withdrawal request may claim.
    pub min_withdrawal: Decimal,
    /// Decimal places of the currency's minor unit (0 for F CFA).
    pub minor_unit_scale: u32,
    /// Refuse a new withdrawal request while another is still pending.
    /// Off by default: the balance check alone bounds concurrent claims,
    /// and several open requests may be processed as a batch.
    #[serde(default)]
    pub single_pending_withdrawal: bool,
}

impl SettlementConfig {
    /// The fallback percentage for a beneficiary kind.
    #[must_use]
    pub fn default_rate(&self, kind: BeneficiaryKind) -> Decimal {
        match kind {
            BeneficiaryKind::Author => self.default_author_rate,
            BeneficiaryKind::Partner => self.default_partner_rate,
        }
    }

    /// Validate thresholds. Negative defaults or minimums are operator error.
    pub fn validate(&self) -> Result<()> {
        if self.default_author_rate < Decimal::ZERO || self.default_partner_rate < Decimal::ZERO {
            return Err(PressworkError::Configuration(
                "default rates must be non-negative".into(),
            ));
        }
        if self.min_withdrawal < Decimal::ZERO {
            return Err(PressworkError::Configuration(
                "min_withdrawal must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            default_author_rate: Decimal::new(15, 0),
            default_partner_rate: Decimal::new(10, 0),
            min_withdrawal: Decimal::new(5_000, 0),
            minor_unit_scale: 0,
            single_pending_withdrawal: false,
        }
    }
}
