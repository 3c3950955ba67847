//! The priority-hierarchy rate resolver.
//!
//! One parameterized loop over an ordered candidate-scope list replaces
//! the original back-office's near-duplicate per-scope date-range queries.

use chrono::{DateTime, Utc};
use presswork_types::{
    BeneficiaryId, BeneficiaryKind, PressworkError, RateKind, RateScope, ResolvedRate, Result,
    SettlementConfig, WorkId,
};
use rust_decimal::Decimal;

use crate::book::RateBook;

/// Resolves the single applicable rate for a sale.
///
/// Pure read against the [`RateBook`]; no side effects. "Not found" is not
/// an error — the configured default always applies. The only failure is
/// a matched rule with a negative stored value ([`PressworkError::RuleCorrupt`]),
/// which aborts the resolution rather than silently clamping.
#[derive(Debug, Clone)]
pub struct RateResolver {
    config: SettlementConfig,
}

impl RateResolver {
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Resolve the rate for a (kind, work, beneficiary) at instant `at`.
    ///
    /// Priority, first match wins:
    /// 1. `Work` scope, when a work is involved — strongest override,
    ///    applies to any beneficiary kind
    /// 2. `Author`/`Partner` scope matching the beneficiary
    /// 3. `Global` scope
    /// 4. The configured default percentage for the kind
    ///
    /// # Errors
    /// [`PressworkError::RuleCorrupt`] if the winning rule stores a
    /// negative value.
    pub fn resolve(
        &self,
        book: &RateBook,
        kind: BeneficiaryKind,
        work_id: Option<WorkId>,
        beneficiary_id: Option<BeneficiaryId>,
        at: DateTime<Utc>,
    ) -> Result<ResolvedRate> {
        let candidates = [
            work_id.map(RateScope::Work),
            beneficiary_id.map(|id| RateScope::for_beneficiary(kind, id)),
            Some(RateScope::Global),
        ];

        for scope in candidates.into_iter().flatten() {
            if let Some(rule) = book.current(scope, at) {
                if rule.value < Decimal::ZERO {
                    return Err(PressworkError::RuleCorrupt {
                        rule_id: rule.id,
                        value: rule.value,
                    });
                }
                return Ok(ResolvedRate {
                    value: rule.value,
                    kind: rule.kind,
                    source: Some(scope),
                });
            }
        }

        let default = self.config.default_rate(kind);
        tracing::debug!(%kind, %default, "no rate rule matched, using configured default");
        Ok(ResolvedRate {
            value: default,
            kind: RateKind::Percentage,
            source: None,
        })
    }
}
