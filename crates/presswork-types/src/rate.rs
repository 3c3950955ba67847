//! Rate rule model: configured royalty/rebate percentages and fixed amounts.
//!
//! Rules are scoped (work, author, partner, or global) and resolved most
//! specific first. The rule store is append-only: rules are deactivated,
//! never deleted, so historical resolutions stay reproducible.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BeneficiaryId, BeneficiaryKind, RuleId, WorkId};

/// The level at which a rate rule applies, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id")]
pub enum RateScope {
    /// A single work — strongest override, applies to any beneficiary kind.
    Work(WorkId),
    /// A single author's royalties.
    Author(BeneficiaryId),
    /// A single distribution partner's rebates.
    Partner(BeneficiaryId),
    /// The deployment-wide fallback.
    Global,
}

impl RateScope {
    /// The per-beneficiary scope for a given kind.
    #[must_use]
    pub fn for_beneficiary(kind: BeneficiaryKind, id: BeneficiaryId) -> Self {
        match kind {
            BeneficiaryKind::Author => Self::Author(id),
            BeneficiaryKind::Partner => Self::Partner(id),
        }
    }
}

impl fmt::Display for RateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work(id) => write!(f, "WORK({id})"),
            Self::Author(id) => write!(f, "AUTHOR({id})"),
            Self::Partner(id) => write!(f, "PARTNER({id})"),
            Self::Global => write!(f, "GLOBAL"),
        }
    }
}

/// How a rate's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateKind {
    /// `value` is a percentage of the sale amount, in [0, 100].
    Percentage,
    /// `value` is a currency amount.
    Fixed,
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage => write!(f, "PERCENTAGE"),
            Self::Fixed => write!(f, "FIXED"),
        }
    }
}

/// A configured rate rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRule {
    pub id: RuleId,
    pub scope: RateScope,
    pub kind: RateKind,
    /// Non-negative; a negative stored value is data corruption and aborts
    /// resolution with `RuleCorrupt`.
    pub value: Decimal,
    /// Inclusive start of the validity window. `None` = unbounded.
    pub valid_from: Option<DateTime<Utc>>,
    /// Inclusive end of the validity window. `None` = unbounded.
    pub valid_to: Option<DateTime<Utc>>,
    /// Inactive rules are never selected.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl RateRule {
    /// Create an active, unbounded rule effective immediately.
    #[must_use]
    pub fn new(scope: RateScope, kind: RateKind, value: Decimal) -> Self {
        Self {
            id: RuleId::new(),
            scope,
            kind,
            value,
            valid_from: None,
            valid_to: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Whether this rule is selectable at instant `at`: active and within
    /// its inclusive validity window.
    #[must_use]
    pub fn is_current(&self, at: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if self.valid_from.is_some_and(|from| at < from) {
            return false;
        }
        if self.valid_to.is_some_and(|to| at > to) {
            return false;
        }
        true
    }
}

/// The outcome of a rate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRate {
    pub value: Decimal,
    pub kind: RateKind,
    /// The scope the winning rule was found at, or `None` when the
    /// configured default applied.
    pub source: Option<RateScope>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn unbounded_rule_is_always_current() {
        let rule = RateRule::new(RateScope::Global, RateKind::Percentage, Decimal::new(15, 0));
        assert!(rule.is_current(Utc::now()));
        assert!(rule.is_current(Utc::now() + Duration::days(365)));
        assert!(rule.is_current(Utc::now() - Duration::days(365)));
    }

    #[test]
    fn inactive_rule_is_never_current() {
        let mut rule = RateRule::new(RateScope::Global, RateKind::Percentage, Decimal::new(15, 0));
        rule.active = false;
        assert!(!rule.is_current(Utc::now()));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = Utc::now();
        let mut rule = RateRule::new(RateScope::Global, RateKind::Percentage, Decimal::new(15, 0));
        rule.valid_from = Some(now);
        rule.valid_to = Some(now + Duration::days(30));

        assert!(rule.is_current(now));
        assert!(rule.is_current(now + Duration::days(30)));
        assert!(!rule.is_current(now - Duration::seconds(1)));
        assert!(!rule.is_current(now + Duration::days(31)));
    }

    #[test]
    fn half_open_windows() {
        let now = Utc::now();
        let mut from_only =
            RateRule::new(RateScope::Global, RateKind::Percentage, Decimal::new(10, 0));
        from_only.valid_from = Some(now);
        assert!(from_only.is_current(now + Duration::days(1000)));
        assert!(!from_only.is_current(now - Duration::days(1)));

        let mut to_only =
            RateRule::new(RateScope::Global, RateKind::Percentage, Decimal::new(10, 0));
        to_only.valid_to = Some(now);
        assert!(to_only.is_current(now - Duration::days(1000)));
        assert!(!to_only.is_current(now + Duration::days(1)));
    }

    #[test]
    fn scope_for_beneficiary() {
        let id = BeneficiaryId::new();
        assert_eq!(
            RateScope::for_beneficiary(BeneficiaryKind::Author, id),
            RateScope::Author(id)
        );
        assert_eq!(
            RateScope::for_beneficiary(BeneficiaryKind::Partner, id),
            RateScope::Partner(id)
        );
    }

    #[test]
    fn rate_rule_serde_roundtrip() {
        let rule = RateRule::new(
            RateScope::Work(WorkId::new()),
            RateKind::Fixed,
            Decimal::new(2_000, 0),
        );
        let json = serde_json::to_string(&rule).unwrap();
        let back: RateRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
