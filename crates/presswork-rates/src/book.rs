//! Append-only store of configured rate rules.
//!
//! Rules are created and deactivated by the administrator, never deleted,
//! so a resolution replayed at a historical instant sees the same rules
//! it saw originally.

use chrono::{DateTime, Utc};
use presswork_types::{RateRule, RateScope, RuleId};

/// Owns every configured [`RateRule`].
///
/// Lookup is by scope; within a scope the *most recently created* rule
/// that is active and valid at the queried instant wins, insertion order
/// breaking creation-time ties.
#[derive(Debug, Default)]
pub struct RateBook {
    /// All rules ever configured, in insertion order.
    rules: Vec<RateRule>,
}

impl RateBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule. Returns its ID.
    pub fn insert(&mut self, rule: RateRule) -> RuleId {
        let id = rule.id;
        self.rules.push(rule);
        id
    }

    /// Soft-deactivate a rule. Returns `false` if the ID is unknown.
    /// Deactivation is the only mutation; historical fields stay intact.
    pub fn deactivate(&mut self, id: RuleId) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.active = false;
                true
            }
            None => false,
        }
    }

    /// The current rule for `scope` at instant `at`, if any.
    ///
    /// The most recently created matching rule wins; `max_by_key` keeps
    /// the last maximal element, so for equal `created_at` the later
    /// insertion wins (creation-order tiebreak).
    #[must_use]
    pub fn current(&self, scope: RateScope, at: DateTime<Utc>) -> Option<&RateRule> {
        self.rules
            .iter()
            .filter(|r| r.scope == scope && r.is_current(at))
            .max_by_key(|r| r.created_at)
    }

    /// All rules, active and inactive, for the administrative listing.
    #[must_use]
    pub fn all(&self) -> &[RateRule] {
        &self.rules
    }

    /// Number of rules ever configured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules have been configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
