//! The settlement calculator: turns a confirmed sale line into a
//! royalty/rebate entry.
//!
//! The caller (the order collaborator's confirmation hook, or the
//! administrative recompute endpoint) guarantees the order is a confirmed
//! sale; the calculator trusts that boundary and only computes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use presswork_rates::{RateBook, RateResolver};
use presswork_types::{
    money, BeneficiaryId, BeneficiaryKind, EntryId, EntryState, RateKind, Result, SaleLine,
    SettlementConfig, SettlementEntry, WorkId,
};
use rust_decimal::Decimal;

use crate::ledger::{Admission, SettlementLedger};

/// A royalty override configured directly on a work's record — the fast
/// path that bypasses the general rate hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkOverride {
    pub rate: Decimal,
    pub kind: RateKind,
}

/// Per-work royalty overrides, mirrored from the catalog collaborator.
#[derive(Debug, Default)]
pub struct WorkTerms {
    overrides: HashMap<WorkId, WorkOverride>,
}

impl WorkTerms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a work's royalty override.
    pub fn set(&mut self, work_id: WorkId, rate: Decimal, kind: RateKind) {
        self.overrides.insert(work_id, WorkOverride { rate, kind });
    }

    /// The override for a work, if one is configured with a positive rate.
    /// Zero or unset means "use the hierarchy".
    #[must_use]
    pub fn get(&self, work_id: WorkId) -> Option<WorkOverride> {
        self.overrides
            .get(&work_id)
            .copied()
            .filter(|o| o.rate > Decimal::ZERO)
    }
}

/// Outcome of a settlement computation.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed {
    /// A new entry was created in `Pending`.
    Created(SettlementEntry),
    /// This sale was already settled for this beneficiary; the existing
    /// entry is returned unchanged. Not a failure.
    Existing(SettlementEntry),
}

impl Computed {
    /// The entry, whether freshly created or pre-existing.
    #[must_use]
    pub fn entry(&self) -> &SettlementEntry {
        match self {
            Self::Created(e) | Self::Existing(e) => e,
        }
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Computes settlement entries for confirmed sales.
#[derive(Debug, Clone)]
pub struct SettlementCalculator {
    resolver: RateResolver,
}

impl SettlementCalculator {
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            resolver: RateResolver::new(config),
        }
    }

    fn config(&self) -> &SettlementConfig {
        self.resolver.config()
    }

    /// Compute and admit the settlement entry for one sale line and one
    /// beneficiary.
    ///
    /// Idempotent per (order, work, beneficiary): recomputing the same
    /// sale returns the existing entry unchanged, never a duplicate.
    /// A zero-amount sale still produces a zero-amount entry.
    ///
    /// # Errors
    /// [`presswork_types::PressworkError::RuleCorrupt`] if the matched
    /// rate rule stores a negative value — the computation aborts rather
    /// than mis-pay.
    pub fn compute(
        &self,
        book: &RateBook,
        terms: &WorkTerms,
        ledger: &mut SettlementLedger,
        sale: &SaleLine,
        beneficiary_id: BeneficiaryId,
        beneficiary_kind: BeneficiaryKind,
        at: DateTime<Utc>,
    ) -> Result<Computed> {
        // Idempotency first: an existing entry short-circuits before any
        // rate work, so a replayed order confirmation is a cheap no-op.
        let key = presswork_types::SaleKey {
            order_id: sale.order_id,
            work_id: sale.work_id,
            beneficiary_id,
        };
        if let Some(existing) = ledger.by_sale_key(&key) {
            return Ok(Computed::Existing(existing.clone()));
        }

        // Work-level override fast path (author royalty terms on the
        // catalog record), else the general hierarchy.
        let (rate, rate_kind) = match sale
            .work_id
            .filter(|_| beneficiary_kind == BeneficiaryKind::Author)
            .and_then(|work| terms.get(work))
        {
            Some(o) => (o.rate, o.kind),
            None => {
                let resolved = self.resolver.resolve(
                    book,
                    beneficiary_kind,
                    sale.work_id,
                    Some(beneficiary_id),
                    at,
                )?;
                (resolved.value, resolved.kind)
            }
        };

        let sale_amount = sale.amount();
        let amount = match rate_kind {
            RateKind::Percentage => {
                money::apply_percentage(sale_amount, rate, self.config().minor_unit_scale)
            }
            // Fixed rebates are discount-style and must not exceed the
            // sale; fixed royalties are contractual and uncapped.
            RateKind::Fixed => match beneficiary_kind {
                BeneficiaryKind::Partner => rate.min(sale_amount),
                BeneficiaryKind::Author => rate,
            },
        };

        let entry = SettlementEntry {
            id: EntryId::new(),
            beneficiary_id,
            beneficiary_kind,
            work_id: sale.work_id,
            order_id: sale.order_id,
            amount,
            rate_applied: rate,
            rate_kind,
            state: EntryState::Pending,
            created_at: Utc::now(),
            approved_at: None,
            paid_at: None,
        };

        match ledger.admit(entry.clone()) {
            Admission::Created(_) => Ok(Computed::Created(entry)),
            // A concurrent compute won the insert; return its entry.
            Admission::Existing(id) => Ok(Computed::Existing(
                ledger
                    .entry(id)
                    .expect("admitted entry must exist")
                    .clone(),
            )),
        }
    }
}
