//! The settlement ledger: entry store, unique sale-key index, state
//! machine, and per-beneficiary aggregation.
//!
//! Every transition is guarded by a check on the entry's current state, so
//! two concurrent administrative actions cannot both apply — the second
//! observes the already-transitioned state and fails with `InvalidEntryState`.
//! Notification delivery is best-effort: a failed delivery is logged and
//! never rolls back the transition.

use std::collections::HashMap;

use chrono::Utc;
use presswork_types::{
    BeneficiaryId, EntryId, EntryState, Notification, NotificationKind, Notifier, PressworkError,
    Result, SaleKey, SettlementEntry,
};
use rust_decimal::Decimal;
use serde_json::json;

/// Outcome of admitting a computed entry into the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The entry was new and is now persisted as `Pending`.
    Created(EntryId),
    /// An entry with the same sale key already existed; nothing was written.
    Existing(EntryId),
}

/// Per-beneficiary partition of non-cancelled entry amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub pending: Decimal,
    pub approved: Decimal,
    pub paid: Decimal,
}

impl LedgerTotals {
    /// Sum of all non-cancelled entries — everything ever generated.
    #[must_use]
    pub fn generated(&self) -> Decimal {
        self.pending + self.approved + self.paid
    }
}

/// Owns every settlement entry and its lifecycle.
#[derive(Debug, Default)]
pub struct SettlementLedger {
    entries: HashMap<EntryId, SettlementEntry>,
    /// Unique index on (order, work, beneficiary) — the idempotency key.
    by_key: HashMap<SaleKey, EntryId>,
}

impl SettlementLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-get on the unique sale key, in one operation.
    ///
    /// The loser of a concurrent double-compute observes `Existing` rather
    /// than erroring or creating a sibling row.
    pub fn admit(&mut self, entry: SettlementEntry) -> Admission {
        let key = entry.key();
        if let Some(&existing) = self.by_key.get(&key) {
            return Admission::Existing(existing);
        }
        let id = entry.id;
        self.by_key.insert(key, id);
        self.entries.insert(id, entry);
        Admission::Created(id)
    }

    /// Look up an entry by ID.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&SettlementEntry> {
        self.entries.get(&id)
    }

    /// Look up an entry by its sale key.
    #[must_use]
    pub fn by_sale_key(&self, key: &SaleKey) -> Option<&SettlementEntry> {
        self.by_key.get(key).and_then(|id| self.entries.get(id))
    }

    /// All entries for a beneficiary, oldest first.
    #[must_use]
    pub fn entries_for(&self, beneficiary: BeneficiaryId) -> Vec<&SettlementEntry> {
        let mut entries: Vec<_> = self
            .entries
            .values()
            .filter(|e| e.beneficiary_id == beneficiary)
            .collect();
        entries.sort_by_key(|e| e.created_at);
        entries
    }

    /// Number of entries in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =====================================================================
    // State machine
    // =====================================================================

    /// `Pending -> Approved`. Stamps `approved_at`.
    ///
    /// # Errors
    /// [`PressworkError::InvalidEntryState`] unless the entry is `Pending`.
    pub fn approve(
        &mut self,
        id: EntryId,
        notifier: &mut dyn Notifier,
    ) -> Result<SettlementEntry> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(PressworkError::EntryNotFound(id))?;

        if entry.state != EntryState::Pending {
            return Err(PressworkError::InvalidEntryState {
                entry_id: id,
                current: entry.state,
                action: "approve",
            });
        }

        entry.state = EntryState::Approved;
        entry.approved_at = Some(Utc::now());
        let snapshot = entry.clone();

        tracing::info!(entry = %id, amount = %snapshot.amount, "settlement entry approved");
        notify_transition(notifier, &snapshot, "Règlement approuvé");
        Ok(snapshot)
    }

    /// `Approved -> Paid`, or `Pending -> Paid` for one-step "pay now"
    /// actions (stamps the implicit approval too). Stamps `paid_at`.
    ///
    /// # Errors
    /// [`PressworkError::InvalidEntryState`] if the entry is already `Paid`
    /// or `Cancelled`.
    pub fn mark_paid(
        &mut self,
        id: EntryId,
        notifier: &mut dyn Notifier,
    ) -> Result<SettlementEntry> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(PressworkError::EntryNotFound(id))?;

        match entry.state {
            EntryState::Pending => {
                // One-step pay: the approval stamp is implied.
                entry.approved_at = Some(Utc::now());
            }
            EntryState::Approved => {}
            EntryState::Paid | EntryState::Cancelled => {
                return Err(PressworkError::InvalidEntryState {
                    entry_id: id,
                    current: entry.state,
                    action: "mark_paid",
                });
            }
        }

        entry.state = EntryState::Paid;
        entry.paid_at = Some(Utc::now());
        let snapshot = entry.clone();

        tracing::info!(entry = %id, amount = %snapshot.amount, "settlement entry paid");
        notify_transition(notifier, &snapshot, "Règlement payé");
        Ok(snapshot)
    }

    /// `Pending | Approved -> Cancelled`. Paid entries are immutable.
    ///
    /// # Errors
    /// [`PressworkError::InvalidEntryState`] if the entry is `Paid` or
    /// already `Cancelled`.
    pub fn cancel(
        &mut self,
        id: EntryId,
        notifier: &mut dyn Notifier,
    ) -> Result<SettlementEntry> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(PressworkError::EntryNotFound(id))?;

        if !matches!(entry.state, EntryState::Pending | EntryState::Approved) {
            return Err(PressworkError::InvalidEntryState {
                entry_id: id,
                current: entry.state,
                action: "cancel",
            });
        }

        entry.state = EntryState::Cancelled;
        let snapshot = entry.clone();

        tracing::info!(entry = %id, "settlement entry cancelled");
        notify_transition(notifier, &snapshot, "Règlement annulé");
        Ok(snapshot)
    }

    // =====================================================================
    // Aggregation
    // =====================================================================

    /// Partition a beneficiary's non-cancelled entries into
    /// pending/approved/paid sums. No entry is counted twice.
    #[must_use]
    pub fn totals(&self, beneficiary: BeneficiaryId) -> LedgerTotals {
        let mut totals = LedgerTotals::default();
        for entry in self.entries.values() {
            if entry.beneficiary_id != beneficiary {
                continue;
            }
            match entry.state {
                EntryState::Pending => totals.pending += entry.amount,
                EntryState::Approved => totals.approved += entry.amount,
                EntryState::Paid => totals.paid += entry.amount,
                EntryState::Cancelled => {}
            }
        }
        totals
    }

    /// Mark the beneficiary's oldest approved entries as paid, whole
    /// entries only, until the next one no longer fits within `amount`.
    /// Returns the IDs marked paid.
    ///
    /// This is the FIFO allocation applied when a withdrawal is paid out:
    /// cash actually leaving the house shrinks `approved` oldest-first.
    /// Individual entry notifications are skipped; the withdrawal-level
    /// notification covers the payout.
    pub fn allocate_paid(&mut self, beneficiary: BeneficiaryId, amount: Decimal) -> Vec<EntryId> {
        let mut approved: Vec<(EntryId, Decimal)> = self
            .entries
            .values()
            .filter(|e| e.beneficiary_id == beneficiary && e.state == EntryState::Approved)
            .map(|e| (e.id, e.amount))
            .collect();
        approved.sort_by_key(|&(id, _)| self.entries[&id].created_at);

        let mut remaining = amount;
        let mut allocated = Vec::new();
        for (id, entry_amount) in approved {
            if entry_amount > remaining {
                break;
            }
            remaining -= entry_amount;
            allocated.push(id);
        }

        let now = Utc::now();
        for id in &allocated {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.state = EntryState::Paid;
                entry.paid_at = Some(now);
            }
        }
        if !allocated.is_empty() {
            tracing::info!(
                %beneficiary,
                entries = allocated.len(),
                "allocated withdrawal payout over approved entries"
            );
        }
        allocated
    }
}

/// Best-effort notification of a state change. Failure is logged, never
/// propagated: ledger consistency outranks delivery.
fn notify_transition(notifier: &mut dyn Notifier, entry: &SettlementEntry, title: &str) {
    let notification = Notification {
        recipient: entry.beneficiary_id,
        kind: NotificationKind::SettlementUpdate,
        title: title.to_string(),
        message: format!("{title}: {} ({})", entry.amount, entry.beneficiary_kind),
        data: json!({
            "entryId": entry.id.to_string(),
            "orderId": entry.order_id.to_string(),
            "state": entry.state,
        }),
    };
    if let Err(reason) = notifier.deliver(notification) {
        tracing::warn!(entry = %entry.id, %reason, "notification delivery failed");
    }
}
