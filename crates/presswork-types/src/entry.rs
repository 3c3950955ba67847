//! Settlement entry model: a single monetary claim tied to one sale and
//! one beneficiary — a royalty for an author, a rebate for a partner.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BeneficiaryId, EntryId, OrderId, RateKind, WorkId};

/// Who a settlement entry is owed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeneficiaryKind {
    /// An author, owed royalties on sales of their works.
    Author,
    /// A distribution partner, owed rebates on sales they facilitated.
    Partner,
}

impl fmt::Display for BeneficiaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author => write!(f, "AUTHOR"),
            Self::Partner => write!(f, "PARTNER"),
        }
    }
}

/// Lifecycle state of a settlement entry.
///
/// `Pending -> Approved -> Paid`, with `Cancelled` reachable from
/// `Pending` or `Approved`. `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryState {
    Pending,
    Approved,
    Paid,
    Cancelled,
}

impl EntryState {
    /// Whether the entry still counts toward a beneficiary's totals.
    #[must_use]
    pub fn counts(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Paid => write!(f, "PAID"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// The unique natural key of a settlement entry: one claim per
/// (order, work, beneficiary). Recomputation must hit this key, not
/// create a sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleKey {
    pub order_id: OrderId,
    /// `None` for order-level partner rebates not tied to a single work.
    pub work_id: Option<WorkId>,
    pub beneficiary_id: BeneficiaryId,
}

/// A monetary claim against one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub id: EntryId,
    pub beneficiary_id: BeneficiaryId,
    pub beneficiary_kind: BeneficiaryKind,
    pub work_id: Option<WorkId>,
    pub order_id: OrderId,
    /// Computed amount, always >= 0. A zero-amount sale still produces a
    /// zero-amount entry for audit completeness.
    pub amount: Decimal,
    pub rate_applied: Decimal,
    pub rate_kind: RateKind,
    pub state: EntryState,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl SettlementEntry {
    #[must_use]
    pub fn key(&self) -> SaleKey {
        SaleKey {
            order_id: self.order_id,
            work_id: self.work_id,
            beneficiary_id: self.beneficiary_id,
        }
    }
}

/// One confirmed sale line, as delivered by the order/catalog collaborator.
/// The core trusts that the order has reached a confirmed status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub order_id: OrderId,
    /// `None` for order-level amounts (partner rebates on the order total).
    pub work_id: Option<WorkId>,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl SaleLine {
    /// Total sale amount for this line.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Per-beneficiary aggregates exposed through the read API.
///
/// `pending + approved + paid` partitions the non-cancelled entries;
/// `available` is what a withdrawal request may claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BeneficiaryStats {
    /// Sum over all non-cancelled entries, whatever their state.
    pub total_generated: Decimal,
    pub total_pending: Decimal,
    pub total_approved: Decimal,
    pub total_paid: Decimal,
    /// Sum of withdrawal requests in Pending, Approved, or Paid.
    pub total_withdrawn: Decimal,
    /// `total_approved - total_withdrawn`, floored at zero.
    pub available: Decimal,
}
