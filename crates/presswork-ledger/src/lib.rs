//! # presswork-ledger
//!
//! The settlement heart of Presswork: computing royalty/rebate entries for
//! confirmed sales and walking them through the approval/payment state
//! machine.
//!
//! ## Flow
//!
//! 1. A confirmed sale line arrives from the order collaborator.
//! 2. [`SettlementCalculator`] resolves the applicable rate (work-terms
//!    fast path, then the rate hierarchy) and admits a `Pending` entry —
//!    idempotently: one entry per (order, work, beneficiary), ever.
//! 3. [`SettlementLedger`] owns the entries and their transitions:
//!    `Pending -> Approved -> Paid`, with `Cancelled` reachable until
//!    payment. Paid entries are immutable.
//! 4. Per-beneficiary totals partition the non-cancelled entries into
//!    pending/approved/paid with no double counting.

pub mod calculator;
pub mod ledger;

pub use calculator::{Computed, SettlementCalculator, WorkOverride, WorkTerms};
pub use ledger::{Admission, LedgerTotals, SettlementLedger};
