//! # presswork-types
//!
//! Shared types, errors, and configuration for the **Presswork**
//! royalty & rebate settlement core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RuleId`], [`EntryId`], [`WorkId`], [`OrderId`], [`BeneficiaryId`], [`WithdrawalId`]
//! - **Rate model**: [`RateRule`], [`RateScope`], [`RateKind`]
//! - **Settlement model**: [`SettlementEntry`], [`EntryState`], [`BeneficiaryKind`], [`SaleLine`]
//! - **Withdrawal model**: [`WithdrawalRequest`], [`WithdrawalState`], [`PayoutMethod`]
//! - **Balance model**: [`BeneficiaryStats`]
//! - **Notifications**: [`Notification`], the [`Notifier`] seam
//! - **Configuration**: [`SettlementConfig`]
//! - **Errors**: [`PressworkError`] with `PW_ERR_` prefix codes
//! - **Money**: minor-unit rounding helpers in [`money`]

pub mod config;
pub mod entry;
pub mod error;
pub mod ids;
pub mod money;
pub mod notification;
pub mod rate;
pub mod withdrawal;

// Re-export all primary types at crate root for ergonomic imports:
//   use presswork_types::{SettlementEntry, RateRule, WithdrawalRequest, ...};

pub use config::*;
pub use entry::*;
pub use error::*;
pub use ids::*;
pub use notification::*;
pub use rate::*;
pub use withdrawal::*;

// Money helpers are accessed via `presswork_types::money::round_minor`
// (not re-exported to avoid name collisions).
