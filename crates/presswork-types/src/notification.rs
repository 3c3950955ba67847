//! Beneficiary-facing notification payloads and the delivery seam.
//!
//! Delivery is an external collaborator (email/SMS/in-app). From the
//! core's perspective it is strictly best-effort: a failed delivery is
//! logged and swallowed, never allowed to roll back a financial
//! transition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BeneficiaryId;

/// What a notification is about, for routing on the delivery side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    SettlementUpdate,
    WithdrawalRequest,
    WithdrawalUpdate,
}

/// A (recipient, title, message, structured payload) tuple handed to the
/// notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: BeneficiaryId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Structured payload for the delivery side (entry/withdrawal IDs etc.).
    pub data: Value,
}

/// Delivery seam implemented by the notification collaborator.
///
/// Implementations may fail; callers in this core always treat failure as
/// non-fatal.
pub trait Notifier {
    /// Hand a notification to the delivery side.
    fn deliver(&mut self, notification: Notification) -> std::result::Result<(), String>;
}

/// A notifier that drops everything. Default wiring for deployments where
/// delivery is handled out-of-band, and for tests that don't care.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn deliver(&mut self, _notification: Notification) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Captures notifications in memory. Test double.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub delivered: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn deliver(&mut self, notification: Notification) -> std::result::Result<(), String> {
        self.delivered.push(notification);
        Ok(())
    }
}
