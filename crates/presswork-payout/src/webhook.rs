//! The payout-provider webhook boundary.
//!
//! The provider reports `payout.successful` / `payout.failed` for a
//! withdrawal reference. Events are authenticated with a shared-secret
//! SHA-256 digest before anything is trusted, then dispatched to the
//! [`PayoutService`] confirmation entry points.

use presswork_ledger::SettlementLedger;
use presswork_types::{Notifier, PressworkError, Result, WithdrawalId, WithdrawalRequest};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::service::PayoutService;

/// Outcome reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutEventKind {
    #[serde(rename = "payout.successful")]
    Successful,
    #[serde(rename = "payout.failed")]
    Failed,
}

/// An inbound payout event, after signature verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutEvent {
    pub event: PayoutEventKind,
    /// The provider's own payout reference, kept for reconciliation.
    pub payout_id: String,
    /// Our withdrawal the payout was executed for.
    pub withdrawal_id: WithdrawalId,
    /// Failure reason, present on `payout.failed`.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Verifies and dispatches inbound payout events.
#[derive(Debug, Clone)]
pub struct WebhookHandler {
    secret: Vec<u8>,
}

impl WebhookHandler {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check the shared-secret digest over the raw body.
    ///
    /// The comparison runs over every byte regardless of where a mismatch
    /// occurs, so timing leaks nothing about the expected digest.
    ///
    /// # Errors
    /// [`PressworkError::InvalidSignature`] on mismatch or malformed hex.
    pub fn verify(&self, body: &[u8], signature_hex: &str) -> Result<()> {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(body);
        let expected = hasher.finalize();

        let provided = hex::decode(signature_hex).map_err(|_| PressworkError::InvalidSignature)?;
        if provided.len() != expected.len() {
            return Err(PressworkError::InvalidSignature);
        }
        let diff = provided
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff == 0 {
            Ok(())
        } else {
            Err(PressworkError::InvalidSignature)
        }
    }

    /// Verify, parse, and apply an inbound event.
    ///
    /// Returns the withdrawal as updated. An unknown withdrawal surfaces
    /// `WithdrawalNotFound`; a duplicate delivery hits the expected-state
    /// guard (`InvalidWithdrawalState`) and changes nothing.
    pub fn handle(
        &self,
        body: &[u8],
        signature_hex: &str,
        service: &mut PayoutService,
        ledger: &mut SettlementLedger,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        self.verify(body, signature_hex)?;

        let event: PayoutEvent =
            serde_json::from_slice(body).map_err(|e| PressworkError::InvalidPayoutEvent {
                reason: e.to_string(),
            })?;

        tracing::info!(
            withdrawal = %event.withdrawal_id,
            payout = %event.payout_id,
            event = ?event.event,
            "payout event received"
        );

        match event.event {
            PayoutEventKind::Successful => {
                service.confirm_payout_success(ledger, event.withdrawal_id, notifier)
            }
            PayoutEventKind::Failed => service.confirm_payout_failure(
                event.withdrawal_id,
                event
                    .reason
                    .unwrap_or_else(|| "provider reported failure".to_string()),
                notifier,
            ),
        }
    }

    /// Sign a body the way the provider does. Test and tooling helper.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(body);
        hex::encode(hasher.finalize())
    }
}
