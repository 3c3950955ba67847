//! The withdrawal & balance service.
//!
//! Validates withdrawal requests against the beneficiary's available
//! balance, drives the administrative transitions, and — on payout — FIFO
//! allocates the cash over the beneficiary's oldest approved settlement
//! entries so `total_approved` shrinks in step with money actually paid.

use presswork_ledger::SettlementLedger;
use presswork_types::{
    BeneficiaryId, BeneficiaryStats, Notification, NotificationKind, Notifier, PayoutMethod,
    PressworkError, Result, SettlementConfig, WithdrawalId, WithdrawalRequest, WithdrawalState,
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::book::WithdrawalBook;

/// Withdrawal validation, balance arithmetic, and payout transitions.
#[derive(Debug, Default)]
pub struct PayoutService {
    config: SettlementConfig,
    book: WithdrawalBook,
}

impl PayoutService {
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            config,
            book: WithdrawalBook::new(),
        }
    }

    /// Read access to the stored requests.
    #[must_use]
    pub fn book(&self) -> &WithdrawalBook {
        &self.book
    }

    /// `total_approved − Σ(claiming withdrawals)`, floored at zero.
    ///
    /// Never negative and never more than the approved total.
    #[must_use]
    pub fn available_balance(
        &self,
        ledger: &SettlementLedger,
        beneficiary: BeneficiaryId,
    ) -> Decimal {
        let approved = ledger.totals(beneficiary).approved;
        let claimed = self.book.claimed_total(beneficiary);
        (approved - claimed).max(Decimal::ZERO)
    }

    /// The per-beneficiary statement for the read API.
    #[must_use]
    pub fn stats(&self, ledger: &SettlementLedger, beneficiary: BeneficiaryId) -> BeneficiaryStats {
        let totals = ledger.totals(beneficiary);
        BeneficiaryStats {
            total_generated: totals.generated(),
            total_pending: totals.pending,
            total_approved: totals.approved,
            total_paid: totals.paid,
            total_withdrawn: self.book.claimed_total(beneficiary),
            available: self.available_balance(ledger, beneficiary),
        }
    }

    /// Validate and record a withdrawal request.
    ///
    /// Checks run in order, first failure wins:
    /// 1. amount > 0 (`InvalidAmount`)
    /// 2. amount ≥ configured minimum (`BelowMinimum`)
    /// 3. amount ≤ available balance (`InsufficientBalance`)
    ///
    /// Deployments with `single_pending_withdrawal` set additionally
    /// refuse a request while another is pending (`WithdrawalPending`),
    /// checked between the minimum and the balance.
    ///
    /// The balance is re-read here, in the same unit of work that records
    /// the request — a racing request sees this one's claim.
    pub fn request_withdrawal(
        &mut self,
        ledger: &SettlementLedger,
        beneficiary: BeneficiaryId,
        amount: Decimal,
        method: PayoutMethod,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        if amount <= Decimal::ZERO {
            return Err(PressworkError::InvalidAmount { amount });
        }
        if amount < self.config.min_withdrawal {
            return Err(PressworkError::BelowMinimum {
                requested: amount,
                minimum: self.config.min_withdrawal,
            });
        }
        if let Some(pending) = self
            .book
            .pending_for(beneficiary)
            .filter(|_| self.config.single_pending_withdrawal)
        {
            return Err(PressworkError::WithdrawalPending(pending.id));
        }
        let available = self.available_balance(ledger, beneficiary);
        if amount > available {
            return Err(PressworkError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let request = WithdrawalRequest::new(beneficiary, amount, method);
        let snapshot = request.clone();
        self.book.insert(request);

        tracing::info!(withdrawal = %snapshot.id, %amount, "withdrawal requested");
        self.notify(
            notifier,
            &snapshot,
            NotificationKind::WithdrawalRequest,
            "Nouvelle demande de retrait",
        );
        Ok(snapshot)
    }

    /// Administrator approval: `Pending -> Approved`.
    pub fn approve(
        &mut self,
        id: WithdrawalId,
        notes: Option<String>,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        let request = self
            .book
            .transition(id, WithdrawalState::Pending, "approve", |r| {
                r.state = WithdrawalState::Approved;
                r.notes = notes;
            })?;
        tracing::info!(withdrawal = %id, "withdrawal approved");
        self.notify(
            notifier,
            &request,
            NotificationKind::WithdrawalUpdate,
            "Retrait approuvé",
        );
        Ok(request)
    }

    /// Administrator rejection: `Pending -> Rejected`, with a reason.
    pub fn reject(
        &mut self,
        id: WithdrawalId,
        reason: String,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        let request = self
            .book
            .transition(id, WithdrawalState::Pending, "reject", |r| {
                r.state = WithdrawalState::Rejected;
                r.rejection_reason = Some(reason);
            })?;
        tracing::info!(withdrawal = %id, "withdrawal rejected");
        self.notify(
            notifier,
            &request,
            NotificationKind::WithdrawalUpdate,
            "Retrait rejeté",
        );
        Ok(request)
    }

    /// Payout confirmed: `Approved -> Paid`.
    ///
    /// FIFO-allocates the withdrawn amount over the beneficiary's oldest
    /// approved settlement entries (whole entries only), so the approved
    /// total shrinks in step with the cash that left.
    pub fn confirm_payout_success(
        &mut self,
        ledger: &mut SettlementLedger,
        id: WithdrawalId,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        let request = self
            .book
            .transition(id, WithdrawalState::Approved, "mark_paid", |r| {
                r.state = WithdrawalState::Paid;
                r.paid_at = Some(chrono::Utc::now());
            })?;

        let allocated = ledger.allocate_paid(request.beneficiary_id, request.amount);
        tracing::info!(
            withdrawal = %id,
            amount = %request.amount,
            entries_paid = allocated.len(),
            "withdrawal paid out"
        );
        self.notify(
            notifier,
            &request,
            NotificationKind::WithdrawalUpdate,
            "Retrait payé",
        );
        Ok(request)
    }

    /// Payout failed at the provider: `Approved -> Failed`. The claim is
    /// released; the beneficiary may request again.
    pub fn confirm_payout_failure(
        &mut self,
        id: WithdrawalId,
        reason: String,
        notifier: &mut dyn Notifier,
    ) -> Result<WithdrawalRequest> {
        let request = self
            .book
            .transition(id, WithdrawalState::Approved, "fail", |r| {
                r.state = WithdrawalState::Failed;
                r.rejection_reason = Some(reason);
            })?;
        tracing::warn!(withdrawal = %id, "payout failed at provider");
        self.notify(
            notifier,
            &request,
            NotificationKind::WithdrawalUpdate,
            "Échec du paiement du retrait",
        );
        Ok(request)
    }

    /// Best-effort notification; failure is logged, never propagated.
    fn notify(
        &self,
        notifier: &mut dyn Notifier,
        request: &WithdrawalRequest,
        kind: NotificationKind,
        title: &str,
    ) {
        let notification = Notification {
            recipient: request.beneficiary_id,
            kind,
            title: title.to_string(),
            message: format!("{title}: {} ({})", request.amount, request.method),
            data: json!({
                "withdrawalId": request.id.to_string(),
                "state": request.state,
            }),
        };
        if let Err(reason) = notifier.deliver(notification) {
            tracing::warn!(withdrawal = %request.id, %reason, "notification delivery failed");
        }
    }
}
