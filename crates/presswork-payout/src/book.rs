//! Store of withdrawal requests with expected-state transition guards.

use std::collections::HashMap;

use chrono::Utc;
use presswork_types::{
    BeneficiaryId, PressworkError, Result, WithdrawalId, WithdrawalRequest, WithdrawalState,
};
use rust_decimal::Decimal;

/// Owns every withdrawal request.
#[derive(Debug, Default)]
pub struct WithdrawalBook {
    requests: HashMap<WithdrawalId, WithdrawalRequest>,
}

impl WithdrawalBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request.
    pub fn insert(&mut self, request: WithdrawalRequest) -> WithdrawalId {
        let id = request.id;
        self.requests.insert(id, request);
        id
    }

    /// Look up a request by ID.
    #[must_use]
    pub fn get(&self, id: WithdrawalId) -> Option<&WithdrawalRequest> {
        self.requests.get(&id)
    }

    /// All requests for a beneficiary, most recent first.
    #[must_use]
    pub fn for_beneficiary(&self, beneficiary: BeneficiaryId) -> Vec<&WithdrawalRequest> {
        let mut requests: Vec<_> = self
            .requests
            .values()
            .filter(|r| r.beneficiary_id == beneficiary)
            .collect();
        requests.sort_by_key(|r| std::cmp::Reverse(r.requested_at));
        requests
    }

    /// The beneficiary's pending request, if one exists. At most one
    /// pending request per beneficiary is admitted by the service.
    #[must_use]
    pub fn pending_for(&self, beneficiary: BeneficiaryId) -> Option<&WithdrawalRequest> {
        self.requests
            .values()
            .find(|r| r.beneficiary_id == beneficiary && r.state == WithdrawalState::Pending)
    }

    /// Sum of the beneficiary's requests still claiming balance
    /// (pending, approved, or paid).
    #[must_use]
    pub fn claimed_total(&self, beneficiary: BeneficiaryId) -> Decimal {
        self.requests
            .values()
            .filter(|r| r.beneficiary_id == beneficiary && r.state.claims_balance())
            .map(|r| r.amount)
            .sum()
    }

    /// Transition a request, guarded on its current state.
    ///
    /// `mutate` is only applied when the current state equals `expected`;
    /// otherwise nothing changes and the caller gets `InvalidWithdrawalState`.
    pub(crate) fn transition(
        &mut self,
        id: WithdrawalId,
        expected: WithdrawalState,
        action: &'static str,
        mutate: impl FnOnce(&mut WithdrawalRequest),
    ) -> Result<WithdrawalRequest> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(PressworkError::WithdrawalNotFound(id))?;

        if request.state != expected {
            return Err(PressworkError::InvalidWithdrawalState {
                withdrawal_id: id,
                current: request.state,
                action,
            });
        }

        mutate(request);
        request.validated_at.get_or_insert_with(Utc::now);
        Ok(request.clone())
    }
}
