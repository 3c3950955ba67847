//! End-to-end integration tests across the settlement core.
//!
//! These exercise the full money path:
//! confirmed sale -> calculator (rate hierarchy) -> ledger entry ->
//! approval -> withdrawal request -> payout webhook -> FIFO allocation.

use chrono::Utc;
use presswork_ledger::{Computed, SettlementCalculator, SettlementLedger, WorkTerms};
use presswork_payout::{PayoutService, WebhookHandler};
use presswork_rates::RateBook;
use presswork_types::{
    BeneficiaryId, BeneficiaryKind, EntryState, OrderId, PayoutMethod, RateKind, RateRule,
    RateScope, RecordingNotifier, SaleLine, SettlementConfig, WithdrawalState, WorkId,
};
use rust_decimal::Decimal;
use serde_json::json;

/// Helper: the whole settlement stack wired together.
struct Backoffice {
    book: RateBook,
    terms: WorkTerms,
    calculator: SettlementCalculator,
    ledger: SettlementLedger,
    payout: PayoutService,
    notifier: RecordingNotifier,
}

impl Backoffice {
    fn new() -> Self {
        let config = SettlementConfig::default();
        Self {
            book: RateBook::new(),
            terms: WorkTerms::new(),
            calculator: SettlementCalculator::new(config.clone()),
            ledger: SettlementLedger::new(),
            payout: PayoutService::new(config),
            notifier: RecordingNotifier::default(),
        }
    }

    fn sell(
        &mut self,
        work: Option<WorkId>,
        beneficiary: BeneficiaryId,
        kind: BeneficiaryKind,
        unit_price: i64,
        quantity: u32,
    ) -> Computed {
        let sale = SaleLine {
            order_id: OrderId::new(),
            work_id: work,
            unit_price: Decimal::new(unit_price, 0),
            quantity,
        };
        self.calculator
            .compute(
                &self.book,
                &self.terms,
                &mut self.ledger,
                &sale,
                beneficiary,
                kind,
                Utc::now(),
            )
            .expect("computation should succeed")
    }
}

#[test]
fn full_royalty_cycle_sale_to_payout() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();
    let work = WorkId::new();

    office.book.insert(RateRule::new(
        RateScope::Global,
        RateKind::Percentage,
        Decimal::new(15, 0),
    ));

    // Three sales of 20,000 -> three 3,000 royalties. The 9,000 total
    // clears the default 5,000 withdrawal minimum.
    let mut entry_ids = Vec::new();
    for _ in 0..3 {
        let computed = office.sell(Some(work), author, BeneficiaryKind::Author, 20_000, 1);
        assert!(computed.is_created());
        assert_eq!(computed.entry().amount, Decimal::new(3_000, 0));
        entry_ids.push(computed.entry().id);
    }

    // Approve all three.
    for &id in &entry_ids {
        office.ledger.approve(id, &mut office.notifier).unwrap();
    }
    assert_eq!(
        office.payout.available_balance(&office.ledger, author),
        Decimal::new(9_000, 0)
    );

    // The author cashes out everything.
    let request = office
        .payout
        .request_withdrawal(
            &office.ledger,
            author,
            Decimal::new(9_000, 0),
            PayoutMethod::MobileMoney {
                number: "074123456".into(),
            },
            &mut office.notifier,
        )
        .unwrap();
    office
        .payout
        .approve(request.id, None, &mut office.notifier)
        .unwrap();

    // Provider confirms via webhook.
    let handler = WebhookHandler::new(b"shared-secret".to_vec());
    let body = serde_json::to_vec(&json!({
        "event": "payout.successful",
        "payout_id": "pay_e2e_1",
        "withdrawal_id": request.id.0,
    }))
    .unwrap();
    let signature = handler.sign(&body);
    let updated = handler
        .handle(
            &body,
            &signature,
            &mut office.payout,
            &mut office.ledger,
            &mut office.notifier,
        )
        .unwrap();
    assert_eq!(updated.state, WithdrawalState::Paid);

    // All three entries were FIFO-allocated to the payout.
    for &id in &entry_ids {
        assert_eq!(office.ledger.entry(id).unwrap().state, EntryState::Paid);
    }
    let stats = office.payout.stats(&office.ledger, author);
    assert_eq!(stats.total_paid, Decimal::new(9_000, 0));
    assert_eq!(stats.total_approved, Decimal::ZERO);
    assert_eq!(stats.available, Decimal::ZERO);

    // Every transition talked to the notification collaborator.
    assert!(!office.notifier.delivered.is_empty());
}

#[test]
fn replayed_order_confirmation_is_a_no_op() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();
    let work = WorkId::new();
    let sale = SaleLine {
        order_id: OrderId::new(),
        work_id: Some(work),
        unit_price: Decimal::new(10_000, 0),
        quantity: 1,
    };

    let first = office
        .calculator
        .compute(
            &office.book,
            &office.terms,
            &mut office.ledger,
            &sale,
            author,
            BeneficiaryKind::Author,
            Utc::now(),
        )
        .unwrap();
    let replay = office
        .calculator
        .compute(
            &office.book,
            &office.terms,
            &mut office.ledger,
            &sale,
            author,
            BeneficiaryKind::Author,
            Utc::now(),
        )
        .unwrap();

    assert!(first.is_created());
    assert!(!replay.is_created());
    assert_eq!(replay.entry().id, first.entry().id);
    assert_eq!(office.ledger.len(), 1);
}

#[test]
fn partner_rebate_on_order_total_alongside_author_royalty() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();
    let partner = BeneficiaryId::new();
    let work = WorkId::new();
    let order = OrderId::new();

    // Author royalty on the work line, partner rebate on the order total.
    let line = SaleLine {
        order_id: order,
        work_id: Some(work),
        unit_price: Decimal::new(10_000, 0),
        quantity: 1,
    };
    let order_total = SaleLine {
        order_id: order,
        work_id: None,
        unit_price: Decimal::new(10_000, 0),
        quantity: 1,
    };

    let royalty = office
        .calculator
        .compute(
            &office.book,
            &office.terms,
            &mut office.ledger,
            &line,
            author,
            BeneficiaryKind::Author,
            Utc::now(),
        )
        .unwrap();
    let rebate = office
        .calculator
        .compute(
            &office.book,
            &office.terms,
            &mut office.ledger,
            &order_total,
            partner,
            BeneficiaryKind::Partner,
            Utc::now(),
        )
        .unwrap();

    // Defaults: 15% author, 10% partner.
    assert_eq!(royalty.entry().amount, Decimal::new(1_500, 0));
    assert_eq!(rebate.entry().amount, Decimal::new(1_000, 0));
    assert_eq!(office.ledger.len(), 2);

    // Balances are isolated per beneficiary.
    assert_eq!(
        office.payout.stats(&office.ledger, author).total_pending,
        Decimal::new(1_500, 0)
    );
    assert_eq!(
        office.payout.stats(&office.ledger, partner).total_pending,
        Decimal::new(1_000, 0)
    );
}

#[test]
fn work_override_wins_end_to_end() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();
    let work = WorkId::new();

    office.book.insert(RateRule::new(
        RateScope::Global,
        RateKind::Percentage,
        Decimal::new(15, 0),
    ));
    office.book.insert(RateRule::new(
        RateScope::Work(work),
        RateKind::Fixed,
        Decimal::new(2_000, 0),
    ));

    let computed = office.sell(Some(work), author, BeneficiaryKind::Author, 10_000, 1);
    assert_eq!(computed.entry().amount, Decimal::new(2_000, 0));

    // A different work still gets the global 15%.
    let other = office.sell(
        Some(WorkId::new()),
        author,
        BeneficiaryKind::Author,
        10_000,
        1,
    );
    assert_eq!(other.entry().amount, Decimal::new(1_500, 0));
}

#[test]
fn cancelled_entry_never_funds_a_withdrawal() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();

    let computed = office.sell(Some(WorkId::new()), author, BeneficiaryKind::Author, 100_000, 1);
    let entry_id = computed.entry().id;

    office.ledger.approve(entry_id, &mut office.notifier).unwrap();
    office.ledger.cancel(entry_id, &mut office.notifier).unwrap();

    assert_eq!(
        office.payout.available_balance(&office.ledger, author),
        Decimal::ZERO
    );
    let err = office
        .payout
        .request_withdrawal(
            &office.ledger,
            author,
            Decimal::new(15_000, 0),
            PayoutMethod::Cash,
            &mut office.notifier,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        presswork_types::PressworkError::InsufficientBalance { .. }
    ));
}

#[test]
fn failed_payout_lets_the_beneficiary_retry() {
    let mut office = Backoffice::new();
    let author = BeneficiaryId::new();

    let computed = office.sell(Some(WorkId::new()), author, BeneficiaryKind::Author, 100_000, 1);
    office
        .ledger
        .approve(computed.entry().id, &mut office.notifier)
        .unwrap();

    // 15,000 royalty approved; request and approve a withdrawal.
    let request = office
        .payout
        .request_withdrawal(
            &office.ledger,
            author,
            Decimal::new(15_000, 0),
            PayoutMethod::Cash,
            &mut office.notifier,
        )
        .unwrap();
    office
        .payout
        .approve(request.id, None, &mut office.notifier)
        .unwrap();

    // Provider reports failure.
    let handler = WebhookHandler::new(b"shared-secret".to_vec());
    let body = serde_json::to_vec(&json!({
        "event": "payout.failed",
        "payout_id": "pay_e2e_2",
        "withdrawal_id": request.id.0,
        "reason": "wallet unreachable",
    }))
    .unwrap();
    let signature = handler.sign(&body);
    handler
        .handle(
            &body,
            &signature,
            &mut office.payout,
            &mut office.ledger,
            &mut office.notifier,
        )
        .unwrap();

    // No entry was allocated; the full balance is claimable again.
    assert_eq!(
        office.payout.available_balance(&office.ledger, author),
        Decimal::new(15_000, 0)
    );
    let retry = office
        .payout
        .request_withdrawal(
            &office.ledger,
            author,
            Decimal::new(15_000, 0),
            PayoutMethod::Cash,
            &mut office.notifier,
        )
        .unwrap();
    assert_eq!(retry.state, WithdrawalState::Pending);
}
