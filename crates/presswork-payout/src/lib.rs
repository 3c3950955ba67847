//! # presswork-payout
//!
//! Withdrawal requests and balance arithmetic for the Presswork
//! settlement core, plus the payout-provider webhook boundary.
//!
//! ## Balance model
//!
//! A beneficiary's **available balance** is their approved-but-unpaid
//! settlement total minus every withdrawal request still claiming funds
//! (pending, approved, or paid), floored at zero. A withdrawal request is
//! validated against that balance inside the same unit of work that
//! records it, so two racing requests cannot jointly overdraw.
//!
//! ## Payout flow
//!
//! `Pending -> Approved` (administrator) `-> Paid` (payout confirmation,
//! which FIFO-allocates the cash over the oldest approved settlement
//! entries) or `-> Failed`. Rejection is terminal from `Pending`.

pub mod book;
pub mod service;
pub mod webhook;

pub use book::WithdrawalBook;
pub use service::PayoutService;
pub use webhook::{PayoutEvent, PayoutEventKind, WebhookHandler};
