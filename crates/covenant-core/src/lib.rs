//! # Covenant Core
//!
//! The loan lifecycle engine of the Covenant peer-to-peer lending
//! protocol. Five operations make up the public surface:
//!
//! - [`LendingEngine::create_offer`]: post a standing lending offer
//! - [`LendingEngine::cancel_offer`]: withdraw an offer's remaining uses
//! - [`LendingEngine::accept_offer`]: post collateral, receive principal
//! - [`LendingEngine::repay`]: interest-first repayment allocation
//! - [`LendingEngine::liquidate`]: bonus-incentivized partial/full
//!   liquidation of undercollateralized loans
//!
//! Every operation runs synchronously against the injected ports and
//! follows the same pipeline: validate, authorize, accrue, mutate,
//! persist. Nothing is persisted until every fallible step has passed,
//! so a returned error implies zero side effects.

pub mod engine;
pub mod interest;
pub mod liquidate;
pub mod offer;
pub mod params;
pub mod repay;
pub mod request;

pub use engine::LendingEngine;
pub use liquidate::Liquidation;
pub use params::ProtocolParams;
pub use repay::Repayment;
pub use request::{
    AcceptOfferRequest, CancelOfferRequest, CreateOfferRequest, LiquidateRequest, RepayRequest,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::engine::LendingEngine;
    use crate::request::CreateOfferRequest;
    use covenant_ledger::{
        FixedClock, InMemoryStore, InMemoryTokenLedger, TokenLedger, TransactionClock,
    };
    use rust_decimal_macros::dec;

    pub type TestEngine = LendingEngine<InMemoryStore, InMemoryTokenLedger, FixedClock>;

    /// Engine over in-memory ports: alice holds 10_000 GOLD to lend,
    /// bob holds 2_000 SILVER to post as collateral.
    pub fn engine() -> TestEngine {
        let tokens = InMemoryTokenLedger::new()
            .with_balance("alice", "GOLD", dec!(10000))
            .with_balance("bob", "SILVER", dec!(2000));
        LendingEngine::new(InMemoryStore::new(), tokens, FixedClock::new(1_700_000_000))
    }

    /// Persist an already-active loan with the given balances, locking
    /// the borrower's collateral the way acceptance would have. Lets
    /// tests start from positions acceptance could not create directly
    /// (e.g. already undercollateralized ones).
    pub fn seed_loan(
        engine: &TestEngine,
        principal: rust_decimal::Decimal,
        rate_bps: u32,
        collateral: rust_decimal::Decimal,
    ) -> covenant_common::Loan {
        use covenant_common::{ClosedBy, Loan, LoanStatus};

        let now = engine.clock().now();
        let mut loan = Loan {
            seq: engine.clock().tx_seq(),
            lender: "alice".to_string(),
            borrower: "bob".to_string(),
            offer_seq: "seeded".to_string(),
            start_time: now,
            end_time: now + 2 * 365 * 86_400,
            principal_token: "GOLD".to_string(),
            principal,
            interest_rate: rate_bps,
            interest_accrued: rust_decimal::Decimal::ZERO,
            last_interest_update: now,
            collateral_token: "SILVER".to_string(),
            collateral,
            collateral_ratio: collateral / principal,
            health_factor: rust_decimal::Decimal::ZERO,
            status: LoanStatus::Active,
            closed_by: ClosedBy::default(),
        };
        loan.refresh_health_factor();

        engine.tokens().credit("bob", "SILVER", collateral).unwrap();
        engine
            .tokens()
            .lock("bob", "SILVER", collateral, &loan.key().collateral_hold())
            .unwrap();
        engine.persist_loan(&loan).unwrap();
        loan
    }

    /// 1000 GOLD at 730 bps for 90 days against 1.4x SILVER, single use.
    pub fn gold_offer() -> CreateOfferRequest {
        CreateOfferRequest {
            principal_token: "GOLD".to_string(),
            principal_quantity: dec!(1000),
            interest_rate: 730,
            duration: 90 * 86_400,
            collateral_token: "SILVER".to_string(),
            collateral_ratio: dec!(1.4),
            uses: dec!(1),
            expires: 0,
            borrower: None,
        }
    }
}
