//! Repayment allocation
//!
//! Payments apply to accrued interest first, then principal. The amount
//! debited from the caller is capped at the outstanding debt: an
//! overpayment is never collected, so `interest_repaid +
//! principal_repaid` equals the debit exactly in every call. Principal
//! reaching zero closes the loan and releases the collateral hold back
//! to the borrower.

use crate::engine::LendingEngine;
use crate::interest;
use crate::request::RepayRequest;
use covenant_common::{ClosedBy, Loan, LoanStatus, Result, TokenError};
use covenant_ledger::{EntityStore, TokenLedger, TransactionClock};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// Result of one repayment call.
#[derive(Debug, Clone)]
pub struct Repayment {
    pub loan: Loan,
    pub interest_repaid: Decimal,
    pub principal_repaid: Decimal,
}

impl Repayment {
    /// The amount actually debited from the caller.
    pub fn total(&self) -> Decimal {
        self.interest_repaid + self.principal_repaid
    }
}

impl<S, T, C> LendingEngine<S, T, C>
where
    S: EntityStore,
    T: TokenLedger,
    C: TransactionClock,
{
    /// Apply a payment to an active loan, interest first. Any caller may
    /// repay on the borrower's behalf; the funds come from the caller.
    #[instrument(skip(self, request), fields(caller, loan = %request.loan_key))]
    pub fn repay(&self, caller: &str, request: RepayRequest) -> Result<Repayment> {
        request.validate()?;

        let mut loan = self.loan(&request.loan_key)?;
        loan.ensure_active()?;

        interest::accrue(&mut loan, self.clock.now());

        let interest_repaid = request.amount.min(loan.interest_accrued);
        let principal_repaid = (request.amount - interest_repaid).min(loan.principal);
        let debited = interest_repaid + principal_repaid;

        // an active loan has positive debt, so `debited` is positive here
        let available = self.tokens.available(caller, &loan.principal_token);
        if available < debited {
            return Err(TokenError::InsufficientBalance {
                token: loan.principal_token.clone(),
                required: debited,
                available,
            }
            .into());
        }
        self.tokens
            .transfer(caller, &loan.lender, &loan.principal_token, debited)?;

        loan.interest_accrued -= interest_repaid;
        loan.principal -= principal_repaid;
        loan.refresh_health_factor();

        if loan.principal.is_zero() {
            loan.status = LoanStatus::Repaid;
            loan.closed_by = ClosedBy::Borrower;
            self.tokens.release_hold(&loan.key().collateral_hold())?;
            loan.collateral = Decimal::ZERO;
            info!(key = %loan.key(), "loan fully repaid, collateral released");
        }

        self.persist_loan(&loan)?;
        info!(
            key = %loan.key(),
            interest = %interest_repaid,
            principal = %principal_repaid,
            remaining = %loan.outstanding_debt(),
            "repayment applied"
        );
        Ok(Repayment {
            loan,
            interest_repaid,
            principal_repaid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AcceptOfferRequest;
    use crate::test_support::{engine, gold_offer, TestEngine};
    use covenant_common::{LendError, LoanKey};
    use rust_decimal_macros::dec;

    fn engine_with_loan() -> (TestEngine, LoanKey) {
        let engine = engine();
        let offer = engine.create_offer("alice", gold_offer()).unwrap();
        let loan = engine
            .accept_offer(
                "bob",
                AcceptOfferRequest {
                    offer_key: offer.key(),
                    collateral_amount: dec!(1400),
                },
            )
            .unwrap();
        (engine, loan.key())
    }

    #[test]
    fn test_interest_first_allocation_after_90_days() {
        let (engine, key) = engine_with_loan();
        engine.clock().advance(90 * 86_400);

        // 90 days at 730 bps on 1000 = 18 interest
        let repayment = engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key,
                    amount: dec!(50),
                },
            )
            .unwrap();

        assert_eq!(repayment.interest_repaid, dec!(18));
        assert_eq!(repayment.principal_repaid, dec!(32));
        assert_eq!(repayment.total(), dec!(50));
        assert_eq!(repayment.loan.principal, dec!(968));
        assert_eq!(repayment.loan.interest_accrued, Decimal::ZERO);
        assert_eq!(repayment.loan.status, LoanStatus::Active);
    }

    #[test]
    fn test_overpayment_is_never_collected() {
        let (engine, key) = engine_with_loan();
        engine.clock().advance(90 * 86_400);
        engine.tokens().credit("bob", "GOLD", dec!(5000)).unwrap();
        let before = engine.tokens().available("bob", "GOLD");

        let repayment = engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key,
                    amount: dec!(999999),
                },
            )
            .unwrap();

        // debt was 1018; only 1018 left the caller's balance
        assert_eq!(repayment.total(), dec!(1018));
        assert_eq!(
            engine.tokens().available("bob", "GOLD"),
            before - dec!(1018)
        );
        assert_eq!(repayment.loan.status, LoanStatus::Repaid);
        assert_eq!(repayment.loan.closed_by, ClosedBy::Borrower);
    }

    #[test]
    fn test_full_repayment_releases_collateral() {
        let (engine, key) = engine_with_loan();
        engine.clock().advance(90 * 86_400);
        engine.tokens().credit("bob", "GOLD", dec!(100)).unwrap();

        let repayment = engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key.clone(),
                    amount: dec!(1018),
                },
            )
            .unwrap();

        assert_eq!(repayment.loan.status, LoanStatus::Repaid);
        assert_eq!(repayment.loan.collateral, Decimal::ZERO);
        assert_eq!(engine.tokens().held(&key.collateral_hold()), Decimal::ZERO);
        // collateral returned to the borrower's available balance
        assert_eq!(engine.tokens().available("bob", "SILVER"), dec!(2000));
        // lender received interest plus principal
        assert_eq!(engine.tokens().available("alice", "GOLD"), dec!(10018));
    }

    #[test]
    fn test_repaid_loan_rejects_further_repayment() {
        let (engine, key) = engine_with_loan();
        engine.tokens().credit("bob", "GOLD", dec!(100)).unwrap();
        engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key.clone(),
                    amount: dec!(1000),
                },
            )
            .unwrap();

        let result = engine.repay(
            "bob",
            RepayRequest {
                loan_key: key,
                amount: dec!(1),
            },
        );
        assert!(matches!(result, Err(LendError::InvalidStatus { .. })));
    }

    #[test]
    fn test_third_party_repayment_flows_to_lender() {
        let (engine, key) = engine_with_loan();
        engine.tokens().credit("carol", "GOLD", dec!(200)).unwrap();

        let repayment = engine
            .repay(
                "carol",
                RepayRequest {
                    loan_key: key,
                    amount: dec!(200),
                },
            )
            .unwrap();

        assert_eq!(repayment.principal_repaid, dec!(200));
        assert_eq!(engine.tokens().available("carol", "GOLD"), Decimal::ZERO);
        assert_eq!(engine.tokens().available("alice", "GOLD"), dec!(9200));
    }

    #[test]
    fn test_short_caller_balance_leaves_loan_untouched() {
        let (engine, key) = engine_with_loan();
        engine.clock().advance(90 * 86_400);
        // bob holds exactly the 1000 GOLD principal he received
        let result = engine.repay(
            "bob",
            RepayRequest {
                loan_key: key.clone(),
                amount: dec!(1018),
            },
        );
        assert!(matches!(result, Err(LendError::Token(_))));

        // accrual was not persisted by the failing call
        let reloaded = engine.loan(&key).unwrap();
        assert_eq!(reloaded.interest_accrued, Decimal::ZERO);
        assert_eq!(reloaded.principal, dec!(1000));
    }

    #[test]
    fn test_zero_elapsed_second_repayment_accrues_nothing() {
        let (engine, key) = engine_with_loan();
        engine.clock().advance(90 * 86_400);

        let first = engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key.clone(),
                    amount: dec!(18),
                },
            )
            .unwrap();
        assert_eq!(first.interest_repaid, dec!(18));

        // same timestamp: no further interest exists to repay
        let second = engine
            .repay(
                "bob",
                RepayRequest {
                    loan_key: key,
                    amount: dec!(10),
                },
            )
            .unwrap();
        assert_eq!(second.interest_repaid, Decimal::ZERO);
        assert_eq!(second.principal_repaid, dec!(10));
    }

    #[test]
    fn test_missing_loan() {
        let engine = engine();
        let key = LoanKey::new("alice", "bob", "o1", "nope");
        assert!(matches!(
            engine.repay(
                "bob",
                RepayRequest {
                    loan_key: key,
                    amount: dec!(1),
                }
            ),
            Err(LendError::LoanNotFound { .. })
        ));
    }
}
