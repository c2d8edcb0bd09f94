//! Loan - an active collateralized position
//!
//! Created by offer acceptance, mutated only by repayment and
//! liquidation, terminal once `Repaid` or `Liquidated`. `principal`
//! and `collateral` never increase after origination; `interest_accrued`
//! only grows through accrual and only shrinks through repayment.

use crate::error::{LendError, Result};
use crate::types::keys::LoanKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Repaid,
    Liquidated,
}

/// Who closed the loan
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClosedBy {
    #[default]
    Unspecified,
    Borrower,
    Liquidator,
    Registrar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Sequence id; the composite key is lender + borrower + offer_seq + seq
    pub seq: String,

    pub lender: String,
    pub borrower: String,

    /// Sequence id of the originating offer
    pub offer_seq: String,

    /// Origination timestamp (Unix seconds)
    pub start_time: i64,

    /// Scheduled end of term (Unix seconds)
    pub end_time: i64,

    pub principal_token: String,

    /// Outstanding principal; monotonically non-increasing
    pub principal: Decimal,

    /// Annual simple-interest rate in basis points, copied from the offer
    pub interest_rate: u32,

    /// Interest accrued and not yet repaid
    pub interest_accrued: Decimal,

    /// Timestamp of the last accrual step (Unix seconds)
    pub last_interest_update: i64,

    pub collateral_token: String,

    /// Locked collateral backing the loan; monotonically non-increasing
    pub collateral: Decimal,

    /// Collateral-to-principal ratio at origination, informational
    pub collateral_ratio: Decimal,

    /// Collateral / (principal + interest), recomputed on every mutation
    pub health_factor: Decimal,

    pub status: LoanStatus,
    pub closed_by: ClosedBy,
}

impl Loan {
    pub fn key(&self) -> LoanKey {
        LoanKey::new(
            self.lender.clone(),
            self.borrower.clone(),
            self.offer_seq.clone(),
            self.seq.clone(),
        )
    }

    /// Total outstanding debt: principal plus accrued interest.
    pub fn outstanding_debt(&self) -> Decimal {
        self.principal + self.interest_accrued
    }

    /// Collateral over debt; a zero-debt loan is fully healthy.
    pub fn current_health_factor(&self) -> Decimal {
        let debt = self.outstanding_debt();
        if debt.is_zero() {
            Decimal::MAX
        } else {
            self.collateral / debt
        }
    }

    /// Store the health factor computed from current balances.
    pub fn refresh_health_factor(&mut self) {
        self.health_factor = self.current_health_factor();
    }

    /// Reject mutation of a closed loan.
    pub fn ensure_active(&self) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(LendError::InvalidStatus {
                key: self.key().to_string(),
                reason: format!("loan is {:?}, not Active", self.status),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan() -> Loan {
        Loan {
            seq: "l1".to_string(),
            lender: "alice".to_string(),
            borrower: "bob".to_string(),
            offer_seq: "o1".to_string(),
            start_time: 1_700_000_000,
            end_time: 1_700_000_000 + 90 * 86_400,
            principal_token: "GOLD".to_string(),
            principal: dec!(1000),
            interest_rate: 730,
            interest_accrued: Decimal::ZERO,
            last_interest_update: 1_700_000_000,
            collateral_token: "SILVER".to_string(),
            collateral: dec!(1400),
            collateral_ratio: dec!(1.4),
            health_factor: dec!(1.4),
            status: LoanStatus::Active,
            closed_by: ClosedBy::default(),
        }
    }

    #[test]
    fn test_health_factor() {
        let mut l = loan();
        assert_eq!(l.current_health_factor(), dec!(1.4));
        l.interest_accrued = dec!(400);
        assert_eq!(l.current_health_factor(), dec!(1));
    }

    #[test]
    fn test_zero_debt_is_fully_healthy() {
        let mut l = loan();
        l.principal = Decimal::ZERO;
        l.interest_accrued = Decimal::ZERO;
        assert_eq!(l.current_health_factor(), Decimal::MAX);
    }

    #[test]
    fn test_closed_loan_rejects_mutation() {
        let mut l = loan();
        l.status = LoanStatus::Repaid;
        assert!(matches!(
            l.ensure_active(),
            Err(LendError::InvalidStatus { .. })
        ));
    }
}
