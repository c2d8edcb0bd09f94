//! Validated request objects for the five public operations
//!
//! Each request validates its own field ranges; authorization and
//! entity-state checks happen later in the pipeline, against freshly
//! loaded state.

use covenant_common::types::keys;
use covenant_common::{money, LendError, LoanKey, OfferKey, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Post a standing lending offer. The caller becomes the lender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOfferRequest {
    pub principal_token: String,
    pub principal_quantity: Decimal,

    /// Annual simple-interest rate in basis points
    pub interest_rate: u32,

    /// Loan term in seconds
    pub duration: i64,

    pub collateral_token: String,

    /// Required collateral-to-principal ratio, >= 1
    pub collateral_ratio: Decimal,

    /// Number of acceptance slots
    pub uses: Decimal,

    /// Expiry timestamp (Unix seconds); 0 = never
    pub expires: i64,

    /// Optional restriction to a single counterparty
    pub borrower: Option<String>,
}

impl CreateOfferRequest {
    pub fn validate(&self) -> Result<()> {
        ensure_token("principal_token", &self.principal_token)?;
        ensure_token("collateral_token", &self.collateral_token)?;
        money::ensure_positive("principal_quantity", self.principal_quantity)?;
        money::ensure_money_scale("principal_quantity", self.principal_quantity)?;
        money::ensure_money_scale("collateral_ratio", self.collateral_ratio)?;
        if self.duration <= 0 {
            return Err(LendError::Validation(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if self.expires < 0 {
            return Err(LendError::Validation(format!(
                "expires must be a timestamp or 0, got {}",
                self.expires
            )));
        }
        if self.uses < Decimal::ONE || !is_integer(self.uses) {
            return Err(LendError::Validation(format!(
                "uses must be a positive whole number, got {}",
                self.uses
            )));
        }
        if let Some(ref borrower) = self.borrower {
            keys::ensure_principal(borrower)?;
        }
        Ok(())
    }
}

/// Withdraw an offer's remaining acceptance slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOfferRequest {
    pub offer_key: OfferKey,
}

/// Accept an offer by posting collateral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOfferRequest {
    pub offer_key: OfferKey,
    pub collateral_amount: Decimal,
}

impl AcceptOfferRequest {
    pub fn validate(&self) -> Result<()> {
        money::ensure_positive("collateral_amount", self.collateral_amount)?;
        money::ensure_money_scale("collateral_amount", self.collateral_amount)
    }
}

/// Apply a payment to an active loan, interest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepayRequest {
    pub loan_key: LoanKey,
    pub amount: Decimal,
}

impl RepayRequest {
    pub fn validate(&self) -> Result<()> {
        money::ensure_positive("amount", self.amount)?;
        money::ensure_money_scale("amount", self.amount)
    }
}

/// Liquidate an undercollateralized loan for a bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidateRequest {
    pub loan_key: LoanKey,

    /// Most debt the liquidator is willing to repay in this call
    pub max_debt_repayment: Decimal,
}

impl LiquidateRequest {
    pub fn validate(&self) -> Result<()> {
        money::ensure_positive("max_debt_repayment", self.max_debt_repayment)?;
        money::ensure_money_scale("max_debt_repayment", self.max_debt_repayment)
    }
}

fn ensure_token(field: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(LendError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn is_integer(value: Decimal) -> bool {
    value.fract().is_zero()
}
