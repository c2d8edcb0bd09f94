//! Liquidation
//!
//! A loan whose health factor drops below 1 can be partially closed by
//! any third party. One call may repay at most half of the outstanding
//! debt; in exchange the liquidator takes collateral worth the repaid
//! debt plus a 5% bonus. When the computed collateral exceeds what the
//! loan still holds, the whole remainder is taken and the repaid debt
//! is recomputed downward so the bonus relationship stays exact:
//! `debt_repaid + liquidator_reward == collateral_liquidated` in every
//! call. Collateral hitting zero closes the loan; any debt still on the
//! books at that point is the lender's loss.

use crate::engine::LendingEngine;
use crate::interest;
use crate::request::LiquidateRequest;
use covenant_common::{money, ClosedBy, LendError, Loan, LoanStatus, Result, TokenError};
use covenant_ledger::{EntityStore, TokenLedger, TransactionClock};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// Result of one liquidation call.
#[derive(Debug, Clone)]
pub struct Liquidation {
    pub loan: Loan,

    /// Debt the liquidator paid off, allocated interest-first
    pub debt_repaid: Decimal,

    /// Collateral taken from the loan's hold
    pub collateral_liquidated: Decimal,

    /// The bonus portion of the collateral taken
    pub liquidator_reward: Decimal,

    /// Collateral handed back to the borrower by this call; always zero,
    /// a liquidation never returns collateral mid-flight
    pub collateral_returned: Decimal,
}

impl<S, T, C> LendingEngine<S, T, C>
where
    S: EntityStore,
    T: TokenLedger,
    C: TransactionClock,
{
    /// Liquidate an undercollateralized loan. Any caller may liquidate;
    /// the repaid debt comes from the caller's balance and the seized
    /// collateral goes to them.
    #[instrument(skip(self, request), fields(liquidator = caller, loan = %request.loan_key))]
    pub fn liquidate(&self, caller: &str, request: LiquidateRequest) -> Result<Liquidation> {
        request.validate()?;

        let mut loan = self.loan(&request.loan_key)?;
        loan.ensure_active()?;

        interest::accrue(&mut loan, self.clock.now());
        loan.refresh_health_factor();
        if loan.health_factor >= Decimal::ONE {
            return Err(LendError::InvalidStatus {
                key: loan.key().to_string(),
                reason: format!(
                    "loan is not undercollateralized (health factor {})",
                    loan.health_factor
                ),
            });
        }

        let debt = loan.outstanding_debt();
        let debt_cap = money::round_money(debt * self.params.max_liquidation_fraction);
        let mut debt_repaid = request.max_debt_repayment.min(debt_cap);

        let bonus_factor = Decimal::ONE + self.params.liquidation_bonus;
        let mut collateral_liquidated = money::round_money(debt_repaid * bonus_factor);
        if collateral_liquidated > loan.collateral {
            // take everything that is left and shrink the repaid debt so
            // the bonus still holds for what was actually liquidated
            collateral_liquidated = loan.collateral;
            debt_repaid = money::round_money(collateral_liquidated / bonus_factor);
        }
        let liquidator_reward = collateral_liquidated - debt_repaid;

        let available = self.tokens.available(caller, &loan.principal_token);
        if available < debt_repaid {
            return Err(TokenError::InsufficientBalance {
                token: loan.principal_token.clone(),
                required: debt_repaid,
                available,
            }
            .into());
        }
        self.tokens
            .transfer(caller, &loan.lender, &loan.principal_token, debt_repaid)?;
        self.tokens.payout_from_hold(
            &loan.key().collateral_hold(),
            caller,
            collateral_liquidated,
        )?;

        // debt side allocates like a repayment: interest first
        let interest_portion = debt_repaid.min(loan.interest_accrued);
        let principal_portion = (debt_repaid - interest_portion).min(loan.principal);
        loan.interest_accrued -= interest_portion;
        loan.principal -= principal_portion;
        loan.collateral -= collateral_liquidated;
        loan.refresh_health_factor();

        if loan.collateral.is_zero() {
            loan.status = LoanStatus::Liquidated;
            loan.closed_by = ClosedBy::Liquidator;
            info!(
                key = %loan.key(),
                written_off = %loan.outstanding_debt(),
                "collateral exhausted, loan liquidated"
            );
        }

        self.persist_loan(&loan)?;
        info!(
            key = %loan.key(),
            debt_repaid = %debt_repaid,
            collateral = %collateral_liquidated,
            reward = %liquidator_reward,
            "liquidation applied"
        );
        Ok(Liquidation {
            loan,
            debt_repaid,
            collateral_liquidated,
            liquidator_reward,
            collateral_returned: Decimal::ZERO,
        })
    }
}
