//! Offer lifecycle: create, cancel, accept
//!
//! Acceptance is the only operation here that moves tokens: the
//! borrower's collateral is locked under a hold named by the new loan's
//! key, and the principal moves lender to borrower. Both balances are
//! pre-checked before any ledger mutation so a failing acceptance leaves
//! no partial state behind.

use crate::engine::LendingEngine;
use crate::request::{AcceptOfferRequest, CancelOfferRequest, CreateOfferRequest};
use covenant_common::types::keys;
use covenant_common::{
    money, ClosedBy, LendError, LendingOffer, Loan, LoanStatus, OfferStatus, Result, TokenError,
};
use covenant_ledger::{EntityStore, TokenLedger, TransactionClock};
use tracing::{info, instrument};

impl<S, T, C> LendingEngine<S, T, C>
where
    S: EntityStore,
    T: TokenLedger,
    C: TransactionClock,
{
    /// Post a standing offer. The caller becomes the lender; no tokens
    /// move until acceptance.
    #[instrument(skip(self, request), fields(lender = caller))]
    pub fn create_offer(
        &self,
        caller: &str,
        request: CreateOfferRequest,
    ) -> Result<LendingOffer> {
        keys::ensure_principal(caller)?;
        request.validate()?;
        if request.collateral_ratio < self.params.min_collateral_ratio {
            return Err(LendError::Validation(format!(
                "collateral_ratio {} is below the protocol minimum {}",
                request.collateral_ratio, self.params.min_collateral_ratio
            )));
        }

        let now = self.clock.now();
        if request.expires != 0 && request.expires <= now {
            return Err(LendError::Validation(format!(
                "expires {} is not in the future",
                request.expires
            )));
        }

        let offer = LendingOffer {
            seq: self.clock.tx_seq(),
            lender: caller.to_string(),
            borrower: request.borrower,
            status: OfferStatus::Open,
            principal_token: request.principal_token,
            principal_quantity: request.principal_quantity,
            interest_rate: request.interest_rate,
            duration: request.duration,
            collateral_token: request.collateral_token,
            collateral_ratio: request.collateral_ratio,
            created: now,
            expires: request.expires,
            uses: request.uses,
            uses_spent: rust_decimal::Decimal::ZERO,
        };

        self.persist_offer(&offer)?;
        info!(key = %offer.key(), quantity = %offer.principal_quantity, "offer created");
        Ok(offer)
    }

    /// Withdraw an offer's remaining acceptance slots. Lender only.
    #[instrument(skip(self, request), fields(caller))]
    pub fn cancel_offer(
        &self,
        caller: &str,
        request: CancelOfferRequest,
    ) -> Result<LendingOffer> {
        let mut offer = self.offer(&request.offer_key)?;
        if offer.lender != caller {
            return Err(LendError::Unauthorized {
                caller: caller.to_string(),
                action: format!("cancel offer {}", offer.key()),
            });
        }

        offer.cancel(self.clock.now())?;
        self.persist_offer(&offer)?;
        info!(key = %offer.key(), status = ?offer.status, "offer cancelled");
        Ok(offer)
    }

    /// Accept an offer: post collateral, receive principal, open a loan.
    #[instrument(skip(self, request), fields(borrower = caller))]
    pub fn accept_offer(&self, caller: &str, request: AcceptOfferRequest) -> Result<Loan> {
        keys::ensure_principal(caller)?;
        request.validate()?;

        let mut offer = self.offer(&request.offer_key)?;
        let now = self.clock.now();
        offer.ensure_acceptable(caller, now)?;

        let required = offer.required_collateral();
        if request.collateral_amount < required {
            return Err(LendError::InsufficientCollateral {
                required,
                provided: request.collateral_amount,
            });
        }

        // Pre-check both balances so the two ledger moves below cannot
        // fail halfway through.
        let borrower_collateral = self.tokens.available(caller, &offer.collateral_token);
        if borrower_collateral < request.collateral_amount {
            return Err(TokenError::InsufficientBalance {
                token: offer.collateral_token.clone(),
                required: request.collateral_amount,
                available: borrower_collateral,
            }
            .into());
        }
        let lender_principal = self.tokens.available(&offer.lender, &offer.principal_token);
        if lender_principal < offer.principal_quantity {
            return Err(TokenError::InsufficientBalance {
                token: offer.principal_token.clone(),
                required: offer.principal_quantity,
                available: lender_principal,
            }
            .into());
        }

        offer.spend_use()?;

        let mut loan = Loan {
            seq: self.clock.tx_seq(),
            lender: offer.lender.clone(),
            borrower: caller.to_string(),
            offer_seq: offer.seq.clone(),
            start_time: now,
            end_time: now + offer.duration,
            principal_token: offer.principal_token.clone(),
            principal: offer.principal_quantity,
            interest_rate: offer.interest_rate,
            interest_accrued: rust_decimal::Decimal::ZERO,
            last_interest_update: now,
            collateral_token: offer.collateral_token.clone(),
            collateral: request.collateral_amount,
            collateral_ratio: money::round_money(
                request.collateral_amount / offer.principal_quantity,
            ),
            health_factor: rust_decimal::Decimal::ZERO,
            status: LoanStatus::Active,
            closed_by: ClosedBy::default(),
        };
        loan.refresh_health_factor();

        self.tokens.lock(
            caller,
            &offer.collateral_token,
            request.collateral_amount,
            &loan.key().collateral_hold(),
        )?;
        self.tokens.transfer(
            &offer.lender,
            caller,
            &offer.principal_token,
            offer.principal_quantity,
        )?;

        self.persist_offer(&offer)?;
        self.persist_loan(&loan)?;
        info!(
            key = %loan.key(),
            principal = %loan.principal,
            collateral = %loan.collateral,
            "loan originated"
        );
        Ok(loan)
    }
}
