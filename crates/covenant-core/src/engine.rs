//! The lending engine
//!
//! Owns the three ports (entity store, token ledger, transaction clock)
//! and exposes the protocol's five operations plus read-side queries.
//! The engine is an explicit handle: callers construct one per
//! transaction context, nothing is process-global.
//!
//! The mutating operations live in [`crate::offer`], [`crate::repay`],
//! and [`crate::liquidate`]; this module holds construction and the
//! read path.

use crate::params::ProtocolParams;
use covenant_common::{
    BorrowerRecord, BorrowerRecordKey, LendError, LenderRecord, LenderRecordKey, LendingOffer,
    Loan, LoanKey, OfferKey, Result,
};
use covenant_ledger::{EntityStore, TokenLedger, TransactionClock};

pub struct LendingEngine<S, T, C> {
    pub(crate) store: S,
    pub(crate) tokens: T,
    pub(crate) clock: C,
    pub(crate) params: ProtocolParams,
}

impl<S, T, C> LendingEngine<S, T, C>
where
    S: EntityStore,
    T: TokenLedger,
    C: TransactionClock,
{
    pub fn new(store: S, tokens: T, clock: C) -> Self {
        Self::with_params(store, tokens, clock, ProtocolParams::default())
    }

    pub fn with_params(store: S, tokens: T, clock: C, params: ProtocolParams) -> Self {
        Self {
            store,
            tokens,
            clock,
            params,
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Load an offer, or fail with `OfferNotFound`.
    pub fn offer(&self, key: &OfferKey) -> Result<LendingOffer> {
        self.store
            .load(&key.to_string())?
            .ok_or_else(|| LendError::OfferNotFound {
                key: key.to_string(),
            })
    }

    /// Load a loan, or fail with `LoanNotFound`.
    pub fn loan(&self, key: &LoanKey) -> Result<Loan> {
        self.store
            .load(&key.to_string())?
            .ok_or_else(|| LendError::LoanNotFound {
                key: key.to_string(),
            })
    }

    /// Every offer/loan record of one lender, in creation order.
    pub fn lender_positions(&self, lender: &str) -> Result<Vec<LenderRecord>> {
        self.store
            .load_prefix(&LenderRecordKey::lender_prefix(lender))
    }

    /// Every loan a lender originated, in creation order.
    pub fn loans_of_lender(&self, lender: &str) -> Result<Vec<Loan>> {
        self.store.load_prefix(&LoanKey::lender_prefix(lender))
    }

    /// Every loan between one lender/borrower pair, in creation order.
    pub fn loans_of_pair(&self, lender: &str, borrower: &str) -> Result<Vec<Loan>> {
        self.store
            .load_prefix(&LoanKey::pair_prefix(lender, borrower))
    }

    /// Every loan a borrower holds, across lenders, in creation order.
    ///
    /// Loan keys group by lender first, so the borrower side goes through
    /// the `borrower/{borrower}/` index and resolves each pointer.
    pub fn loans_of_borrower(&self, borrower: &str) -> Result<Vec<Loan>> {
        let records: Vec<BorrowerRecord> = self
            .store
            .load_prefix(&BorrowerRecordKey::borrower_prefix(borrower))?;
        records.iter().map(|record| self.loan(&record.loan_key)).collect()
    }

    /// Persist an entity and refresh the lender-scoped index record.
    pub(crate) fn persist_offer(&self, offer: &LendingOffer) -> Result<()> {
        self.store.save(&offer.key().to_string(), offer)?;
        let record = LenderRecord::from_offer(offer);
        self.store.save(&record.key().to_string(), &record)
    }

    pub(crate) fn persist_loan(&self, loan: &Loan) -> Result<()> {
        self.store.save(&loan.key().to_string(), loan)?;
        let record = LenderRecord::from_loan(loan);
        self.store.save(&record.key().to_string(), &record)?;
        let pointer = BorrowerRecord::from_loan(loan);
        self.store.save(&pointer.key().to_string(), &pointer)
    }
}
