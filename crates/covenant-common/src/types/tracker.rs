//! LenderRecord / BorrowerRecord - denormalized party-scoped indexes
//!
//! Purely derived state mirroring each offer/loan a party is involved in,
//! keyed under `lender/{lender}/` and `borrower/{borrower}/` so a single
//! prefix scan answers party-scoped queries. Never the source of truth;
//! rewritten whenever the tracked entity's status or quantity changes.
//!
//! The lender side mirrors status and principal directly. The borrower
//! side only points back at the loan key, because loan keys group by
//! lender first and cannot be prefix-scanned by borrower alone.

use crate::types::keys::{BorrowerRecordKey, LenderRecordKey, LoanKey};
use crate::types::loan::Loan;
use crate::types::offer::LendingOffer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which entity class a record mirrors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrackedKind {
    Offer,
    Loan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenderRecord {
    /// Sequence id of the tracked entity
    pub seq: String,

    pub lender: String,
    pub kind: TrackedKind,

    /// Mirror of the tracked entity's status, as its debug name
    pub status: String,

    /// Sequence id of the originating offer
    pub offer_seq: String,

    pub principal_token: String,
    pub principal_quantity: Decimal,
}

impl LenderRecord {
    pub fn key(&self) -> LenderRecordKey {
        LenderRecordKey::new(self.lender.clone(), self.seq.clone())
    }

    pub fn from_offer(offer: &LendingOffer) -> Self {
        Self {
            seq: offer.seq.clone(),
            lender: offer.lender.clone(),
            kind: TrackedKind::Offer,
            status: format!("{:?}", offer.status),
            offer_seq: offer.seq.clone(),
            principal_token: offer.principal_token.clone(),
            principal_quantity: offer.principal_quantity,
        }
    }

    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            seq: loan.seq.clone(),
            lender: loan.lender.clone(),
            kind: TrackedKind::Loan,
            status: format!("{:?}", loan.status),
            offer_seq: loan.offer_seq.clone(),
            principal_token: loan.principal_token.clone(),
            principal_quantity: loan.principal,
        }
    }
}

/// Borrower-side pointer to a loan, keyed under `borrower/{borrower}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowerRecord {
    /// Sequence id of the tracked loan
    pub seq: String,

    pub borrower: String,

    /// Full key of the loan, resolved on read
    pub loan_key: LoanKey,
}

impl BorrowerRecord {
    pub fn key(&self) -> BorrowerRecordKey {
        BorrowerRecordKey::new(self.borrower.clone(), self.seq.clone())
    }

    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            seq: loan.seq.clone(),
            borrower: loan.borrower.clone(),
            loan_key: loan.key(),
        }
    }
}
