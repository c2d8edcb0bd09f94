//! Composite, prefix-ordered storage keys
//!
//! Keys are flat strings with `/`-separated segments so that the entity
//! store's prefix scans express the lender-/borrower-scoped queries:
//!
//! - offer:           `offer/{lender}/{seq}`
//! - loan:            `loan/{lender}/{borrower}/{offer_seq}/{seq}`
//! - lender record:   `lender/{lender}/{seq}`
//! - borrower record: `borrower/{borrower}/{seq}`
//!
//! Sequence ids are time-ordered (UUIDv7 from the transaction clock), so
//! a prefix scan returns entities in creation order.

use crate::error::LendError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const OFFER_PREFIX: &str = "offer";
const LOAN_PREFIX: &str = "loan";
const LENDER_PREFIX: &str = "lender";
const BORROWER_PREFIX: &str = "borrower";

fn ensure_segment(kind: &str, segment: &str) -> Result<(), LendError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(LendError::Validation(format!(
            "invalid {kind} key segment: {segment:?}"
        )));
    }
    Ok(())
}

/// Principals become key segments, so they must be non-empty and free of
/// the segment separator.
pub fn ensure_principal(principal: &str) -> Result<(), LendError> {
    ensure_segment("principal", principal)
}

/// Key of a [`crate::LendingOffer`]: lender principal + sequence id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferKey {
    pub lender: String,
    pub seq: String,
}

impl OfferKey {
    pub fn new(lender: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            lender: lender.into(),
            seq: seq.into(),
        }
    }

    /// Prefix matching every offer of one lender.
    pub fn lender_prefix(lender: &str) -> String {
        format!("{OFFER_PREFIX}/{lender}/")
    }
}

impl fmt::Display for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{OFFER_PREFIX}/{}/{}", self.lender, self.seq)
    }
}

impl FromStr for OfferKey {
    type Err = LendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            &[OFFER_PREFIX, lender, seq] => {
                ensure_segment("offer", lender)?;
                ensure_segment("offer", seq)?;
                Ok(Self::new(lender, seq))
            }
            _ => Err(LendError::Validation(format!("malformed offer key: {s}"))),
        }
    }
}

/// Key of a [`crate::Loan`]: lender + borrower + originating offer + sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanKey {
    pub lender: String,
    pub borrower: String,
    pub offer_seq: String,
    pub seq: String,
}

impl LoanKey {
    pub fn new(
        lender: impl Into<String>,
        borrower: impl Into<String>,
        offer_seq: impl Into<String>,
        seq: impl Into<String>,
    ) -> Self {
        Self {
            lender: lender.into(),
            borrower: borrower.into(),
            offer_seq: offer_seq.into(),
            seq: seq.into(),
        }
    }

    /// Prefix matching every loan originated by one lender.
    pub fn lender_prefix(lender: &str) -> String {
        format!("{LOAN_PREFIX}/{lender}/")
    }

    /// Prefix matching every loan between one lender/borrower pair.
    pub fn pair_prefix(lender: &str, borrower: &str) -> String {
        format!("{LOAN_PREFIX}/{lender}/{borrower}/")
    }

    /// Name of the token hold securing this loan's collateral.
    pub fn collateral_hold(&self) -> String {
        format!("hold:{self}")
    }
}

impl fmt::Display for LoanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{LOAN_PREFIX}/{}/{}/{}/{}",
            self.lender, self.borrower, self.offer_seq, self.seq
        )
    }
}

impl FromStr for LoanKey {
    type Err = LendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            &[LOAN_PREFIX, lender, borrower, offer_seq, seq] => {
                for segment in [lender, borrower, offer_seq, seq] {
                    ensure_segment("loan", segment)?;
                }
                Ok(Self::new(lender, borrower, offer_seq, seq))
            }
            _ => Err(LendError::Validation(format!("malformed loan key: {s}"))),
        }
    }
}

/// Key of a [`crate::LenderRecord`] in the lender-scoped index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LenderRecordKey {
    pub lender: String,
    pub seq: String,
}

impl LenderRecordKey {
    pub fn new(lender: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            lender: lender.into(),
            seq: seq.into(),
        }
    }

    /// Prefix matching every record of one lender.
    pub fn lender_prefix(lender: &str) -> String {
        format!("{LENDER_PREFIX}/{lender}/")
    }
}

impl fmt::Display for LenderRecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LENDER_PREFIX}/{}/{}", self.lender, self.seq)
    }
}

/// Key of a [`crate::BorrowerRecord`] in the borrower-scoped index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorrowerRecordKey {
    pub borrower: String,
    pub seq: String,
}

impl BorrowerRecordKey {
    pub fn new(borrower: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            borrower: borrower.into(),
            seq: seq.into(),
        }
    }

    /// Prefix matching every record of one borrower.
    pub fn borrower_prefix(borrower: &str) -> String {
        format!("{BORROWER_PREFIX}/{borrower}/")
    }
}

impl fmt::Display for BorrowerRecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{BORROWER_PREFIX}/{}/{}", self.borrower, self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_key_round_trip() {
        let key = OfferKey::new("alice", "0190b7");
        let parsed: OfferKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_loan_key_round_trip() {
        let key = LoanKey::new("alice", "bob", "0190b7", "0190b8");
        assert_eq!(key.to_string(), "loan/alice/bob/0190b7/0190b8");
        let parsed: LoanKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_malformed_keys_rejected() {
        assert!("offer/alice".parse::<OfferKey>().is_err());
        assert!("loan/alice/bob/x".parse::<LoanKey>().is_err());
        assert!("offer//seq".parse::<OfferKey>().is_err());
    }

    #[test]
    fn test_prefixes_scope_by_party() {
        let key = LoanKey::new("alice", "bob", "o1", "l1");
        assert!(key
            .to_string()
            .starts_with(&LoanKey::pair_prefix("alice", "bob")));
        assert!(key.to_string().starts_with(&LoanKey::lender_prefix("alice")));
        assert!(!key.to_string().starts_with(&LoanKey::lender_prefix("al")));
    }
}
