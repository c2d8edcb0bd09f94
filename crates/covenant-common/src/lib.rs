//! # Covenant Common
//!
//! Shared entities, errors, and decimal helpers for the Covenant
//! peer-to-peer lending core.
//!
//! ## Core Types
//!
//! - [`LendingOffer`]: a lender's standing offer to lend a token at a rate
//! - [`Loan`]: an active collateralized position created from an offer
//! - [`LenderRecord`]: denormalized lender-scoped index over offers/loans
//! - [`OfferKey`]/[`LoanKey`]: composite, prefix-ordered storage keys
//!
//! ## Money
//!
//! All monetary fields are [`rust_decimal::Decimal`] capped at 8
//! fractional digits; see [`types::money`] for the rounding rule.

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{LendError, Result, TokenError};
pub use types::{
    keys::{BorrowerRecordKey, LenderRecordKey, LoanKey, OfferKey},
    loan::{ClosedBy, Loan, LoanStatus},
    money,
    offer::{LendingOffer, OfferStatus},
    tracker::{BorrowerRecord, LenderRecord, TrackedKind},
};

/// Covenant version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Basis-point scale: 10_000 bps = 100% annual rate
pub const BPS_SCALE: u32 = 10_000;

/// Seconds in one day, the day-count denominator for accrual
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Day-count convention: 365 days per year
pub const DAYS_PER_YEAR: u32 = 365;

/// Maximum fractional digits for any monetary quantity
pub const MONEY_SCALE: u32 = 8;
