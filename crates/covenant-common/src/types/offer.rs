//! LendingOffer - a lender's standing offer to lend a token
//!
//! An offer carries `uses` acceptance slots. Exhaustion is derived from
//! the `uses_spent` counter rather than a separate status, so the
//! `uses_spent <= uses` invariant is the single source of truth; the
//! `Accepted` status is only a convenience marker set once the last slot
//! is consumed. Offers are never deleted, only status-transitioned.

use crate::error::{LendError, Result};
use crate::types::keys::OfferKey;
use crate::types::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Offer lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfferStatus {
    Open,
    Accepted,
    Cancelled,
    Expired,
}

/// A standing offer to lend `principal_quantity` of `principal_token`
/// against over-collateralization in `collateral_token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LendingOffer {
    /// Sequence id; the composite key is lender + seq
    pub seq: String,

    /// Lender principal
    pub lender: String,

    /// Optional restriction to a single counterparty
    pub borrower: Option<String>,

    pub status: OfferStatus,

    pub principal_token: String,
    pub principal_quantity: Decimal,

    /// Annual simple-interest rate in basis points (10_000 = 100%/year)
    pub interest_rate: u32,

    /// Loan term in seconds
    pub duration: i64,

    pub collateral_token: String,

    /// Required collateral-to-principal ratio, >= 1
    pub collateral_ratio: Decimal,

    /// Creation timestamp (Unix seconds)
    pub created: i64,

    /// Expiry timestamp (Unix seconds); 0 = never expires
    pub expires: i64,

    /// Maximum concurrent acceptances
    pub uses: Decimal,

    /// Acceptances consumed so far; monotonically increasing
    pub uses_spent: Decimal,
}

impl LendingOffer {
    pub fn key(&self) -> OfferKey {
        OfferKey::new(self.lender.clone(), self.seq.clone())
    }

    /// True once every acceptance slot is consumed.
    pub fn is_exhausted(&self) -> bool {
        self.uses_spent >= self.uses
    }

    /// True when an expiry is set and `now` is past it.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires != 0 && now > self.expires
    }

    /// Minimum collateral an acceptance must post.
    pub fn required_collateral(&self) -> Decimal {
        money::round_money(self.principal_quantity * self.collateral_ratio)
    }

    /// Reject acceptance unless the offer is open, unexpired, unexhausted,
    /// and the borrower matches any counterparty restriction.
    pub fn ensure_acceptable(&self, borrower: &str, now: i64) -> Result<()> {
        let key = self.key().to_string();
        if self.status != OfferStatus::Open {
            return Err(LendError::InvalidStatus {
                key,
                reason: format!("offer is {:?}, not Open", self.status),
            });
        }
        if self.is_exhausted() {
            return Err(LendError::InvalidStatus {
                key,
                reason: format!("offer is exhausted ({} of {} uses spent)", self.uses_spent, self.uses),
            });
        }
        if self.is_expired(now) {
            return Err(LendError::InvalidStatus {
                key,
                reason: format!("offer expired at {}", self.expires),
            });
        }
        if let Some(ref restricted) = self.borrower {
            if restricted != borrower {
                return Err(LendError::Unauthorized {
                    caller: borrower.to_string(),
                    action: format!("accept offer reserved for {restricted}"),
                });
            }
        }
        Ok(())
    }

    /// Consume one acceptance slot. Marks the offer `Accepted` once the
    /// last slot is spent.
    pub fn spend_use(&mut self) -> Result<()> {
        if self.is_exhausted() {
            return Err(LendError::InvalidStatus {
                key: self.key().to_string(),
                reason: "offer is exhausted".to_string(),
            });
        }
        self.uses_spent += Decimal::ONE;
        if self.is_exhausted() {
            self.status = OfferStatus::Accepted;
        }
        Ok(())
    }

    /// Withdraw the offer's remaining capacity. Only open, unexhausted
    /// offers can be cancelled; an offer past its expiry is marked
    /// `Expired` instead of `Cancelled`.
    pub fn cancel(&mut self, now: i64) -> Result<()> {
        let key = self.key().to_string();
        if self.status != OfferStatus::Open {
            return Err(LendError::InvalidStatus {
                key,
                reason: format!("offer is {:?}, not Open", self.status),
            });
        }
        if self.is_exhausted() {
            return Err(LendError::InvalidStatus {
                key,
                reason: "offer is exhausted; nothing left to cancel".to_string(),
            });
        }
        self.status = if self.is_expired(now) {
            OfferStatus::Expired
        } else {
            OfferStatus::Cancelled
        };
        Ok(())
    }
}
