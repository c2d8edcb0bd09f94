//! Token ledger port - balances and named collateral holds
//!
//! Funds live in a per-owner-per-token available balance. Collateral is
//! moved out of the borrower's available balance into a *named hold* at
//! loan origination; the hold is either released back to its owner on
//! full repayment or paid out piecewise to liquidators.

use covenant_common::TokenError;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

pub trait TokenLedger: Send + Sync {
    /// Add to `owner`'s available balance.
    fn credit(&self, owner: &str, token: &str, amount: Decimal) -> Result<(), TokenError>;

    /// Remove from `owner`'s available balance.
    fn debit(&self, owner: &str, token: &str, amount: Decimal) -> Result<(), TokenError>;

    /// Debit `from` and credit `to` in one step.
    fn transfer(&self, from: &str, to: &str, token: &str, amount: Decimal)
        -> Result<(), TokenError>;

    /// Move funds from `owner`'s available balance into the named hold.
    fn lock(&self, owner: &str, token: &str, amount: Decimal, hold: &str)
        -> Result<(), TokenError>;

    /// Return the hold's full remaining balance to its owner.
    fn release_hold(&self, hold: &str) -> Result<(), TokenError>;

    /// Pay part of a hold out to `recipient`'s available balance.
    fn payout_from_hold(
        &self,
        hold: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<(), TokenError>;

    fn available(&self, owner: &str, token: &str) -> Decimal;

    fn held(&self, hold: &str) -> Decimal;
}

fn ensure_positive(amount: Decimal) -> Result<(), TokenError> {
    if amount <= Decimal::ZERO {
        return Err(TokenError::InvalidAmount);
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Hold {
    owner: String,
    token: String,
    amount: Decimal,
}

/// In-memory token ledger for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    /// Available balance per (owner, token)
    accounts: DashMap<(String, String), Decimal>,

    /// Named holds carved out of owners' balances
    holds: DashMap<String, Hold>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account, for test setup.
    pub fn with_balance(self, owner: &str, token: &str, amount: Decimal) -> Self {
        self.accounts
            .insert((owner.to_string(), token.to_string()), amount);
        self
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn credit(&self, owner: &str, token: &str, amount: Decimal) -> Result<(), TokenError> {
        ensure_positive(amount)?;
        *self
            .accounts
            .entry((owner.to_string(), token.to_string()))
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn debit(&self, owner: &str, token: &str, amount: Decimal) -> Result<(), TokenError> {
        ensure_positive(amount)?;
        let mut entry = self
            .accounts
            .entry((owner.to_string(), token.to_string()))
            .or_insert(Decimal::ZERO);
        if *entry < amount {
            return Err(TokenError::InsufficientBalance {
                token: token.to_string(),
                required: amount,
                available: *entry,
            });
        }
        *entry -= amount;
        Ok(())
    }

    fn transfer(
        &self,
        from: &str,
        to: &str,
        token: &str,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        self.debit(from, token, amount)?;
        self.credit(to, token, amount)
    }

    fn lock(
        &self,
        owner: &str,
        token: &str,
        amount: Decimal,
        hold: &str,
    ) -> Result<(), TokenError> {
        ensure_positive(amount)?;
        self.debit(owner, token, amount)?;
        debug!(owner, token, %amount, hold, "locked collateral");
        let mut entry = self.holds.entry(hold.to_string()).or_insert(Hold {
            owner: owner.to_string(),
            token: token.to_string(),
            amount: Decimal::ZERO,
        });
        entry.amount += amount;
        Ok(())
    }

    fn release_hold(&self, hold: &str) -> Result<(), TokenError> {
        let (_, released) = self
            .holds
            .remove(hold)
            .ok_or_else(|| TokenError::HoldNotFound(hold.to_string()))?;
        if released.amount > Decimal::ZERO {
            self.credit(&released.owner, &released.token, released.amount)?;
        }
        debug!(hold, owner = %released.owner, amount = %released.amount, "released hold");
        Ok(())
    }

    fn payout_from_hold(
        &self,
        hold: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<(), TokenError> {
        ensure_positive(amount)?;
        let token = {
            let mut entry = self
                .holds
                .get_mut(hold)
                .ok_or_else(|| TokenError::HoldNotFound(hold.to_string()))?;
            if entry.amount < amount {
                return Err(TokenError::InsufficientHeld {
                    hold: hold.to_string(),
                    required: amount,
                    held: entry.amount,
                });
            }
            entry.amount -= amount;
            entry.token.clone()
        };
        self.holds.remove_if(hold, |_, h| h.amount.is_zero());
        self.credit(recipient, &token, amount)
    }

    fn available(&self, owner: &str, token: &str) -> Decimal {
        self.accounts
            .get(&(owner.to_string(), token.to_string()))
            .map(|entry| *entry)
            .unwrap_or(Decimal::ZERO)
    }

    fn held(&self, hold: &str) -> Decimal {
        self.holds
            .get(hold)
            .map(|entry| entry.amount)
            .unwrap_or(Decimal::ZERO)
    }
}
