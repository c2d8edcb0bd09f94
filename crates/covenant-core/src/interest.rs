//! Interest accrual
//!
//! Simple (non-compounding) interest: each accrual step multiplies the
//! *current* principal by the annual rate and the elapsed fraction of a
//! 365-day year, never the interest already accrued. The step result is
//! rounded half-away-from-zero at 8 digits; the running total is a sum
//! of rounded steps.
//!
//! Accrual is lazy: it runs as the first stage of every repayment and
//! liquidation, so all subsequent math in that operation sees the debt
//! as of the transaction's timestamp.

use covenant_common::{money, Loan, DAYS_PER_YEAR, SECONDS_PER_DAY};
use rust_decimal::Decimal;

/// Interest owed on `principal` at `rate_bps` over `elapsed_seconds`.
/// Zero for a non-positive interval, never negative.
pub fn interest_step(principal: Decimal, rate_bps: u32, elapsed_seconds: i64) -> Decimal {
    if elapsed_seconds <= 0 {
        return Decimal::ZERO;
    }
    let elapsed_days = Decimal::from(elapsed_seconds) / Decimal::from(SECONDS_PER_DAY);
    let annual_rate = money::bps_to_annual_rate(rate_bps);
    money::round_money(principal * annual_rate * elapsed_days / Decimal::from(DAYS_PER_YEAR))
}

/// Bring a loan's accrued interest up to `now`. Returns the interest
/// added by this step. A stale or repeated timestamp adds nothing and
/// never rewinds `last_interest_update`.
pub fn accrue(loan: &mut Loan, now: i64) -> Decimal {
    let added = interest_step(
        loan.principal,
        loan.interest_rate,
        now - loan.last_interest_update,
    );
    loan.interest_accrued += added;
    if now > loan.last_interest_update {
        loan.last_interest_update = now;
    }
    added
}
