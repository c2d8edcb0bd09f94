//! Monetary decimal helpers
//!
//! Every balance, quantity, and rate in Covenant is a [`Decimal`] with at
//! most 8 fractional digits. The single rounding rule protocol-wide is
//! half-away-from-zero at 8 digits, applied once at the end of each
//! formula; intermediates are never rounded. Quantities derived from an
//! already-rounded value (e.g. a liquidator reward) are computed by
//! subtraction so conservation identities hold exactly.

use crate::error::{LendError, Result};
use crate::{BPS_SCALE, MONEY_SCALE};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary quantity to the protocol's 8-digit scale.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject inputs carrying more than 8 fractional digits.
pub fn ensure_money_scale(field: &str, value: Decimal) -> Result<()> {
    if value.scale() > MONEY_SCALE {
        return Err(LendError::Validation(format!(
            "{field} has {} fractional digits, maximum is {MONEY_SCALE}",
            value.scale()
        )));
    }
    Ok(())
}

/// Reject non-positive quantities.
pub fn ensure_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(LendError::Validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Convert an integer basis-point rate to its annual fraction.
/// 10_000 bps = 1.0 (100% per year).
pub fn bps_to_annual_rate(rate_bps: u32) -> Decimal {
    Decimal::from(rate_bps) / Decimal::from(BPS_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.000000005)), dec!(1.00000001));
        assert_eq!(round_money(dec!(1.000000004)), dec!(1.00000000));
        assert_eq!(round_money(dec!(-1.000000005)), dec!(-1.00000001));
    }

    #[test]
    fn test_ensure_money_scale() {
        assert!(ensure_money_scale("amount", dec!(0.12345678)).is_ok());
        assert!(ensure_money_scale("amount", dec!(0.123456789)).is_err());
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("amount", dec!(0.00000001)).is_ok());
        assert!(ensure_positive("amount", Decimal::ZERO).is_err());
        assert!(ensure_positive("amount", dec!(-5)).is_err());
    }

    #[test]
    fn test_bps_conversion() {
        assert_eq!(bps_to_annual_rate(10_000), dec!(1));
        assert_eq!(bps_to_annual_rate(500), dec!(0.05));
        assert_eq!(bps_to_annual_rate(0), Decimal::ZERO);
    }
}
