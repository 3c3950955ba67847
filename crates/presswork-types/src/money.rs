//! Minor-unit rounding for computed monetary amounts.
//!
//! Stored amounts (configured fixed rates, sale prices) are taken as-is;
//! only *computed* amounts (percentage applications) are rounded, half-up,
//! to the currency's minor unit. The default deployment currency has no
//! subunit, so the default scale is 0.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a computed amount half-up to `scale` decimal places.
///
/// Half-up for the non-negative amounts this core produces: 0.5 rounds to 1.
#[must_use]
pub fn round_minor(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage rate to a base amount and round to the minor unit.
#[must_use]
pub fn apply_percentage(base: Decimal, rate: Decimal, scale: u32) -> Decimal {
    round_minor(base * rate / Decimal::ONE_HUNDRED, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_at_midpoint() {
        assert_eq!(round_minor(Decimal::new(15, 1), 0), Decimal::new(2, 0)); // 1.5 -> 2
        assert_eq!(round_minor(Decimal::new(25, 1), 0), Decimal::new(3, 0)); // 2.5 -> 3
        assert_eq!(round_minor(Decimal::new(14, 1), 0), Decimal::new(1, 0)); // 1.4 -> 1
    }

    #[test]
    fn round_preserves_scale() {
        // 12.345 at scale 2 -> 12.35
        assert_eq!(round_minor(Decimal::new(12_345, 3), 2), Decimal::new(1_235, 2));
    }

    #[test]
    fn percentage_of_ten_thousand() {
        // 15% of 10,000 = 1,500
        let amount = apply_percentage(Decimal::new(10_000, 0), Decimal::new(15, 0), 0);
        assert_eq!(amount, Decimal::new(1_500, 0));
    }

    #[test]
    fn percentage_rounds_fraction() {
        // 15% of 333 = 49.95 -> 50 at scale 0
        let amount = apply_percentage(Decimal::new(333, 0), Decimal::new(15, 0), 0);
        assert_eq!(amount, Decimal::new(50, 0));
    }

    #[test]
    fn zero_base_yields_zero() {
        assert_eq!(
            apply_percentage(Decimal::ZERO, Decimal::new(15, 0), 0),
            Decimal::ZERO
        );
    }
}
