use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount of minor units as `"<symbol> <units>,<cents>"`, e.g. `€ 1000,00`.
///
/// Fractions of a cent are rounded up.
pub fn format_minor_units(value: Decimal, symbol: &str) -> String {
    let cents = value.round_dp_with_strategy(0, RoundingStrategy::AwayFromZero);
    let sign = if cents.is_sign_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };
    let cents = cents.abs();
    let units = (cents / Decimal::ONE_HUNDRED).trunc();
    let remainder = cents - units * Decimal::ONE_HUNDRED;
    format!("{symbol} {sign}{units},{remainder:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_amount() {
        assert_eq!(format_minor_units(dec!(100000), "€"), "€ 1000,00");
    }

    #[test]
    fn small_amounts_are_zero_padded() {
        assert_eq!(format_minor_units(dec!(5), "€"), "€ 0,05");
        assert_eq!(format_minor_units(dec!(120), "€"), "€ 1,20");
    }

    #[test]
    fn fractional_cents_round_up() {
        assert_eq!(format_minor_units(dec!(39.256), "€"), "€ 0,40");
        assert_eq!(format_minor_units(dec!(11216.01), "$"), "$ 112,17");
    }

    #[test]
    fn rounding_carries_into_units() {
        assert_eq!(format_minor_units(dec!(199.99), "€"), "€ 2,00");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_minor_units(dec!(-250), "€"), "€ -2,50");
    }
}
