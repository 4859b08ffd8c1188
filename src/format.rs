//! Presentation helpers
//!
//! All rounding happens here, never in the computations feeding it.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::Money;

/// Decimal places shown for currency, percentages and prices
pub const DISPLAY_DP: u32 = 2;

/// Round half away from zero and pad to exactly `dp` places
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// "$15.90"
pub fn usd(amount: Money) -> String {
    let text = fixed(amount.inner(), DISPLAY_DP);
    match text.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", text),
    }
}

/// "15.90%"
pub fn percent(value: Decimal) -> String {
    format!("{}%", fixed(value, DISPLAY_DP))
}

/// Price with two decimals, e.g. for grid range labels
pub fn price(value: f64) -> String {
    format!("{:.2}", value)
}

/// "$0.53 (0.53%)"
pub fn amount_with_percent(amount: Money, pct: Decimal) -> String {
    format!("{} ({})", usd(amount), percent(pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_pads_and_rounds_half_away() {
        assert_eq!(fixed(dec!(15.9), 2), "15.90");
        assert_eq!(fixed(dec!(0.125), 2), "0.13");
        assert_eq!(fixed(dec!(-0.125), 2), "-0.13");
        assert_eq!(fixed(dec!(3), 2), "3.00");
        assert_eq!(fixed(dec!(1.23456), 4), "1.2346");
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(Money::new(dec!(0.53))), "$0.53");
        assert_eq!(usd(Money::new(dec!(-2.5))), "-$2.50");
        assert_eq!(usd(Money::ZERO), "$0.00");
    }

    #[test]
    fn test_amount_with_percent() {
        assert_eq!(
            amount_with_percent(Money::new(dec!(15.9)), dec!(15.9)),
            "$15.90 (15.90%)"
        );
    }

    #[test]
    fn test_price() {
        assert_eq!(price(118.920_711_5), "118.92");
        assert_eq!(price(100.0), "100.00");
    }
}
