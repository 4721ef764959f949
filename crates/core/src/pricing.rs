//! Exact fixed-point pricing arithmetic.
//!
//! Prices are user-facing currency values, so all math stays in
//! [`rust_decimal::Decimal`] - never binary floating point. Totals are
//! always recomputed from scratch over the full set of lines rather than
//! kept as an incremental counter, so repeated cart mutations cannot
//! accumulate drift.

use rust_decimal::Decimal;

/// Total for one line: `price * quantity`.
#[must_use]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Total over a set of `(price, quantity)` lines.
#[must_use]
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn line_total_is_exact() {
        assert_eq!(line_total(dec("10.00"), 2), dec("20.00"));
        assert_eq!(line_total(dec("0.10"), 3), dec("0.30"));
        assert_eq!(line_total(dec("19.99"), 0), dec("0.00"));
    }

    #[test]
    fn order_total_sums_all_lines() {
        // A at 10.00 x2 plus B at 5.00 x1 = 25.00.
        let total = order_total([(dec("10.00"), 2), (dec("5.00"), 1)]);
        assert_eq!(total, dec("25.00"));
    }

    #[test]
    fn no_penny_drift_across_many_lines() {
        // 0.10 summed a thousand times is exactly 100.00 in decimal,
        // where f64 would already have drifted.
        let total = order_total(std::iter::repeat_n((dec("0.10"), 1), 1000));
        assert_eq!(total, dec("100.00"));
    }

    #[test]
    fn empty_set_totals_zero() {
        assert_eq!(order_total(std::iter::empty()), Decimal::ZERO);
    }
}
