//! Order pricing derivation.
//!
//! Orders are priced from the cart subtotal alone: a flat shipping fee that
//! is waived above a threshold, plus a proportional tax. Tax is rounded to
//! two decimal places before it enters the total; the total is rounded after
//! summation.

use serde::{Deserialize, Serialize};

use meridian_core::Money;
use rust_decimal::Decimal;

/// Subtotals strictly above this ship free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Flat shipping fee below the threshold.
const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Tax rate (5%).
const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// The computed pricing of an order, fixed at confirmation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuote {
    /// Sum of line totals (price snapshots x quantities).
    pub items_total: Money,
    /// Shipping fee: zero above the free-shipping threshold.
    pub shipping_total: Money,
    /// Tax, rounded to two decimal places.
    pub tax_total: Money,
    /// `items + shipping + tax`, rounded to two decimal places.
    pub grand_total: Money,
}

impl OrderQuote {
    /// Derive the quote for a cart subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Money) -> Self {
        let shipping_total = if subtotal.amount() > FREE_SHIPPING_THRESHOLD {
            Money::ZERO
        } else {
            Money::new(FLAT_SHIPPING_FEE)
        };
        let tax_total = Money::new(subtotal.amount() * TAX_RATE).round2();
        let grand_total = (subtotal + shipping_total + tax_total).round2();

        Self {
            items_total: subtotal,
            shipping_total,
            tax_total,
            grand_total,
        }
    }

    /// The payable amount in integral minor units, for the payment intent.
    ///
    /// Returns `None` only for amounts beyond any plausible order size.
    #[must_use]
    pub fn total_minor_units(&self) -> Option<i64> {
        self.grand_total.minor_units()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::new(s.parse::<Decimal>().unwrap())
    }

    #[test]
    fn test_flat_fee_at_or_below_threshold() {
        for subtotal in ["0", "1", "100", "199.99", "200"] {
            let quote = OrderQuote::for_subtotal(money(subtotal));
            assert_eq!(
                quote.shipping_total,
                money("25"),
                "subtotal {subtotal} should pay flat shipping"
            );
        }
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        for subtotal in ["200.01", "201", "250", "10000"] {
            let quote = OrderQuote::for_subtotal(money(subtotal));
            assert_eq!(
                quote.shipping_total,
                Money::ZERO,
                "subtotal {subtotal} should ship free"
            );
        }
    }

    #[test]
    fn test_tax_is_five_percent_rounded() {
        let quote = OrderQuote::for_subtotal(money("250"));
        assert_eq!(quote.tax_total, money("12.50"));

        // 5% of 33.33 = 1.6665 -> 1.67 (half away from zero)
        let quote = OrderQuote::for_subtotal(money("33.33"));
        assert_eq!(quote.tax_total, money("1.67"));
    }

    #[test]
    fn test_tax_rounds_before_summation() {
        // 5% of 100.30 = 5.015 -> 5.02 before entering the total;
        // the total then sums already-rounded parts: 100.30 + 25 + 5.02.
        let quote = OrderQuote::for_subtotal(money("100.30"));
        assert_eq!(quote.tax_total, money("5.02"));
        assert_eq!(
            quote.grand_total,
            (quote.items_total + quote.shipping_total + quote.tax_total).round2()
        );
        assert_eq!(quote.grand_total, money("130.32"));
    }

    #[test]
    fn test_reference_example() {
        // Cart [{price:100, qty:1}, {price:150, qty:1}] -> subtotal 250
        let quote = OrderQuote::for_subtotal(money("250"));
        assert_eq!(quote.shipping_total, Money::ZERO);
        assert_eq!(quote.tax_total, money("12.50"));
        assert_eq!(quote.grand_total, money("262.50"));
    }

    #[test]
    fn test_total_minor_units() {
        let quote = OrderQuote::for_subtotal(money("250"));
        assert_eq!(quote.total_minor_units(), Some(26250));
    }
}
