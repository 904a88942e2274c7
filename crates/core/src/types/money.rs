//! Decimal money type.
//!
//! All prices and order amounts in Meridian are carried as [`Money`], a thin
//! wrapper over `rust_decimal::Decimal`. Amounts stay unrounded through
//! arithmetic; rounding to two decimal places happens at presentation and at
//! the payment boundary, where processors want integral minor units.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency's standard unit (dollars, not cents).
///
/// Serializes transparently as its decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of currency units.
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to two decimal places, half away from zero.
    #[must_use]
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// The amount in integral minor units (cents), rounded half away from zero.
    ///
    /// Payment intents are denominated in minor units. Returns `None` if the
    /// amount does not fit in an `i64`.
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    /// Formats with exactly two decimal places (`12.50`), no currency symbol.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        // 2.005 -> 2.01, not banker's 2.00
        let m = Money::new(Decimal::new(2005, 3));
        assert_eq!(m.round2().amount(), Decimal::new(201, 2));
    }

    #[test]
    fn test_minor_units() {
        let m = Money::new(Decimal::new(26250, 2)); // 262.50
        assert_eq!(m.minor_units(), Some(26250));

        // 19.999 rounds up to 2000 cents
        let m = Money::new(Decimal::new(19999, 3));
        assert_eq!(m.minor_units(), Some(2000));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Money::from_major(25).to_string(), "25.00");
        assert_eq!(Money::new(Decimal::new(125, 1)).to_string(), "12.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(100);
        let b = Money::new(Decimal::new(1550, 2)); // 15.50
        assert_eq!((a + b).to_string(), "115.50");
        assert_eq!((a - b).to_string(), "84.50");
        assert_eq!((b * 3).to_string(), "46.50");
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(100), Money::from_major(150)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_major(250));
    }

    #[test]
    fn test_ordering() {
        assert!(Money::from_major(201) > Money::from_major(200));
        assert!(Money::ZERO < Money::from_major(1));
    }

    #[test]
    fn test_serde_transparent() {
        let m = Money::new(Decimal::new(1999, 2));
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
