//! Money type for representing prices in soles.
//!
//! Amounts are exact decimals so that catalog prices such as `0.23` and
//! client-submitted prices carrying sub-cent noise compare without
//! floating-point drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "S/";

/// Absolute tolerance when comparing a charged price to the catalog price.
pub const PRICE_TOLERANCE: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

/// A monetary amount in soles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money value from a decimal amount.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from an integer number of céntimos.
    ///
    /// ```
    /// use ferre_commerce::money::Money;
    /// let price = Money::from_cents(1500);
    /// assert_eq!(price.display(), "S/ 15.00");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Zero soles.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Absolute difference between two amounts.
    pub fn abs_diff(&self, other: &Money) -> Money {
        Money((self.0 - other.0).abs())
    }

    /// Check whether `other` lies within `tolerance` of this amount (inclusive).
    pub fn within(&self, other: &Money, tolerance: Money) -> bool {
        self.abs_diff(other) <= tolerance
    }

    /// Round to two decimal places, half away from zero.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Try to multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(factor)).map(Money)
    }

    /// Multiply by a quantity, clamping at the representable bounds.
    pub fn saturating_multiply(&self, factor: i64) -> Money {
        Money(self.0.saturating_mul(Decimal::from(factor)))
    }

    /// Add another amount, clamping at the representable bounds.
    pub fn saturating_add(&self, other: &Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Format as a display string (e.g., "S/ 15.00").
    pub fn display(&self) -> String {
        format!("{} {}", CURRENCY_SYMBOL, self.display_amount())
    }

    /// Format without the symbol (e.g., "15.00").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.rounded().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money(self.0 * Decimal::from(factor))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_from_cents() {
        let m = Money::from_cents(23);
        assert_eq!(m, money("0.23"));
        assert_eq!(m.display(), "S/ 0.23");
    }

    #[test]
    fn test_money_display_rounds() {
        assert_eq!(money("15").display(), "S/ 15.00");
        assert_eq!(money("52.175").display_amount(), "52.18");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = money("0.23");
        assert_eq!(a * 100, money("23.00"));
        assert_eq!(money("23.00") - money("15.00"), money("8.00"));
        assert_eq!(money("360.00") + money("40.00"), money("400.00"));
    }

    #[test]
    fn test_money_tolerance_boundary() {
        let expected = money("0.23");
        assert!(expected.within(&money("0.235"), PRICE_TOLERANCE));
        assert!(expected.within(&money("0.24"), PRICE_TOLERANCE));
        assert!(!expected.within(&money("0.25"), PRICE_TOLERANCE));
    }

    #[test]
    fn test_money_sum() {
        let values = [money("1.10"), money("2.20"), money("3.30")];
        assert_eq!(values.into_iter().sum::<Money>(), money("6.60"));
        assert_eq!(Money::new(Decimal::MAX).saturating_add(&money("1.00")), Money::new(Decimal::MAX));
    }

    #[test]
    fn test_money_serializes_as_string() {
        let json = serde_json::to_string(&money("15.00")).unwrap();
        assert_eq!(json, "\"15.00\"");
        let back: Money = serde_json::from_str("15.5").unwrap();
        assert_eq!(back, money("15.50"));
    }
}
