//! # Money Module
//!
//! Provides the `Money` type used for every price, total and payment split.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Cart: 2 × $0.99 + 1 × $5.49                                            │
//! │    as floats  = 7.470000000000001  ❌ total never equals the lines      │
//! │    as cents   = 198 + 549 = 747    ✅ exact                             │
//! │                                                                         │
//! │  The engine compares `sale.total` with the sum of its lines and         │
//! │  `cash + card` with `total`; both checks must be exact.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use retail_core::money::Money;
//!
//! let unit = Money::from_cents(99); // $0.99
//! let line = unit.multiply_quantity(2);
//! assert_eq!(line.cents(), 198);
//! assert_eq!(line.to_string(), "$1.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that intermediate differences (e.g. `cash - (total - card)`)
/// can go below zero before being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use retail_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1299).cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use retail_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(29, 99).cents(), 2999);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollar portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cent portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use retail_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-40).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(253).floor_zero().cents(), 253);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Estimates tax at the given rate.
    ///
    /// Integer math: `(amount * bps + 5000) / 10000`, i.e. half-up
    /// rounding to the cent. Uses i128 so large report totals cannot
    /// overflow.
    ///
    /// ```rust
    /// use retail_core::money::Money;
    /// use retail_core::types::TaxRate;
    ///
    /// // $37.46 at 5% = $1.873 → $1.87
    /// let tax = Money::from_cents(3746).calculate_tax(TaxRate::from_bps(500));
    /// assert_eq!(tax.cents(), 187);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies a unit price by a quantity, saturating at the i64 bounds.
    ///
    /// ```text
    /// Organic Bananas $0.99 × 2 ──► line total $1.98
    /// ```
    ///
    /// Use [`Money::checked_mul`] where an exact answer is required.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `self × qty`, or `None` on overflow.
    ///
    /// ```rust
    /// use retail_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(99).checked_mul(2), Some(Money::from_cents(198)));
    /// assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    #[inline]
    pub const fn saturating_sub(&self, other: Money) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-grade formatting; the UI owns localized display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Saturating, so report totals over an arbitrarily long log cannot panic.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.saturating_add(m))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(747);
        assert_eq!(money.cents(), 747);
        assert_eq!(money.dollars(), 7);
        assert_eq!(money.cents_part(), 47);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(747).to_string(), "$7.47");
        assert_eq!(Money::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Money::from_cents(-253).to_string(), "-$2.53");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(747);

        assert_eq!((a - b).cents(), 253);
        assert_eq!((a + b).cents(), 1747);
        assert_eq!((b * 3).cents(), 2241);
    }

    #[test]
    fn test_sum_of_lines_is_exact() {
        // 2 × $0.99 + 1 × $5.49, the case floats get wrong
        let lines = [
            Money::from_cents(99).multiply_quantity(2),
            Money::from_cents(549).multiply_quantity(1),
        ];
        let total: Money = lines.iter().sum();
        assert_eq!(total, Money::from_cents(747));
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!(big.checked_add(Money::from_cents(1)), None);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(Money::from_cents(549).checked_mul(3), Some(Money::from_cents(1647)));
        assert_eq!(
            Money::from_cents(198).checked_add(Money::from_cents(549)),
            Some(Money::from_cents(747))
        );
    }

    #[test]
    fn test_saturating_paths_do_not_panic() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!(big.multiply_quantity(3), big);
        assert_eq!(big.saturating_add(big), big);
        assert_eq!(Money::from_cents(i64::MIN).saturating_sub(big), Money::from_cents(i64::MIN));

        let total: Money = [big, big, Money::from_cents(1)].iter().sum();
        assert_eq!(total, big);
    }

    #[test]
    fn test_floor_zero() {
        assert!(Money::from_cents(-1).floor_zero().is_zero());
        assert!(Money::from_cents(1).floor_zero().is_positive());
    }

    #[test]
    fn test_flat_tax_estimate() {
        let sales = Money::from_cents(10_000);
        assert_eq!(sales.calculate_tax(TaxRate::from_bps(500)).cents(), 500);
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(2999)).unwrap();
        assert_eq!(json, "2999");
    }
}
