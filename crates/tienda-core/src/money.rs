//! # Money Module
//!
//! Provides the `Money` type for handling Lempira amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    115 / 1.15 = 100.00000000000001                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos for stored amounts,                     │
//! │  base-10 Decimal for the one division the ISV engine needs,             │
//! │  and a single rounding step back to centavos.                           │
//! │                                                                         │
//! │    Money(11500) ──► Decimal 115.00 ──► / 1.15 ──► 100.00 ──► Money(10000)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::money::Money;
//!
//! let price = Money::from_cents(1099); // L 10.99
//! let doubled: Money = price * 2;      // L 21.98
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 1599);
//! assert_eq!(doubled.to_string(), "L 21.98");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::CURRENCY_SYMBOL;

/// Rounding used whenever a Decimal amount is brought back to centavos.
///
/// Half away from zero: 0.005 → 0.01, 0.015 → 0.02, -0.005 → -0.01.
/// For the non-negative amounts the UI supplies this is plain half-up.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (1/100 of a Lempira).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values; the engine accumulates
///   whatever the caller hands it
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// Product.sale_price ──► LineItem.unit_price ──► LineItem.line_total
///                                                      │
///                                  compute_breakdown ◄─┘
///                                          │
///                                          ▼
///              TaxBreakdown { exento, gravado15, gravado18, isv15, isv18 }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // L 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from lempiras and centavos.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -L 5.50.
    ///
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
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

    /// Converts a Decimal amount in lempiras to centavos.
    ///
    /// Rounds half away from zero. Values beyond the i64 range saturate,
    /// so the conversion never fails.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tienda_core::money::Money;
    ///
    /// let amount = Decimal::new(100005, 4); // 10.0005
    /// assert_eq!(Money::from_decimal(amount).cents(), 1000);
    ///
    /// let half = Decimal::new(10005, 3); // 10.005
    /// assert_eq!(Money::from_decimal(half).cents(), 1001);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|c| c.round_dp_with_strategy(0, ROUNDING));

        match cents.and_then(|c| c.to_i64()) {
            Some(cents) => Money(cents),
            None if amount.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Returns the amount in lempiras as an exact Decimal.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tienda_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(11500).to_decimal(), Decimal::new(11500, 2));
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-lempira portion.
    ///
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).lempiras(), 10);
    /// assert_eq!(Money::from_cents(-550).lempiras(), -5);
    /// ```
    #[inline]
    pub const fn lempiras(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use tienda_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2999); // L 29.99
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a rate (e.g. 0.15) and rounds the result to centavos.
    ///
    /// Used for supplier orders, where ISV is charged on top of the
    /// purchase subtotal rather than extracted from a tax-inclusive total.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tienda_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(1003); // L 10.03
    /// let isv = subtotal.apply_rate(Decimal::new(15, 2));
    /// // 10.03 × 0.15 = 1.5045 → L 1.50
    /// assert_eq!(isv.cents(), 150);
    /// ```
    pub fn apply_rate(&self, rate: Decimal) -> Money {
        Money::from_decimal(self.to_decimal() * rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `L 1234.56` rendering.
///
/// ## Note
/// Locale-aware formatting (thousands separators) belongs to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{} {}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            self.lempiras().abs(),
            self.cents_part()
        )
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.lempiras(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "L 10.99");
        assert_eq!(Money::from_cents(500).to_string(), "L 5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-L 5.50");
        assert_eq!(Money::zero().to_string(), "L 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(0.005)).cents(), 1);
        assert_eq!(Money::from_decimal(dec!(0.015)).cents(), 2);
        assert_eq!(Money::from_decimal(dec!(0.0149)).cents(), 1);
        assert_eq!(Money::from_decimal(dec!(-0.005)).cents(), -1);
        assert_eq!(Money::from_decimal(dec!(99.999)).cents(), 10000);
    }

    #[test]
    fn test_from_decimal_saturates() {
        assert_eq!(Money::from_decimal(Decimal::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_decimal(Decimal::MIN).cents(), i64::MIN);
    }

    #[test]
    fn test_to_decimal_is_exact() {
        assert_eq!(Money::from_cents(5901).to_decimal(), dec!(59.01));
        assert_eq!(Money::from_cents(-1).to_decimal(), dec!(-0.01));
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(Money::from_cents(10000).apply_rate(dec!(0.15)).cents(), 1500);
        assert_eq!(Money::from_cents(1003).apply_rate(dec!(0.15)).cents(), 150);
        assert_eq!(Money::from_cents(1010).apply_rate(dec!(0.15)).cents(), 152);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
