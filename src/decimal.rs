use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// decimal places kept on every monetary value
pub const MONEY_SCALE: u32 = 8;

/// Money type backed by a fixed-scale decimal, so installment splits stay exact
///
/// Operators saturate at the decimal bounds instead of panicking; paths that must
/// reject an overflow use the `checked_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MONEY_SCALE))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(MONEY_SCALE)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// amount grown by a flat (non-compounding) rate, e.g. 100 at 10% -> 110
    ///
    /// Returns `None` when the result does not fit in a decimal.
    pub fn with_flat_interest(&self, rate: Rate) -> Option<Self> {
        let factor = Decimal::ONE.checked_add(rate.as_decimal())?;
        self.0
            .checked_mul(factor)
            .map(|d| Money(d.round_dp(MONEY_SCALE)))
    }

    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0
            .checked_add(other.0)
            .map(|d| Money(d.round_dp(MONEY_SCALE)))
    }

    /// how many whole `unit`s fit in this amount
    ///
    /// Returns `None` for a negative amount or a non-positive unit; saturates at `i64::MAX`.
    pub fn whole_multiples_of(&self, unit: Money) -> Option<i64> {
        if self.is_negative() || !unit.is_positive() {
            return None;
        }
        let quotient = self.0.checked_div(unit.0).unwrap_or(Decimal::MAX);
        Some(quotient.floor().to_i64().unwrap_or(i64::MAX))
    }

    /// one of `parts` equal shares of this amount
    ///
    /// Returns `None` when `parts` is zero.
    pub fn split(&self, parts: u32) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Money((self.0 / Decimal::from(parts)).round_dp(MONEY_SCALE)))
    }

    /// this amount repeated `count` times, saturating at the decimal bounds
    pub fn times(&self, count: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(count)).round_dp(MONEY_SCALE))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0).round_dp(MONEY_SCALE))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_add(other.0).round_dp(MONEY_SCALE);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).round_dp(MONEY_SCALE))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_sub(other.0).round_dp(MONEY_SCALE);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// rate type for interest rates, stored as a ratio (0.10 == 10%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from ratio (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole percentage (e.g., 10 for 10%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from fractional percentage (e.g., 12.5 for 12.5%)
    pub fn from_percentage_decimal(p: Decimal) -> Self {
        Rate(p / Decimal::from(100))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0.saturating_mul(Decimal::from(100))
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_flat_interest() {
        let principal = Money::from_major(5_000_000);
        let bill = principal.with_flat_interest(Rate::from_percentage(10));
        assert_eq!(bill, Some(Money::from_major(5_500_000)));

        let no_interest = principal.with_flat_interest(Rate::ZERO);
        assert_eq!(no_interest, Some(principal));
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        let max = Money::from_decimal(Decimal::MAX);

        assert_eq!(max.with_flat_interest(Rate::from_percentage(10)), None);
        assert_eq!(max.with_flat_interest(Rate::ZERO), Some(max));
        assert_eq!(max.checked_add(Money::from_major(1)), None);
        assert_eq!(
            Money::from_major(1).checked_add(Money::from_major(2)),
            Some(Money::from_major(3))
        );

        // operators saturate
        assert_eq!(max + Money::from_major(1), max);
        assert_eq!(max.times(3), max);
        assert_eq!(-max - Money::from_major(1), -max);
    }

    #[test]
    fn test_whole_multiples() {
        let installment = Money::from_major(110_000);
        assert_eq!(Money::from_major(330_000).whole_multiples_of(installment), Some(3));
        assert_eq!(Money::from_major(329_999).whole_multiples_of(installment), Some(2));
        assert_eq!(Money::from_major(5).whole_multiples_of(Money::ZERO), None);
        assert_eq!(Money::from_major(-5).whole_multiples_of(installment), None);

        let tiny = Money::from_str_exact("0.00000001").unwrap();
        assert_eq!(
            Money::from_decimal(Decimal::MAX).whole_multiples_of(tiny),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_split_into_installments() {
        let bill = Money::from_major(5_500_000);
        assert_eq!(bill.split(50), Some(Money::from_major(110_000)));
        assert_eq!(bill.split(0), None);

        // uneven splits keep 8 places
        let third = Money::from_major(100).split(3).unwrap();
        assert_eq!(third.as_decimal(), dec!(33.33333333));
    }

    #[test]
    fn test_sign_checks() {
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::from_major(1).is_positive());
        assert!((-Money::from_major(1)).is_negative());
    }

    #[test]
    fn test_sum_and_times() {
        let payments = vec![Money::from_major(110_000); 3];
        let total: Money = payments.iter().sum();
        assert_eq!(total, Money::from_major(110_000).times(3));
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percentage(10).to_string(), "10%");
        assert_eq!(Rate::from_percentage_decimal(dec!(12.5)).as_decimal(), dec!(0.125));
    }
}
