use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 2 decimal places precision, cent-level accuracy.
/// Midpoints round away from zero, so 0.005 becomes 0.01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal, rounding to cents
    pub fn from_decimal(d: Decimal) -> Self {
        let mut cents = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // keep the stored scale at 2 so values display and serialize as cents
        cents.rescale(2);
        Money(cents)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s)?))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money::from_decimal(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// check if strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 / other)
    }
}

/// annual interest rate expressed in percent (12 means 12% per year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from percent value (e.g. dec!(7.5) for 7.5% p.a.)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p)
    }

    /// create from whole percent
    pub fn from_whole_percent(p: u32) -> Self {
        Rate(Decimal::from(p))
    }

    /// annual rate in percent
    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// monthly rate as a plain fraction: percent / 100 / 12
    pub fn monthly_fraction(&self) -> Decimal {
        self.0 / Decimal::from(100) / Decimal::from(12)
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_percent(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_cents() {
        let m = Money::from_decimal(dec!(100.128));
        assert_eq!(m.to_string(), "100.13");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(2.005)), Money::from_cents(201));
        assert_eq!(Money::from_decimal(dec!(-2.005)), Money::from_cents(-201));
        assert_eq!(Money::from_decimal(dec!(2.015)), Money::from_cents(202));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_str_exact("150.25").unwrap();
        let b = Money::from_major(50);
        assert_eq!(a - b, Money::from_str_exact("100.25").unwrap());
        assert_eq!(a + b, Money::from_str_exact("200.25").unwrap());

        let mut c = Money::from_major(1000);
        c -= Money::from_cents(50);
        assert_eq!(c, Money::from_str_exact("999.50").unwrap());
    }

    #[test]
    fn test_division_rounds() {
        // 1000 / 3 = 333.333... -> 333.33
        let m = Money::from_major(1000) / dec!(3);
        assert_eq!(m, Money::from_cents(33333));
    }

    #[test]
    fn test_monthly_fraction() {
        let rate = Rate::from_whole_percent(12);
        assert_eq!(rate.monthly_fraction(), dec!(0.01));

        assert!(Rate::ZERO.monthly_fraction().is_zero());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percent(dec!(7.5)).to_string(), "7.5%");
    }
}
