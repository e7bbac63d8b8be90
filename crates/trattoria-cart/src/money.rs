//! Currency amounts
//!
//! Provides [`Money`], a non-negative amount with two-decimal precision.
//! Backed by [`rust_decimal::Decimal`] so totals are exact to the cent.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

const SCALE: u32 = 2;

/// A non-negative currency amount, always held at two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal, rounding half away from zero to cents
    ///
    /// # Errors
    /// Returns error if the amount is negative
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount.to_string()));
        }
        Ok(Self(round_cents(amount)))
    }

    /// Create from an integer number of cents
    #[inline]
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::new(i64::try_from(cents).unwrap_or(i64::MAX), SCALE))
    }

    /// Create from a floating point amount (as received in JSON)
    ///
    /// # Errors
    /// Returns error if the value is negative, NaN or infinite
    pub fn from_f64(amount: f64) -> Result<Self, MoneyError> {
        let decimal = Decimal::from_f64(amount).ok_or(MoneyError::NotFinite)?;
        Self::new(decimal)
    }

    /// Underlying decimal value
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount in whole cents
    #[must_use]
    pub fn cents(&self) -> u64 {
        (self.0 * Decimal::ONE_HUNDRED).to_u64().unwrap_or(u64::MAX)
    }

    /// Lossy conversion for JSON number output
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Check if amount is zero
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a line quantity
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        let product = self
            .0
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX);
        Self(round_cents(product))
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", round_cents(self.0))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim()).map_err(|e| MoneyError::Parse(e.to_string()))?;
        Self::new(decimal)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(round_cents(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX)))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// Prices travel as JSON numbers; accept strings too since totals are rendered that way
impl serde::Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> serde::Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MoneyVisitor;

        impl<'de> serde::de::Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a non-negative amount as number or decimal string")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Money::from_f64(value).map_err(serde::de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Money::new(Decimal::from(value)).map_err(serde::de::Error::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Money::new(Decimal::from(value)).map_err(serde::de::Error::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

/// Errors that can occur when constructing amounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// Amount below zero
    #[error("negative amount: {0}")]
    Negative(String),

    /// NaN or infinite input
    #[error("amount is not a finite number")]
    NotFinite,

    /// Unparseable decimal text
    #[error("invalid amount: {0}")]
    Parse(String),
}
