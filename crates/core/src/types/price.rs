//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as plain JSON numbers (euros, not cents). Older
//! storefront versions occasionally wrote prices as strings, so decoding
//! accepts numeric strings as well, and [`deserialize_lenient`] maps anything
//! else to zero for records where a bad price must not drop the whole record.

use core::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors produced when building a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A price in the shop currency.
///
/// The sign is not checked here: [`Price::non_negative`] is the gate used by
/// input forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount without validation.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Wrap a decimal amount, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount < 0`.
    pub fn non_negative(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse free-form price text the way the product form does.
    ///
    /// Accepts `12.50`, `12,50` and surrounding whitespace. Only the leading
    /// number counts, so `12abc` is 12. Text that does not start with a
    /// number becomes zero.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let cleaned = input.trim().replace(',', ".");
        let number = numeric_prefix(&cleaned);
        Decimal::from_str(&number)
            .or_else(|_| Decimal::from_scientific(&number))
            .map_or(Self::ZERO, |d| Self(d.normalize()))
    }

    /// Build a price from a float, returning `None` for NaN or infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(|d| Self(d.normalize()))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        price_from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
    }
}

/// Decode a price, mapping any non-numeric value to zero.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(price_from_json(&value).unwrap_or(Price::ZERO))
}

/// The longest leading `[sign] digits [. digits] [e [sign] digits]` of `s`,
/// with a `0` inserted before a bare fraction. Empty if `s` does not start
/// with a number.
fn numeric_prefix(s: &str) -> String {
    let bytes = s.as_bytes();
    let digits_from = |at: usize| {
        bytes
            .get(at..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut number = String::new();
    let mut end = 0;
    if let Some(&(sign @ (b'+' | b'-'))) = bytes.first() {
        number.push(char::from(sign));
        end = 1;
    }

    let int = digits_from(end);
    let frac = if bytes.get(end + int) == Some(&b'.') {
        digits_from(end + int + 1)
    } else {
        0
    };
    if int == 0 && frac == 0 {
        return String::new();
    }

    if int == 0 {
        number.push('0');
    }
    number.push_str(s.get(end..end + int).unwrap_or_default());
    end += int;
    if frac > 0 {
        number.push_str(s.get(end..end + 1 + frac).unwrap_or_default());
        end += 1 + frac;
    } else if bytes.get(end) == Some(&b'.') {
        end += 1;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp = digits_from(end + 1 + sign);
        if exp > 0 {
            number.push_str(s.get(end..end + 1 + sign + exp).unwrap_or_default());
        }
    }
    number
}

fn price_from_json(value: &serde_json::Value) -> Option<Price> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(|i| Price(Decimal::from(i)))
            .or_else(|| n.as_f64().and_then(Price::from_f64)),
        serde_json::Value::String(s) => {
            let cleaned = s.trim().replace(',', ".");
            Decimal::from_str(&cleaned).ok().map(|d| Price(d.normalize()))
        }
        _ => None,
    }
}
