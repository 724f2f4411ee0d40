//! Amount type for ticket deltas and totals.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts arrive from the REST API
//! either as JSON numbers or as strings that may carry thousands separators, and anything that is
//! not a finite decimal is treated as a missing amount rather than a failed payload.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Represents a number of tickets, signed when it is a transaction delta and non-negative when it
/// is a usage total.
///
/// # Examples
///
/// Parsing with thousands separators:
/// ```
/// # use wallet_summary::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-1,250").unwrap();
/// assert_eq!(amount.to_string(), "-1,250");
/// assert_eq!(amount.abs().to_string(), "1,250");
/// ```
///
/// Fractional amounts keep two decimals when displayed:
/// ```
/// # use wallet_summary::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12.5").unwrap();
/// assert_eq!(amount.to_string(), "12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Returns the magnitude of the amount, which is what usage totals are built from.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Adds `rhs`, returning `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Remove commas (thousand separators)
        let without_commas = s.trim().replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        if self.0.fract().is_zero() {
            write!(f, "{sign}{}", format_num::format_num!(",.0f", num))
        } else {
            write!(f, "{sign}{}", format_num::format_num!(",.2f", num))
        }
    }
}

/// Whole amounts that fit in an `i64` are written as integers, and amounts that survive the trip
/// through `f64` unchanged as floats. Anything else is written as a decimal string, which the
/// lenient deserializer reads back exactly.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self.0.normalize();
        if value.fract().is_zero() {
            if let Some(whole) = value.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        if let Some(float) = value.to_f64() {
            if Decimal::from_str(&float.to_string()).ok() == Some(value) {
                return serializer.serialize_f64(float);
            }
        }
        serializer.serialize_str(&value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)?.parse() {
            Some(amount) => Ok(amount),
            None => Err(serde::de::Error::custom("expected a finite number of tickets")),
        }
    }
}

/// The shapes an amount can take on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawAmount {
    fn parse(self) -> Option<Amount> {
        match self {
            RawAmount::Number(n) => Amount::from_str(&n.to_string()).ok(),
            RawAmount::Text(s) => Amount::from_str(&s).ok(),
            RawAmount::Other(_) => None,
        }
    }
}

/// Deserializes an optional amount, mapping anything that is not a finite decimal to `None`
/// instead of failing the enclosing record.
///
/// The value is read as raw JSON text, so numbers that do not fit in an `f64` (such as `1e400`)
/// reach the decimal parser instead of failing the whole payload.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(parse_raw(raw.get()))
}

fn parse_raw(raw: &str) -> Option<Amount> {
    match raw.trim_start().as_bytes().first()? {
        b'"' => serde_json::from_str::<String>(raw)
            .ok()
            .and_then(|s| Amount::from_str(&s).ok()),
        b'-' | b'0'..=b'9' => Amount::from_str(raw.trim()).ok(),
        _ => None,
    }
}

/// Saturates at the largest representable magnitude instead of panicking.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient")]
        amount: Option<Amount>,
    }

    fn holder(json: &str) -> Option<Amount> {
        serde_json::from_str::<Holder>(json).unwrap().amount
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50").unwrap();
        assert_eq!(amount.value(), Decimal::from(50));
    }

    #[test]
    fn test_parse_negative_with_commas() {
        let amount = Amount::from_str("-60,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from(-60000));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("NaN").is_err());
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(1250).to_string(), "1,250");
        assert_eq!(Amount::from(-30).to_string(), "-30");
        assert_eq!(Amount::ZERO.to_string(), "0");
        assert_eq!(Amount::from_str("0.5").unwrap().to_string(), "0.50");
    }

    #[test]
    fn test_abs_and_sum() {
        let total: Amount = [Amount::from(50), Amount::from(-50), Amount::from(10)]
            .iter()
            .map(Amount::abs)
            .sum();
        assert_eq!(total, Amount::from(110));
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert!(!Amount::ZERO.is_negative());
        assert!(Amount::from(-1).is_negative());
    }

    #[test]
    fn test_serialize_whole_as_integer() {
        let json = serde_json::to_string(&Amount::from(100)).unwrap();
        assert_eq!(json, "100");
        let json = serde_json::to_string(&Amount::from_str("2.5").unwrap()).unwrap();
        assert_eq!(json, "2.5");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        assert_eq!(holder(r#"{"amount": 30}"#), Some(Amount::from(30)));
        assert_eq!(holder(r#"{"amount": -30.5}"#), Amount::from_str("-30.5").ok());
        assert_eq!(holder(r#"{"amount": "1,200"}"#), Some(Amount::from(1200)));
    }

    #[test]
    fn test_deserialize_missing_or_invalid_is_none() {
        assert_eq!(holder(r#"{}"#), None);
        assert_eq!(holder(r#"{"amount": null}"#), None);
        assert_eq!(holder(r#"{"amount": "NaN"}"#), None);
        assert_eq!(holder(r#"{"amount": true}"#), None);
        assert_eq!(holder(r#"{"amount": {"value": 3}}"#), None);
    }

    #[test]
    fn test_deserialize_out_of_range_is_none() {
        assert_eq!(holder(r#"{"amount": 1e400}"#), None);
        assert_eq!(holder(r#"{"amount": -1e400}"#), None);
        assert_eq!(holder(r#"{"amount": "1e400"}"#), None);
        assert_eq!(holder(r#"{"amount": 1.5e3}"#), Some(Amount::from(1500)));
        assert_eq!(
            holder(r#"{"amount": "79228162514264337593543950335"}"#),
            Some(Amount::new(Decimal::MAX))
        );
    }

    #[test]
    fn test_checked_and_saturating_add() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.checked_add(Amount::from(1)), None);
        assert_eq!(max + Amount::from(1), max);
        assert_eq!(
            Amount::from(2).checked_add(Amount::from(3)),
            Some(Amount::from(5))
        );
        let mut total = max;
        total += max;
        assert_eq!(total, max);
    }

    #[test]
    fn test_serialize_inexact_as_string() {
        let json = serde_json::to_string(&Amount::new(Decimal::MAX)).unwrap();
        assert_eq!(json, r#""79228162514264337593543950335""#);
        let precise = Amount::from_str("0.1234567890123456789012345").unwrap();
        let json = serde_json::to_string(&precise).unwrap();
        assert_eq!(json, r#""0.1234567890123456789012345""#);
        assert_eq!(holder(&format!(r#"{{"amount": {json}}}"#)), Some(precise));
        let json = serde_json::to_string(&Amount::from_str("0.1").unwrap()).unwrap();
        assert_eq!(json, "0.1");
    }

    #[test]
    fn test_strict_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
        assert_eq!(serde_json::from_str::<Amount>("12").unwrap(), Amount::from(12));
    }
}
