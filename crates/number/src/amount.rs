use {
    bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive},
    derive_more::{Add, AddAssign, Sub, SubAssign, Sum},
    serde::{de, Deserializer, Serializer},
    std::{fmt, str::FromStr},
    thiserror::Error,
};

/// A monetary amount at cent precision, stored as a signed number of cents.
///
/// Serializes as a fixed 2-decimal string (`"12.34"`) and deserializes from
/// both that form and plain JSON numbers, which the session wire format uses
/// interchangeably. Anything with more than 2 decimals is rounded half-up.
#[derive(
    Clone,
    Copy,
    Default,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self × n`, saturating at the representable range.
    pub fn times(self, n: u64) -> Self {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        Self(self.0.saturating_mul(n))
    }

    /// `self − other`, saturating at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self((self.0 - other.0).max(0))
    }
}

#[derive(Debug, Error)]
pub enum InvalidAmount {
    #[error("{0:?} is not a decimal number")]
    NotDecimal(String),
    #[error("{0:?} does not fit the cent range")]
    OutOfRange(String),
}

impl FromStr for Amount {
    type Err = InvalidAmount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            BigDecimal::from_str(s.trim()).map_err(|_| InvalidAmount::NotDecimal(s.into()))?;
        Self::try_from(decimal).map_err(|_| InvalidAmount::OutOfRange(s.into()))
    }
}

impl TryFrom<BigDecimal> for Amount {
    type Error = InvalidAmount;

    fn try_from(decimal: BigDecimal) -> Result<Self, Self::Error> {
        (decimal.with_scale_round(2, RoundingMode::HalfUp) * BigDecimal::from(100))
            .to_i64()
            .map(Self)
            .ok_or_else(|| InvalidAmount::OutOfRange(decimal.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a 2-decimal amount string or a number")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                s.parse().map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let decimal = BigDecimal::from_f64(value)
                    .ok_or_else(|| E::custom(format!("{value} is not a finite amount")))?;
                Amount::try_from(decimal).map_err(E::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Amount::from_cents(value.saturating_mul(100)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let value = i64::try_from(value)
                    .map_err(|_| E::custom(format!("{value} does not fit the cent range")))?;
                self.visit_i64(value)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_two_decimals() {
        assert_eq!(amount("100.00").cents(), 10_000);
        assert_eq!(amount("0.05").cents(), 5);
        assert_eq!(amount("-0.05").cents(), -5);
        assert_eq!(amount("3").cents(), 300);
        assert_eq!(amount("100.00").to_string(), "100.00");
        assert_eq!(amount("0.05").to_string(), "0.05");
        assert_eq!(Amount::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(amount("0.055").cents(), 6);
        assert_eq!(amount("0.054").cents(), 5);
        assert_eq!(amount("1.005").cents(), 101);
    }

    #[test]
    fn rejects_garbage() {
        assert!("abc".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(amount("1.00").times(5), amount("5.00"));
        assert_eq!(amount("0.01").times(0), Amount::ZERO);
        assert_eq!(amount("100.00").saturating_sub(amount("5.00")), amount("95.00"));
        assert_eq!(amount("3.00").saturating_sub(amount("3.08")), Amount::ZERO);
        assert_eq!(amount("0.05") + amount("0.01"), amount("0.06"));
    }

    #[test]
    fn serializes_as_fixed_decimal_string() {
        assert_eq!(serde_json::to_string(&amount("5.00")).unwrap(), r#""5.00""#);
        assert_eq!(serde_json::to_string(&amount("0.10")).unwrap(), r#""0.10""#);
    }

    #[test]
    fn deserializes_from_strings_and_numbers() {
        assert_eq!(serde_json::from_str::<Amount>(r#""5.00""#).unwrap(), amount("5.00"));
        assert_eq!(serde_json::from_str::<Amount>("5").unwrap(), amount("5.00"));
        assert_eq!(serde_json::from_str::<Amount>("0.05").unwrap(), amount("0.05"));
        assert_eq!(serde_json::from_str::<Amount>("1.005").unwrap(), amount("1.01"));
        assert!(serde_json::from_str::<Amount>(r#""nope""#).is_err());
    }
}
