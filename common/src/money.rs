//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Adds the provided [`Money`] to this one.
    ///
    /// [`None`] is returned if [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        (self.currency == rhs.currency).then_some(())?;
        Some(Self {
            amount: self.amount.checked_add(rhs.amount)?,
            currency: self.currency,
        })
    }

    /// Subtracts the provided [`Money`] from this one.
    ///
    /// [`None`] is returned if [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        (self.currency == rhs.currency).then_some(())?;
        Some(Self {
            amount: self.amount.checked_sub(rhs.amount)?,
            currency: self.currency,
        })
    }

    /// Multiplies this [`Money`] by the provided `factor`.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn scale(self, factor: Decimal) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_mul(factor)?,
            currency: self.currency,
        })
    }

    /// Rounds this [`Money`] down to the nearest integer amount.
    #[must_use]
    pub fn floor(self) -> Self {
        Self {
            amount: self.amount.floor(),
            currency: self.currency,
        }
    }

    /// Returns this [`Money`], or zero if it's negative.
    #[must_use]
    pub fn clamp_negative(self) -> Self {
        if self.is_negative() {
            Self::zero(self.currency)
        } else {
            self
        }
    }

    /// Indicates whether this [`Money`] amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Indicates whether this [`Money`] amount is above zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{}{currency}", amount.normalize())
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s
            .split_at_checked(s.len() - 3)
            .ok_or("invalid currency")?;
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Indian Rupee."]
        Inr = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn inr(s: &str) -> Money {
        Money {
            amount: decimal(s),
            currency: Currency::Inr,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("1550INR").unwrap(), inr("1550"));

        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45In").is_err());
        assert!(Money::from_str("123.45Rupees").is_err());
        assert!(Money::from_str("123.45RUB").is_err());
        assert!(Money::from_str("1\u{20b9}A").is_err());
        assert!(Money::from_str("1550\u{20b9}").is_err());

        assert!(Money::from_str("123.00INR").is_ok());
        assert!(Money::from_str("123.0INR").is_ok());
        assert!(Money::from_str("123INR").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(inr("123.45").to_string(), "123.45INR");
        assert_eq!(inr("123.50").to_string(), "123.5INR");
        assert_eq!(inr("123.00").to_string(), "123INR");
        assert_eq!(inr("123.0").to_string(), "123INR");
        assert_eq!(inr("123").to_string(), "123INR");
        assert_eq!(
            Money {
                amount: decimal("9.99"),
                currency: Currency::Usd,
            }
            .to_string(),
            "9.99USD",
        );
    }

    #[test]
    fn arithmetic_requires_same_currency() {
        let usd = Money {
            amount: decimal("10"),
            currency: Currency::Usd,
        };

        assert_eq!(inr("10").checked_add(inr("2.5")), Some(inr("12.5")));
        assert_eq!(inr("10").checked_sub(inr("12")), Some(inr("-2")));
        assert_eq!(inr("10").checked_add(usd), None);
        assert_eq!(inr("10").checked_sub(usd), None);
    }

    #[test]
    fn rounds_and_clamps() {
        assert_eq!(inr("250.75").floor(), inr("250"));
        assert_eq!(inr("-3").clamp_negative(), inr("0"));
        assert_eq!(inr("3").clamp_negative(), inr("3"));
        assert_eq!(inr("500").scale(decimal("0.5")), Some(inr("250")));

        assert!(!inr("0").is_negative());
        assert!(!inr("0").is_positive());
        assert!(inr("0.01").is_positive());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&inr("1550")).unwrap();
        assert_eq!(json, r#""1550INR""#);

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inr("1550"));
    }
}
