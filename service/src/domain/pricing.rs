//! Booking price calculation.

use common::{Money, Percent};
use derive_more::{Display, Error as StdError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::domain::{
    booking::{Delivery, Duration},
    equipment::TransportCharge,
};

/// Pricing policy of the marketplace.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault,
)]
#[serde(default)]
pub struct Policy {
    /// Working hours billed for a single day of rent.
    #[default(8)]
    pub hours_per_day: u8,

    /// Discount applied to hourly rates when renting by days.
    #[default(Policy::DEFAULT_DAILY_DISCOUNT)]
    pub daily_discount: Percent,

    /// Share of the transport charge refunded when the farmer picks the
    /// equipment up.
    #[default(Policy::DEFAULT_PICKUP_DISCOUNT)]
    pub pickup_discount: Percent,

    /// Lowest share of a quote a farmer may propose while negotiating.
    #[default(Policy::DEFAULT_NEGOTIATION_FLOOR)]
    pub negotiation_floor: Percent,
}

impl Policy {
    /// Default [`Policy::daily_discount`] of `10%`.
    #[expect(unsafe_code, reason = "constant within range")]
    pub const DEFAULT_DAILY_DISCOUNT: Percent =
        unsafe { Percent::new_unchecked(Decimal::TEN) };

    /// Default [`Policy::pickup_discount`] of `50%`.
    #[expect(unsafe_code, reason = "constant within range")]
    pub const DEFAULT_PICKUP_DISCOUNT: Percent = unsafe {
        Percent::new_unchecked(Decimal::from_parts(50, 0, 0, false, 0))
    };

    /// Default [`Policy::negotiation_floor`] of `70%`.
    #[expect(unsafe_code, reason = "constant within range")]
    pub const DEFAULT_NEGOTIATION_FLOOR: Percent = unsafe {
        Percent::new_unchecked(Decimal::from_parts(70, 0, 0, false, 0))
    };

    /// Calculates a [`Quote`] for the provided [`Request`].
    ///
    /// ```text
    /// base      = days × (rate × hours_per_day × (1 - daily_discount))
    ///           | hours × rate
    /// operator  = operator_rate × billed hours
    /// transport = + transport_charge                          (delivery)
    ///           | - floor(transport_charge × pickup_discount)  (pickup)
    /// total     = max(0, base + operator + transport)
    /// ```
    ///
    /// # Errors
    ///
    /// If the amounts are in different currencies, or on overflow.
    pub fn quote(&self, req: Request) -> Result<Quote, Error> {
        let Request {
            duration,
            hourly_rate,
            operator_rate,
            delivery,
            transport_charge,
        } = req;

        let hours = duration.hours(self.hours_per_day);
        let base = match duration {
            Duration::Hours(n) => hourly_rate.scale(n.get().into()),
            Duration::Days(n) => hourly_rate
                .scale(self.hours_per_day.into())
                .and_then(|day| self.daily_discount.complement().of(day))
                .and_then(|day| day.scale(n.get().into())),
        }
        .ok_or(Error::Overflow)?;

        let operator = operator_rate
            .map(|rate| rate.scale(hours.into()).ok_or(Error::Overflow))
            .transpose()?;

        let charge = transport_charge.money();
        let transport = match delivery {
            Delivery::Delivery { .. } => charge,
            Delivery::Pickup => {
                let discount = self
                    .pickup_discount
                    .of(charge)
                    .ok_or(Error::Overflow)?
                    .floor();
                Money::zero(charge.currency)
                    .checked_sub(discount)
                    .ok_or(Error::Overflow)?
            }
        };

        let total = operator
            .map_or(Some(base), |op| base.checked_add(op))
            .and_then(|sum| sum.checked_add(transport))
            .ok_or_else(|| {
                if [Some(transport.currency), operator.map(|m| m.currency)]
                    .into_iter()
                    .flatten()
                    .all(|c| c == base.currency)
                {
                    Error::Overflow
                } else {
                    Error::CurrencyMismatch
                }
            })?
            .clamp_negative();

        Ok(Quote {
            hours,
            base,
            operator,
            transport,
            total,
        })
    }

    /// Returns the lowest price a farmer may propose for the provided quoted
    /// `total`.
    #[must_use]
    pub fn negotiation_floor(&self, total: Money) -> Option<Money> {
        self.negotiation_floor.of(total)
    }
}

/// Input of a price calculation.
#[derive(Clone, Debug)]
pub struct Request {
    /// [`Duration`] of the rent.
    pub duration: Duration,

    /// Hourly rate of the equipment.
    pub hourly_rate: Money,

    /// Hourly rate of the booked operator, if any.
    pub operator_rate: Option<Money>,

    /// How the equipment reaches the farm.
    pub delivery: Delivery,

    /// Transport charge of the equipment.
    pub transport_charge: TransportCharge,
}

/// Priced breakdown of a booking.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Quote {
    /// Billed hours.
    pub hours: u32,

    /// Price of the equipment itself.
    pub base: Money,

    /// Price of the operator's work, if booked.
    pub operator: Option<Money>,

    /// Transport adjustment: the charge for delivery, or a negative discount
    /// for pickup.
    pub transport: Money,

    /// Total price, never negative.
    pub total: Money,
}

/// Error of a price calculation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Amounts are in different currencies.
    #[display("Prices are in different currencies")]
    CurrencyMismatch,

    /// Calculation overflowed.
    #[display("Price calculation overflow")]
    Overflow,
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::Money;

    use crate::domain::{
        booking::{Address, Delivery, Duration},
        equipment::TransportCharge,
    };

    use super::{Error, Policy, Request};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn n(v: u32) -> NonZeroU32 {
        NonZeroU32::new(v).unwrap()
    }

    fn delivery() -> Delivery {
        Delivery::Delivery {
            address: Address::new("Plot 12, Wagholi").unwrap(),
        }
    }

    fn tractor(duration: Duration, delivery: Delivery) -> Request {
        Request {
            duration,
            hourly_rate: money("600INR"),
            operator_rate: None,
            delivery,
            transport_charge: TransportCharge::new(money("500INR")).unwrap(),
        }
    }

    #[test]
    fn hours_with_pickup() {
        let quote = Policy::default()
            .quote(tractor(Duration::Hours(n(3)), Delivery::Pickup))
            .unwrap();

        assert_eq!(quote.hours, 3);
        assert_eq!(quote.base, money("1800INR"));
        assert_eq!(quote.operator, None);
        assert_eq!(quote.transport, money("-250INR"));
        assert_eq!(quote.total, money("1550INR"));
    }

    #[test]
    fn days_with_delivery() {
        let quote = Policy::default()
            .quote(tractor(Duration::Days(n(2)), delivery()))
            .unwrap();

        assert_eq!(quote.hours, 16);
        assert_eq!(quote.base, money("8640INR"));
        assert_eq!(quote.transport, money("500INR"));
        assert_eq!(quote.total, money("9140INR"));
    }

    #[test]
    fn operator_billed_for_working_hours() {
        let mut req = tractor(Duration::Days(n(1)), delivery());
        req.operator_rate = Some(money("150INR"));

        let quote = Policy::default().quote(req).unwrap();

        assert_eq!(quote.base, money("4320INR"));
        assert_eq!(quote.operator, Some(money("1200INR")));
        assert_eq!(quote.total, money("6020INR"));
    }

    #[test]
    fn pickup_discount_is_floored() {
        let mut req = tractor(Duration::Hours(n(1)), Delivery::Pickup);
        req.transport_charge = TransportCharge::new(money("333INR")).unwrap();

        let quote = Policy::default().quote(req).unwrap();

        assert_eq!(quote.transport, money("-166INR"));
        assert_eq!(quote.total, money("434INR"));
    }

    #[test]
    fn total_never_negative() {
        let mut req = tractor(Duration::Hours(n(1)), Delivery::Pickup);
        req.hourly_rate = money("10INR");
        req.transport_charge = TransportCharge::new(money("1000INR")).unwrap();

        let quote = Policy::default().quote(req).unwrap();

        assert_eq!(quote.total, money("0INR"));
    }

    #[test]
    fn rejects_mixed_currencies() {
        let mut req = tractor(Duration::Hours(n(2)), delivery());
        req.operator_rate = Some(money("5USD"));

        assert!(matches!(
            Policy::default().quote(req),
            Err(Error::CurrencyMismatch),
        ));
    }

    #[test]
    fn negotiation_floor_is_seventy_percent() {
        assert_eq!(
            Policy::default().negotiation_floor(money("1550INR")),
            Some(money("1085INR")),
        );
    }
}
