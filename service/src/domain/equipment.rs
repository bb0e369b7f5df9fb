//! [`Equipment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, money::Currency, unit, DateTimeOf, Money};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::{define_id, define_text, user};

/// Farm machinery listed for rent.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Equipment`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// [`Name`] of this [`Equipment`].
    pub name: Name,

    /// [`Kind`] of this [`Equipment`].
    pub kind: Kind,

    /// [`Description`] of this [`Equipment`], if any.
    pub description: Option<Description>,

    /// Rental [`Rates`] of this [`Equipment`].
    pub rates: Rates,

    /// Charge for delivering this [`Equipment`] to a farm.
    pub transport_charge: TransportCharge,

    /// [`Location`] this [`Equipment`] is stationed at.
    pub location: Location,

    /// Current [`Status`] of this [`Equipment`].
    pub status: Status,

    /// [`Feature`]s of this [`Equipment`].
    pub features: Vec<Feature>,

    /// [`DateTime`] when this [`Equipment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Equipment`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Equipment {
    /// Indicates whether this [`Equipment`] can be booked right now.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.deleted_at.is_none() && self.status == Status::Available
    }
}

define_id! {
    #[doc = "ID of an [`Equipment`]."]
    Id
}

define_text! {
    #[doc = "Name of an [`Equipment`], like `Mahindra 575 DI`."]
    Name(max = 256)
}

define_text! {
    #[doc = "Free-form description of an [`Equipment`]."]
    Description(max = 4096)
}

define_text! {
    #[doc = "Feature tag of an [`Equipment`], like `4WD` or `AC cabin`."]
    Feature(max = 64)
}

define_text! {
    #[doc = "Name of a village, district or state."]
    Place(max = 128)
}

define_kind! {
    #[doc = "Kind of an [`Equipment`]."]
    enum Kind {
        #[doc = "Tractor."]
        Tractor = 1,

        #[doc = "Combine harvester."]
        Harvester = 2,

        #[doc = "Rotavator (rotary tiller)."]
        Rotavator = 3,

        #[doc = "Seed drill."]
        Seeder = 4,

        #[doc = "Crop sprayer."]
        Sprayer = 5,

        #[doc = "Thresher."]
        Thresher = 6,

        #[doc = "Cultivator."]
        Cultivator = 7,

        #[doc = "Plough."]
        Plough = 8,

        #[doc = "Hay baler."]
        Baler = 9,
    }
}

/// Rental rates of an [`Equipment`], all in the same [`Currency`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RatesRepr")]
pub struct Rates {
    /// Price for an hour of use.
    per_hour: Money,

    /// Price for a day of use, if the owner quotes it separately.
    per_day: Option<Money>,

    /// Price for an acre of processed land, if the owner quotes it.
    per_acre: Option<Money>,
}

impl Rates {
    /// Creates new [`Rates`] if all the prices are positive and share the
    /// same [`Currency`].
    #[must_use]
    pub fn new(
        per_hour: Money,
        per_day: Option<Money>,
        per_acre: Option<Money>,
    ) -> Option<Self> {
        let valid =
            |m: &Money| m.is_positive() && m.currency == per_hour.currency;
        (valid(&per_hour)
            && per_day.as_ref().map_or(true, valid)
            && per_acre.as_ref().map_or(true, valid))
        .then_some(Self {
            per_hour,
            per_day,
            per_acre,
        })
    }

    /// Returns the hourly price.
    #[must_use]
    pub fn per_hour(&self) -> Money {
        self.per_hour
    }

    /// Returns the daily price, if quoted.
    #[must_use]
    pub fn per_day(&self) -> Option<Money> {
        self.per_day
    }

    /// Returns the per-acre price, if quoted.
    #[must_use]
    pub fn per_acre(&self) -> Option<Money> {
        self.per_acre
    }

    /// Returns [`Currency`] of these [`Rates`].
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.per_hour.currency
    }
}

/// Unvalidated [`Rates`] representation.
#[derive(Deserialize)]
struct RatesRepr {
    per_hour: Money,
    per_day: Option<Money>,
    per_acre: Option<Money>,
}

impl TryFrom<RatesRepr> for Rates {
    type Error = &'static str;

    fn try_from(r: RatesRepr) -> Result<Self, Self::Error> {
        Self::new(r.per_hour, r.per_day, r.per_acre).ok_or("invalid `Rates`")
    }
}

/// Charge for delivering an [`Equipment`] to a farm.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(try_from = "Money")]
pub struct TransportCharge(Money);

impl TransportCharge {
    /// Creates a new [`TransportCharge`] if the provided [`Money`] amount is
    /// not negative.
    #[must_use]
    pub fn new(charge: Money) -> Option<Self> {
        (!charge.is_negative()).then_some(Self(charge))
    }

    /// Returns the charged [`Money`].
    #[must_use]
    pub fn money(self) -> Money {
        self.0
    }
}

impl TryFrom<Money> for TransportCharge {
    type Error = &'static str;

    fn try_from(m: Money) -> Result<Self, Self::Error> {
        Self::new(m).ok_or("negative `TransportCharge`")
    }
}

/// Location an [`Equipment`] is stationed at.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Location {
    /// Geographical [`Coordinates`].
    pub coordinates: Coordinates,

    /// Village [`Place`].
    pub village: Place,

    /// District [`Place`].
    pub district: Place,

    /// State [`Place`].
    pub state: Place,
}

/// Geographical coordinates in decimal degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    /// Latitude within `[-90; 90]`.
    latitude: f64,

    /// Longitude within `[-180; 180]`.
    longitude: f64,
}

impl Coordinates {
    /// Creates new [`Coordinates`] if they're within the valid ranges.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude))
        .then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Creates new [`Coordinates`] without checking the ranges.
    ///
    /// # Safety
    ///
    /// The caller must ensure `latitude` is within `[-90; 90]` and
    /// `longitude` is within `[-180; 180]`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the latitude.
    #[must_use]
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude.
    #[must_use]
    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

impl TryFrom<(f64, f64)> for Coordinates {
    type Error = &'static str;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lng).ok_or("invalid `Coordinates`")
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(c: Coordinates) -> Self {
        (c.latitude, c.longitude)
    }
}

define_kind! {
    #[doc = "Status of an [`Equipment`]."]
    enum Status {
        #[doc = "[`Equipment`] can be booked."]
        Available = 1,

        #[doc = "[`Equipment`] is reserved by a confirmed booking."]
        Booked = 2,

        #[doc = "[`Equipment`] is working on a farm."]
        InUse = 3,

        #[doc = "[`Equipment`] is under maintenance."]
        Maintenance = 4,
    }
}

impl Status {
    /// Switches this [`Status`] on the owner's request.
    ///
    /// Owners may only move [`Equipment`] between [`Status::Available`] and
    /// [`Status::Maintenance`], the rest is driven by bookings.
    ///
    /// # Errors
    ///
    /// If the transition is not allowed.
    pub fn switch(self, to: Self) -> Result<Self, TransitionError> {
        use Status as S;

        match (self, to) {
            (S::Available | S::Maintenance, S::Available | S::Maintenance) => {
                Ok(to)
            }
            (S::Available | S::Booked | S::InUse | S::Maintenance, _) => {
                Err(TransitionError { from: self, to })
            }
        }
    }

    /// Reserves [`Equipment`] for a confirmed booking.
    ///
    /// # Errors
    ///
    /// If [`Equipment`] is not [`Status::Available`].
    pub fn reserve(self) -> Result<Self, TransitionError> {
        self.advance(Self::Available, Self::Booked)
    }

    /// Puts reserved [`Equipment`] to work.
    ///
    /// # Errors
    ///
    /// If [`Equipment`] is not [`Status::Booked`].
    pub fn occupy(self) -> Result<Self, TransitionError> {
        self.advance(Self::Booked, Self::InUse)
    }

    /// Releases [`Equipment`] after its booking is over.
    ///
    /// # Errors
    ///
    /// If [`Equipment`] is neither [`Status::Booked`] nor [`Status::InUse`].
    pub fn release(self) -> Result<Self, TransitionError> {
        match self {
            Self::Booked | Self::InUse => Ok(Self::Available),
            Self::Available | Self::Maintenance => Err(TransitionError {
                from: self,
                to: Self::Available,
            }),
        }
    }

    /// Moves from the `expected` [`Status`] into the `next` one.
    fn advance(
        self,
        expected: Self,
        next: Self,
    ) -> Result<Self, TransitionError> {
        if self == expected {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

/// Error of an invalid [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Equipment` cannot move from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted to.
    pub to: Status,
}

/// [`DateTime`] when an [`Equipment`] was created.
pub type CreationDateTime = DateTimeOf<(Equipment, unit::Creation)>;

/// [`DateTime`] when an [`Equipment`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Equipment, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};

    use super::{Coordinates, Rates, Status, TransportCharge};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn owner_toggles_only_maintenance() {
        use Status as S;

        assert_eq!(
            S::Available.switch(S::Maintenance).unwrap(),
            S::Maintenance,
        );
        assert_eq!(S::Maintenance.switch(S::Available).unwrap(), S::Available);

        assert!(S::Available.switch(S::Booked).is_err());
        assert!(S::Booked.switch(S::Maintenance).is_err());
        assert!(S::InUse.switch(S::Available).is_err());
    }

    #[test]
    fn follows_booking_lifecycle() {
        use Status as S;

        let booked = S::Available.reserve().unwrap();
        assert_eq!(booked, S::Booked);
        assert_eq!(booked.occupy().unwrap(), S::InUse);
        assert_eq!(S::InUse.release().unwrap(), S::Available);
        assert_eq!(S::Booked.release().unwrap(), S::Available);

        assert!(S::Maintenance.reserve().is_err());
        assert!(S::Available.occupy().is_err());
        assert!(S::Available.release().is_err());
    }

    #[test]
    fn validates_rates() {
        let per_day = Some(money("4000INR"));
        assert!(Rates::new(money("600INR"), per_day, None).is_some());
        assert!(Rates::new(money("0INR"), None, None).is_none());
        let per_day = Some(money("40USD"));
        assert!(Rates::new(money("600INR"), per_day, None).is_none());
        let per_acre = Some(money("-1INR"));
        assert!(Rates::new(money("600INR"), None, per_acre).is_none());

        assert_eq!(
            Rates::new(money("600INR"), None, None).unwrap().currency(),
            Currency::Inr,
        );
    }

    #[test]
    fn validates_charge_and_coordinates() {
        assert!(TransportCharge::new(money("0INR")).is_some());
        assert!(TransportCharge::new(money("-5INR")).is_none());

        assert!(Coordinates::new(18.52, 73.85).is_some());
        assert!(Coordinates::new(91.0, 73.85).is_none());
        assert!(Coordinates::new(18.52, -181.0).is_none());
    }
}
