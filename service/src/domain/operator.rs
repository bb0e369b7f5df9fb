//! [`Operator`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{define_id, define_text, user};

/// Operator who can be booked to drive rented machinery.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Operator {
    /// ID of this [`Operator`].
    pub id: Id,

    /// ID of the [`User`] this [`Operator`] profile belongs to.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// [`Specialization`]s of this [`Operator`].
    pub specializations: Vec<Specialization>,

    /// Price of an hour of this [`Operator`]'s work.
    pub hourly_rate: Money,

    /// [`Rating`] of this [`Operator`], if rated.
    pub rating: Option<Rating>,

    /// Years of this [`Operator`]'s experience.
    pub experience_years: u8,

    /// Indicator whether an admin verified this [`Operator`].
    pub is_verified: bool,

    /// Indicator whether this [`Operator`] accepts new bookings.
    pub is_available: bool,

    /// [`DateTime`] when this [`Operator`] was registered.
    pub created_at: CreationDateTime,
}

impl Operator {
    /// Indicates whether this [`Operator`] can be booked right now.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.is_verified && self.is_available
    }

    /// Indicates whether this [`Operator`] has the provided
    /// [`Specialization`], ignoring case.
    #[must_use]
    pub fn specializes_in(&self, specialization: &Specialization) -> bool {
        let wanted = AsRef::<str>::as_ref(specialization).to_lowercase();
        self.specializations
            .iter()
            .any(|s| AsRef::<str>::as_ref(s).to_lowercase() == wanted)
    }
}

define_id! {
    #[doc = "ID of an [`Operator`]."]
    Id
}

define_text! {
    #[doc = "Specialization of an [`Operator`], like `Harvester` or `Tractor`."]
    Specialization(max = 64)
}

/// Rating of an [`Operator`] within `[0; 5]`.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Maximum possible [`Rating`].
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Creates a new [`Rating`] if the provided value is within `[0; 5]`.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Rating`")
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = &'static str;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("invalid `Rating`")
    }
}

/// [`DateTime`] when an [`Operator`] was registered.
pub type CreationDateTime = DateTimeOf<(Operator, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::user;

    use super::{Id, Operator, Rating, Specialization};

    fn operator(specializations: &[&str]) -> Operator {
        Operator {
            id: Id::new(),
            user_id: user::Id::new(),
            specializations: specializations
                .iter()
                .map(|s| Specialization::new(*s).unwrap())
                .collect(),
            hourly_rate: "150INR".parse().unwrap(),
            rating: None,
            experience_years: 4,
            is_verified: true,
            is_available: true,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn matches_specialization_ignoring_case() {
        let op = operator(&["Harvester", "Tractor"]);

        assert!(op.specializes_in(&Specialization::new("harvester").unwrap()));
        assert!(op.specializes_in(&Specialization::new("TRACTOR").unwrap()));
        assert!(!op.specializes_in(&Specialization::new("Sprayer").unwrap()));
    }

    #[test]
    fn bookable_only_when_verified_and_available() {
        let mut op = operator(&[]);
        assert!(op.is_bookable());

        op.is_available = false;
        assert!(!op.is_bookable());

        op.is_available = true;
        op.is_verified = false;
        assert!(!op.is_bookable());
    }

    #[test]
    fn rating_is_bounded() {
        assert!("4.5".parse::<Rating>().is_ok());
        assert!("0".parse::<Rating>().is_ok());
        assert!("5".parse::<Rating>().is_ok());
        assert!("5.1".parse::<Rating>().is_err());
        assert!("-1".parse::<Rating>().is_err());
    }
}
