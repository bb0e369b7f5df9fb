//! [`Booking`] definitions.

use std::{num::NonZeroU32, time};

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::{
    define_id, define_text, equipment, negotiation, operator, pricing, user,
};

/// Rent of an [`Equipment`] by a farmer.
///
/// [`Equipment`]: crate::domain::Equipment
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the rented [`Equipment`].
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub equipment_id: equipment::Id,

    /// ID of the farmer renting the [`Equipment`].
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub farmer_id: user::Id,

    /// ID of the [`Equipment`] owner.
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub owner_id: user::Id,

    /// ID of the [`Operator`] booked alongside, if any.
    ///
    /// [`Operator`]: crate::domain::Operator
    pub operator_id: Option<operator::Id>,

    /// [`Schedule`] of this [`Booking`].
    pub schedule: Schedule,

    /// How the [`Equipment`] reaches the farm.
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub delivery: Delivery,

    /// [`pricing::Quote`] this [`Booking`] was created with.
    pub quote: pricing::Quote,

    /// ID of the [`Negotiation`] over the price of this [`Booking`], if any.
    ///
    /// [`Negotiation`]: crate::domain::Negotiation
    pub negotiation_id: Option<negotiation::Id>,

    /// Price the farmer pays: the quoted total, unless negotiated.
    pub total_price: Money,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was paid, if it was.
    pub paid_at: Option<PaymentDateTime>,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

impl Booking {
    /// Checks whether the provided [`Actor`] may perform the [`Transition`]
    /// on this [`Booking`].
    #[must_use]
    pub fn permits(&self, actor: &Actor, transition: Transition) -> bool {
        let is_admin = actor.role == user::Role::Admin;
        let is_owner = actor.user_id == self.owner_id;
        let is_farmer = actor.user_id == self.farmer_id;
        let is_operator = actor.operator_id.is_some()
            && actor.operator_id == self.operator_id;

        match transition {
            Transition::Confirm => is_owner || is_admin,
            Transition::Start | Transition::Complete => is_owner || is_operator,
            Transition::Cancel => is_farmer || is_owner || is_admin,
        }
    }

    /// Checks whether the provided [`Actor`] takes part in this [`Booking`].
    ///
    /// Admins take part in every [`Booking`].
    #[must_use]
    pub fn involves(&self, actor: &Actor) -> bool {
        actor.role == user::Role::Admin
            || actor.user_id == self.farmer_id
            || actor.user_id == self.owner_id
            || (actor.operator_id.is_some()
                && actor.operator_id == self.operator_id)
    }

    /// Applies the provided [`Transition`] to this [`Booking`].
    ///
    /// # Errors
    ///
    /// If the [`Transition`] is not possible from the current [`Status`], or
    /// a paid [`Booking`] is being cancelled.
    pub fn apply(
        &mut self,
        transition: Transition,
        by: user::Id,
        at: DateTime,
    ) -> Result<(), TransitionError> {
        if transition == Transition::Cancel && self.paid_at.is_some() {
            return Err(TransitionError::Paid);
        }
        self.status = self.status.apply(transition, by, at)?;
        Ok(())
    }

    /// Indicates whether this [`Booking`] can be paid for.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        self.paid_at.is_none()
            && matches!(
                self.status,
                Status::Confirmed { .. }
                    | Status::Ongoing { .. }
                    | Status::Completed { .. },
            )
    }
}

define_id! {
    #[doc = "ID of a [`Booking`]."]
    Id
}

/// Actor performing a [`Transition`] of a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct Actor {
    /// ID of the acting [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// [`user::Role`] of the acting [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub role: user::Role,

    /// ID of the acting [`User`]'s [`Operator`] profile, if any.
    ///
    /// [`Operator`]: crate::domain::Operator
    /// [`User`]: crate::domain::User
    pub operator_id: Option<operator::Id>,
}

/// Time frame of a [`Booking`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schedule {
    /// [`DateTime`] when the rent starts.
    pub starts_at: StartDateTime,

    /// [`Duration`] of the rent.
    pub duration: Duration,
}

impl Schedule {
    /// Returns [`DateTime`] when the rent ends, if it is representable.
    #[must_use]
    pub fn ends_at(&self) -> Option<EndDateTime> {
        self.starts_at
            .checked_add(self.duration.span())
            .map(|ends_at| ends_at.coerce())
    }

    /// Indicates whether this [`Schedule`] may be booked: its [`Duration`]
    /// is not longer than [`Duration::MAX_DAYS`] and it ends at a
    /// representable [`DateTime`].
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.duration.is_bounded() && self.ends_at().is_some()
    }
}

/// Duration of a [`Booking`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(
    tag = "unit",
    content = "count",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Duration {
    /// Rent by hours.
    Hours(NonZeroU32),

    /// Rent by days.
    Days(NonZeroU32),
}

impl Duration {
    /// Longest rent in days.
    pub const MAX_DAYS: u32 = 366;

    /// Parses a [`Duration`] out of the `count` typed by a farmer.
    ///
    /// Unparsable and zero counts fall back to `1`.
    #[must_use]
    pub fn parse(unit: DurationUnit, count: &str) -> Self {
        let count = count
            .trim()
            .parse::<NonZeroU32>()
            .unwrap_or(NonZeroU32::MIN);
        match unit {
            DurationUnit::Hours => Self::Hours(count),
            DurationUnit::Days => Self::Days(count),
        }
    }

    /// Returns [`DurationUnit`] of this [`Duration`].
    #[must_use]
    pub fn unit(self) -> DurationUnit {
        match self {
            Self::Hours(_) => DurationUnit::Hours,
            Self::Days(_) => DurationUnit::Days,
        }
    }

    /// Returns the number of units in this [`Duration`].
    #[must_use]
    pub fn count(self) -> NonZeroU32 {
        match self {
            Self::Hours(n) | Self::Days(n) => n,
        }
    }

    /// Returns the number of billed working hours.
    #[must_use]
    pub fn hours(self, hours_per_day: u8) -> u32 {
        match self {
            Self::Hours(n) => n.get(),
            Self::Days(n) => n.get().saturating_mul(hours_per_day.into()),
        }
    }

    /// Indicates whether this [`Duration`] spans at most
    /// [`Duration::MAX_DAYS`].
    #[must_use]
    pub fn is_bounded(self) -> bool {
        match self {
            Self::Hours(n) => n.get() <= Self::MAX_DAYS * 24,
            Self::Days(n) => n.get() <= Self::MAX_DAYS,
        }
    }

    /// Returns the calendar span of this [`Duration`].
    #[must_use]
    pub fn span(self) -> time::Duration {
        const HOUR: u64 = 60 * 60;

        match self {
            Self::Hours(n) => {
                time::Duration::from_secs(u64::from(n.get()) * HOUR)
            }
            Self::Days(n) => {
                time::Duration::from_secs(u64::from(n.get()) * 24 * HOUR)
            }
        }
    }
}

define_kind! {
    #[doc = "Unit of a [`Duration`]."]
    enum DurationUnit {
        #[doc = "Hours."]
        Hours = 1,

        #[doc = "Days."]
        Days = 2,
    }
}

/// How rented equipment reaches the farm.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Delivery {
    /// Owner delivers the equipment to the [`Address`].
    Delivery {
        /// [`Address`] to deliver the equipment to.
        address: Address,
    },

    /// Farmer picks the equipment up.
    Pickup,
}

define_text! {
    #[doc = "Address of a farm to deliver equipment to."]
    Address(max = 512)
}

/// Status of a [`Booking`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Awaits the owner's confirmation.
    Pending,

    /// Confirmed by the owner.
    Confirmed {
        /// [`DateTime`] of the confirmation.
        confirmed_at: ConfirmationDateTime,
    },

    /// Equipment is working on the farm.
    Ongoing {
        /// [`DateTime`] when the work started.
        started_at: CommencementDateTime,
    },

    /// Work is done.
    Completed {
        /// [`DateTime`] when the work started.
        started_at: CommencementDateTime,

        /// [`DateTime`] when the work was completed.
        completed_at: CompletionDateTime,
    },

    /// Booking was called off.
    Cancelled {
        /// [`DateTime`] of the cancellation.
        cancelled_at: CancellationDateTime,

        /// ID of the [`User`] who cancelled.
        ///
        /// [`User`]: crate::domain::User
        by: user::Id,
    },
}

impl Status {
    /// Returns [`StatusKind`] of this [`Status`].
    #[must_use]
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Pending => StatusKind::Pending,
            Self::Confirmed { .. } => StatusKind::Confirmed,
            Self::Ongoing { .. } => StatusKind::Ongoing,
            Self::Completed { .. } => StatusKind::Completed,
            Self::Cancelled { .. } => StatusKind::Cancelled,
        }
    }

    /// Applies the provided [`Transition`] to this [`Status`].
    ///
    /// # Errors
    ///
    /// If the [`Transition`] is not possible from this [`Status`].
    pub fn apply(
        self,
        transition: Transition,
        by: user::Id,
        at: DateTime,
    ) -> Result<Self, TransitionError> {
        use Transition as T;

        Ok(match (self, transition) {
            (Self::Pending, T::Confirm) => Self::Confirmed {
                confirmed_at: at.coerce(),
            },
            (Self::Confirmed { .. }, T::Start) => Self::Ongoing {
                started_at: at.coerce(),
            },
            (Self::Ongoing { started_at }, T::Complete) => Self::Completed {
                started_at,
                completed_at: at.coerce(),
            },
            (Self::Pending | Self::Confirmed { .. }, T::Cancel) => {
                Self::Cancelled {
                    cancelled_at: at.coerce(),
                    by,
                }
            }
            (
                Self::Pending
                | Self::Confirmed { .. }
                | Self::Ongoing { .. }
                | Self::Completed { .. }
                | Self::Cancelled { .. },
                T::Confirm | T::Start | T::Complete | T::Cancel,
            ) => {
                return Err(TransitionError::Invalid {
                    from: self.kind(),
                    transition,
                })
            }
        })
    }

    /// Returns [`DateTime`] when the work started, if it did.
    #[must_use]
    pub fn started_at(&self) -> Option<CommencementDateTime> {
        match self {
            Self::Ongoing { started_at }
            | Self::Completed { started_at, .. } => Some(*started_at),
            Self::Pending | Self::Confirmed { .. } | Self::Cancelled { .. } => {
                None
            }
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Booking`] [`Status`]."]
    enum StatusKind {
        #[doc = "[`Status::Pending`]."]
        Pending = 1,

        #[doc = "[`Status::Confirmed`]."]
        Confirmed = 2,

        #[doc = "[`Status::Ongoing`]."]
        Ongoing = 3,

        #[doc = "[`Status::Completed`]."]
        Completed = 4,

        #[doc = "[`Status::Cancelled`]."]
        Cancelled = 5,
    }
}

define_kind! {
    #[doc = "Transition between [`Booking`] [`Status`]es."]
    enum Transition {
        #[doc = "Owner confirms a pending [`Booking`]."]
        Confirm = 1,

        #[doc = "Work on a confirmed [`Booking`] starts."]
        Start = 2,

        #[doc = "Work on an ongoing [`Booking`] completes."]
        Complete = 3,

        #[doc = "Pending or confirmed [`Booking`] is called off."]
        Cancel = 4,
    }
}

/// Error of a [`Booking`] [`Transition`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum TransitionError {
    /// [`Transition`] is not possible from the current [`Status`].
    #[display("Cannot {transition} a `{from}` booking")]
    Invalid {
        /// [`StatusKind`] the [`Transition`] was attempted from.
        from: StatusKind,

        /// Attempted [`Transition`].
        transition: Transition,
    },

    /// Paid [`Booking`] cannot be cancelled.
    #[display("Cannot cancel a paid booking")]
    Paid,
}

/// [`DateTime`] when a [`Booking`] starts.
pub type StartDateTime = DateTimeOf<(Booking, unit::Commencement, Schedule)>;

/// [`DateTime`] when a [`Booking`] ends.
pub type EndDateTime = DateTimeOf<(Booking, unit::Completion, Schedule)>;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was confirmed.
pub type ConfirmationDateTime = DateTimeOf<(Booking, unit::Confirmation)>;

/// [`DateTime`] when work on a [`Booking`] started.
pub type CommencementDateTime = DateTimeOf<(Booking, unit::Commencement)>;

/// [`DateTime`] when work on a [`Booking`] was completed.
pub type CompletionDateTime = DateTimeOf<(Booking, unit::Completion)>;

/// [`DateTime`] when a [`Booking`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Booking, unit::Cancellation)>;

/// [`DateTime`] when a [`Booking`] was paid.
pub type PaymentDateTime = DateTimeOf<(Booking, unit::Payment)>;

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::DateTime;

    use crate::domain::user;

    use super::{
        Duration, DurationUnit, Schedule, Status, StatusKind, Transition,
        TransitionError,
    };

    fn walk(transitions: &[Transition]) -> Result<Status, TransitionError> {
        let by = user::Id::new();
        transitions.iter().try_fold(Status::Pending, |s, t| {
            s.apply(*t, by, DateTime::now())
        })
    }

    #[test]
    fn follows_happy_path() {
        use Transition as T;

        let status = walk(&[T::Confirm, T::Start, T::Complete]).unwrap();
        assert_eq!(status.kind(), StatusKind::Completed);
        assert!(status.started_at().is_some());
    }

    #[test]
    fn cancels_only_before_start() {
        use Transition as T;

        assert_eq!(walk(&[T::Cancel]).unwrap().kind(), StatusKind::Cancelled);
        assert_eq!(
            walk(&[T::Confirm, T::Cancel]).unwrap().kind(),
            StatusKind::Cancelled,
        );
        assert!(walk(&[T::Confirm, T::Start, T::Cancel]).is_err());
        assert!(walk(&[T::Confirm, T::Start, T::Complete, T::Cancel]).is_err());
    }

    #[test]
    fn rejects_every_invalid_transition() {
        use Transition as T;

        let by = user::Id::new();
        let now = DateTime::now();
        let states = [
            walk(&[]).unwrap(),
            walk(&[T::Confirm]).unwrap(),
            walk(&[T::Confirm, T::Start]).unwrap(),
            walk(&[T::Confirm, T::Start, T::Complete]).unwrap(),
            walk(&[T::Cancel]).unwrap(),
        ];
        let allowed = [
            (StatusKind::Pending, T::Confirm),
            (StatusKind::Pending, T::Cancel),
            (StatusKind::Confirmed, T::Start),
            (StatusKind::Confirmed, T::Cancel),
            (StatusKind::Ongoing, T::Complete),
        ];

        for status in states {
            for &t in Transition::ALL {
                let res = status.apply(t, by, now);
                if allowed.contains(&(status.kind(), t)) {
                    assert!(res.is_ok(), "{} -> {t}", status.kind());
                } else {
                    assert!(
                        matches!(res, Err(TransitionError::Invalid { .. })),
                        "{} -> {t}",
                        status.kind(),
                    );
                }
            }
        }
    }

    #[test]
    fn duration_falls_back_to_one() {
        let one = NonZeroU32::MIN;

        let parse = Duration::parse;
        assert_eq!(parse(DurationUnit::Hours, "abc"), Duration::Hours(one));
        assert_eq!(parse(DurationUnit::Days, "0"), Duration::Days(one));
        assert_eq!(parse(DurationUnit::Days, ""), Duration::Days(one));
        assert_eq!(
            Duration::parse(DurationUnit::Hours, " 3 "),
            Duration::Hours(NonZeroU32::new(3).unwrap()),
        );
    }

    #[test]
    fn day_is_eight_working_hours_but_full_calendar_day() {
        let two_days = Duration::Days(NonZeroU32::new(2).unwrap());
        assert_eq!(two_days.hours(8), 16);

        let starts_at = DateTime::from_unix_timestamp(0).unwrap().coerce();
        let schedule = Schedule {
            starts_at,
            duration: two_days,
        };
        assert_eq!(
            schedule.ends_at().unwrap().unix_timestamp(),
            2 * 24 * 60 * 60,
        );
        assert!(schedule.is_bookable());
    }

    #[test]
    fn rejects_oversized_schedule() {
        let starts_at = DateTime::now().coerce();
        let schedule = |duration| Schedule {
            starts_at,
            duration,
        };

        let longest = NonZeroU32::new(Duration::MAX_DAYS).unwrap();
        assert!(schedule(Duration::Days(longest)).is_bookable());

        let too_long = Duration::parse(DurationUnit::Hours, "8785");
        assert!(!too_long.is_bounded());
        assert!(!schedule(too_long).is_bookable());

        let overflowing =
            schedule(Duration::parse(DurationUnit::Days, "4000000"));
        assert_eq!(overflowing.ends_at(), None);
        assert!(!overflowing.is_bookable());
    }
}
