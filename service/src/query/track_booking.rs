//! [`TrackBooking`] [`Query`] definition.

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, tracking, Booking},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] locating the equipment of an ongoing [`Booking`] on its
/// [`tracking::Route`].
#[derive(Clone, Copy, Debug)]
pub struct TrackBooking {
    /// ID of the tracked [`Booking`].
    pub booking_id: booking::Id,

    /// [`booking::Actor`] asking for the position.
    pub actor: booking::Actor,

    /// [`tracking::Mode`] to track in.
    pub mode: tracking::Mode,

    /// Moment to measure the elapsed time from, or [`None`] for the moment
    /// the [`Booking`] started.
    pub origin: Option<DateTime>,
}

impl<Db> Query<TrackBooking> for Service<Db>
where
    Db: Database<
        Select<By<Option<Booking>, booking::Id>>,
        Ok = Option<Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = tracking::Position;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: TrackBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TrackBooking {
            booking_id,
            actor,
            mode,
            origin,
        } = query;

        let booking = self
            .database()
            .execute(Select(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::BookingNotExists(booking_id)))?;

        if !booking.involves(&actor) {
            return Err(tracerr::new!(E::NotParticipant(booking_id)));
        }

        let booking::Status::Ongoing { started_at } = booking.status else {
            return Err(tracerr::new!(E::NotOngoing(booking.status.kind())));
        };

        let origin = origin.unwrap_or_else(|| started_at.coerce());
        let elapsed = DateTime::now().saturating_since(origin);
        Ok(tracking::Route::DEFAULT.position_at(elapsed, mode))
    }
}

/// Error of [`TrackBooking`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] with the provided ID doesn't exist.
    #[display("`Booking(id: {_0})` does not exist")]
    #[from(ignore)]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`booking::Actor`] doesn't participate in the [`Booking`].
    #[display("Not a participant of `Booking(id: {_0})`")]
    #[from(ignore)]
    NotParticipant(#[error(not(source))] booking::Id),

    /// [`Booking`] is not [`booking::Status::Ongoing`].
    #[display("Cannot track a `{_0}` booking")]
    #[from(ignore)]
    NotOngoing(#[error(not(source))] booking::StatusKind),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Select, Update},
        DateTime,
    };

    use crate::{
        command::fixture,
        domain::{
            booking::{self, StatusKind, Transition},
            tracking,
            user::Role,
            Booking, User,
        },
        Command as _,
    };

    use super::{ExecutionError, TrackBooking};

    fn track(booking_id: booking::Id, by: &User) -> TrackBooking {
        TrackBooking {
            booking_id,
            actor: booking::Actor {
                user_id: by.id,
                role: by.role,
                operator_id: None,
            },
            mode: tracking::Mode::Live,
            origin: None,
        }
    }

    #[tokio::test]
    async fn tracks_ongoing_booking() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let admin = fixture::user(&svc, "admin", Role::Admin).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;
        for transition in [Transition::Confirm, Transition::Start] {
            _ = svc
                .execute(fixture::transition(booking.id, &owner, transition))
                .await
                .unwrap();
        }

        for by in [&farmer, &owner, &admin] {
            let position = svc.execute(track(booking.id, by)).await.unwrap();
            assert_eq!(position.index, 0);
            assert!(!position.arrived);
        }
    }

    #[tokio::test]
    async fn hides_booking_from_strangers() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let stranger = fixture::user(&svc, "mahesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        let err = svc.execute(track(booking.id, &stranger)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotParticipant(_)));
    }

    #[tokio::test]
    async fn rejects_not_ongoing_booking() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        let err = svc.execute(track(booking.id, &farmer)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOngoing(StatusKind::Pending),
        ));

        let err = svc
            .execute(track(booking::Id::new(), &farmer))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::BookingNotExists(_)));
    }

    #[tokio::test]
    async fn replays_long_running_booking_from_start() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;
        for transition in [Transition::Confirm, Transition::Start] {
            _ = svc
                .execute(fixture::transition(booking.id, &owner, transition))
                .await
                .unwrap();
        }

        let mut booking: Booking = svc
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking.id)))
            .await
            .unwrap()
            .unwrap();
        let hour_ago = DateTime::now() - Duration::from_secs(60 * 60);
        booking.status = booking::Status::Ongoing {
            started_at: hour_ago.coerce(),
        };
        svc.database().execute(Update(booking.clone())).await.unwrap();

        let live = svc.execute(track(booking.id, &farmer)).await.unwrap();
        assert!(live.arrived);

        let speed = tracking::Speed::new(8.0).unwrap();
        let step = tracking::Mode::Playback(speed).step();
        let replay = svc
            .execute(TrackBooking {
                mode: tracking::Mode::Playback(speed),
                origin: Some(DateTime::now()),
                ..track(booking.id, &farmer)
            })
            .await
            .unwrap();
        assert_eq!(replay.index, 0);
        assert!(!replay.arrived);

        let halfway = svc
            .execute(TrackBooking {
                mode: tracking::Mode::Playback(speed),
                origin: Some(DateTime::now() - step * 3),
                ..track(booking.id, &farmer)
            })
            .await
            .unwrap();
        assert_eq!(halfway.index, 3);
    }
}
