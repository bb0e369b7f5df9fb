//! [`Command`] for moving a [`Booking`] through its lifecycle.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, equipment, negotiation, Booking, Equipment, Negotiation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for applying a [`booking::Transition`] to a [`Booking`].
///
/// The rented [`Equipment`] follows the [`Booking`]: it's reserved on
/// confirmation, occupied on start and released once the [`Booking`] is
/// over.
#[derive(Clone, Copy, Debug)]
pub struct UpdateBookingStatus {
    /// ID of the [`Booking`] to update.
    pub booking_id: booking::Id,

    /// [`booking::Actor`] performing the [`booking::Transition`].
    pub actor: booking::Actor,

    /// [`booking::Transition`] to apply.
    pub transition: booking::Transition,
}

impl<Db> Command<UpdateBookingStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Negotiation>, negotiation::Id>>,
            Ok = Option<Negotiation>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Update<Equipment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use booking::Transition as T;
        use ExecutionError as E;

        let UpdateBookingStatus {
            booking_id,
            actor,
            transition,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::BookingNotExists(booking_id)))?;
        if !booking.permits(&actor, transition) {
            return Err(tracerr::new!(E::Forbidden(transition)));
        }

        if transition == T::Confirm {
            if let Some(id) = booking.negotiation_id {
                let negotiation = tx
                    .execute(Select(By::<Option<Negotiation>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                if negotiation.is_some_and(|n| n.status.is_open()) {
                    return Err(tracerr::new!(E::NegotiationOpen(id)));
                }
            }
        }

        let was = booking.status.kind();
        booking
            .apply(transition, actor.user_id, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(
                booking.equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::EquipmentNotExists(booking.equipment_id))
            })?;
        let status = match transition {
            T::Confirm => Some(equipment.status.reserve()),
            T::Start => Some(equipment.status.occupy()),
            T::Complete => Some(equipment.status.release()),
            T::Cancel => (was == booking::StatusKind::Confirmed)
                .then(|| equipment.status.release()),
        };
        if let Some(status) = status {
            equipment.status =
                status.map_err(tracerr::from_and_wrap!(=> E))?;
            tx.execute(Update(equipment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {booking_id})` moved from `{was}` to `{}`",
            booking.status.kind(),
        );

        Ok(booking)
    }
}

/// Error of [`UpdateBookingStatus`] [`Command`] execution.
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

    /// [`Equipment`] of the [`Booking`] doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`booking::Actor`] is not allowed to perform the
    /// [`booking::Transition`].
    #[display("Not allowed to {_0} the booking")]
    #[from(ignore)]
    Forbidden(#[error(not(source))] booking::Transition),

    /// [`Booking`] cannot be confirmed while its [`Negotiation`] is open.
    #[display("`Negotiation(id: {_0})` is not settled yet")]
    #[from(ignore)]
    NegotiationOpen(#[error(not(source))] negotiation::Id),

    /// [`booking::Transition`] is not possible.
    #[display("{_0}")]
    #[from]
    Transition(booking::TransitionError),

    /// [`Equipment`] cannot follow the [`Booking`].
    #[display("{_0}")]
    #[from]
    Equipment(equipment::TransitionError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{
        command::fixture,
        domain::{
            booking::{StatusKind, Transition, TransitionError},
            equipment,
            user::Role,
        },
        Command as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn runs_full_lifecycle() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        for (transition, booking_status, equipment_status) in [
            (
                Transition::Confirm,
                StatusKind::Confirmed,
                equipment::Status::Booked,
            ),
            (
                Transition::Start,
                StatusKind::Ongoing,
                equipment::Status::InUse,
            ),
            (
                Transition::Complete,
                StatusKind::Completed,
                equipment::Status::Available,
            ),
        ] {
            let updated = svc
                .execute(fixture::transition(booking.id, &owner, transition))
                .await
                .unwrap();
            assert_eq!(updated.status.kind(), booking_status);
            assert_eq!(
                fixture::equipment_status(&svc, equipment.id).await,
                equipment_status,
            );
        }
    }

    #[tokio::test]
    async fn rejects_invalid_transitions() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        for transition in [Transition::Start, Transition::Complete] {
            let err = svc
                .execute(fixture::transition(booking.id, &owner, transition))
                .await
                .unwrap_err();
            assert!(matches!(
                err.as_ref(),
                ExecutionError::Transition(TransitionError::Invalid { .. }),
            ));
        }

        _ = svc
            .execute(fixture::transition(
                booking.id,
                &farmer,
                Transition::Cancel,
            ))
            .await
            .unwrap();
        let err = svc
            .execute(fixture::transition(
                booking.id,
                &owner,
                Transition::Confirm,
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Transition(TransitionError::Invalid {
                from: StatusKind::Cancelled,
                ..
            }),
        ));
    }

    #[tokio::test]
    async fn farmers_cannot_confirm() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        let err = svc
            .execute(fixture::transition(
                booking.id,
                &farmer,
                Transition::Confirm,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Forbidden(_)));
    }

    #[tokio::test]
    async fn cancelling_confirmed_booking_releases_equipment() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        for (actor, transition) in
            [(&owner, Transition::Confirm), (&farmer, Transition::Cancel)]
        {
            _ = svc
                .execute(fixture::transition(booking.id, actor, transition))
                .await
                .unwrap();
        }

        assert_eq!(
            fixture::equipment_status(&svc, equipment.id).await,
            equipment::Status::Available,
        );
    }

    #[tokio::test]
    async fn second_confirmation_of_equipment_fails() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let first = fixture::booking(&svc, farmer.id, equipment.id).await;
        let second = fixture::booking(&svc, farmer.id, equipment.id).await;

        _ = svc
            .execute(fixture::transition(first.id, &owner, Transition::Confirm))
            .await
            .unwrap();
        let err = svc
            .execute(fixture::transition(
                second.id,
                &owner,
                Transition::Confirm,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Equipment(_)));
    }
}
