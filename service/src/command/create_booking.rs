//! [`Command`] for placing a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking, equipment, negotiation, operator, pricing, user, Booking,
        Equipment, Negotiation, Operator, User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing a new [`Booking`] of an [`Equipment`] by a
/// farmer.
///
/// The [`Booking`] is priced with the [`pricing::Policy`] of the
/// [`Service`]. If a [`Proposal`] is provided, a [`Negotiation`] over the
/// price is opened along.
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the farmer [`User`] placing the [`Booking`].
    pub farmer_id: user::Id,

    /// ID of the [`Equipment`] to rent.
    pub equipment_id: equipment::Id,

    /// ID of the [`Operator`] to book alongside, if any.
    pub operator_id: Option<operator::Id>,

    /// [`booking::Schedule`] of the [`Booking`].
    pub schedule: booking::Schedule,

    /// How the [`Equipment`] reaches the farm.
    pub delivery: booking::Delivery,

    /// Price the farmer proposes instead of the quoted one, if any.
    pub proposal: Option<Proposal>,
}

/// Price proposed by a farmer.
#[derive(Clone, Debug)]
pub struct Proposal {
    /// Proposed price.
    pub price: Money,

    /// [`negotiation::Message`] to the owner, if any.
    pub message: Option<negotiation::Message>,
}

/// Output of [`CreateBooking`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Placed [`Booking`].
    pub booking: Booking,

    /// [`Negotiation`] opened for the [`Proposal`], if any.
    pub negotiation: Option<Negotiation>,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Operator>, operator::Id>>,
            Ok = Option<Operator>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Insert<Negotiation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "still readable")]
    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            farmer_id,
            equipment_id,
            operator_id,
            schedule,
            delivery,
            proposal,
        } = cmd;

        if !schedule.is_bookable() {
            return Err(tracerr::new!(E::ScheduleTooLong(schedule.duration)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let farmer = tx
            .execute(Select(By::<Option<User>, _>::new(farmer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::UserNotExists(farmer_id)))?;
        if farmer.role != user::Role::Farmer {
            return Err(tracerr::new!(E::NotFarmer(farmer_id)));
        }

        let equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::EquipmentNotExists(equipment_id))
            })?;
        if equipment.owner_id == farmer_id {
            return Err(tracerr::new!(E::OwnEquipment(equipment_id)));
        }
        if !equipment.is_bookable() {
            return Err(tracerr::new!(E::EquipmentUnavailable(
                equipment.status
            )));
        }

        let operator_rate = if let Some(id) = operator_id {
            let operator = tx
                .execute(Select(By::<Option<Operator>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or_else(|| tracerr::new!(E::OperatorNotExists(id)))?;
            if !operator.is_bookable() {
                return Err(tracerr::new!(E::OperatorUnavailable(id)));
            }
            Some(operator.hourly_rate)
        } else {
            None
        };

        let policy = &self.config().pricing;
        let quote = policy
            .quote(pricing::Request {
                duration: schedule.duration,
                hourly_rate: equipment.rates.per_hour(),
                operator_rate,
                delivery: delivery.clone(),
                transport_charge: equipment.transport_charge,
            })
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let mut booking = Booking {
            id: booking::Id::new(),
            equipment_id,
            farmer_id,
            owner_id: equipment.owner_id,
            operator_id,
            schedule,
            delivery,
            quote,
            negotiation_id: None,
            total_price: quote.total,
            status: booking::Status::Pending,
            paid_at: None,
            created_at: now.coerce(),
        };

        let negotiation = if let Some(Proposal { price, message }) = proposal {
            let floor =
                policy.negotiation_floor(quote.total).ok_or_else(|| {
                    tracerr::new!(E::Pricing(pricing::Error::Overflow))
                })?;
            Negotiation::check_proposal(quote.total, price, floor)
                .map_err(tracerr::from_and_wrap!(=> E))?;

            let negotiation = Negotiation {
                id: negotiation::Id::new(),
                booking_id: booking.id,
                equipment_id,
                farmer_id,
                owner_id: equipment.owner_id,
                original_price: quote.total,
                proposed_price: price,
                message,
                status: negotiation::Status::Pending,
                created_at: now.coerce(),
                updated_at: now.coerce(),
            };
            booking.negotiation_id = Some(negotiation.id);
            Some(negotiation)
        } else {
            None
        };

        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        if let Some(n) = &negotiation {
            tx.execute(Insert(n.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {})` of `Equipment(id: {equipment_id})` placed for \
             {}",
            booking.id,
            booking.total_price,
        );

        Ok(Output {
            booking,
            negotiation,
        })
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`booking::Schedule`] is longer than [`booking::Duration::MAX_DAYS`]
    /// or ends out of the supported range.
    #[display("`Booking` for {_0:?} is too long")]
    #[from(ignore)]
    ScheduleTooLong(#[error(not(source))] booking::Duration),

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a farmer.
    #[display("`User(id: {_0})` is not a farmer")]
    #[from(ignore)]
    NotFarmer(#[error(not(source))] user::Id),

    /// [`Equipment`] with the provided ID doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// Farmer tries to rent own [`Equipment`].
    #[display("`Equipment(id: {_0})` belongs to the farmer")]
    #[from(ignore)]
    OwnEquipment(#[error(not(source))] equipment::Id),

    /// [`Equipment`] cannot be booked in its current status.
    #[display("`{_0}` equipment cannot be booked")]
    #[from(ignore)]
    EquipmentUnavailable(#[error(not(source))] equipment::Status),

    /// [`Operator`] with the provided ID doesn't exist.
    #[display("`Operator(id: {_0})` does not exist")]
    #[from(ignore)]
    OperatorNotExists(#[error(not(source))] operator::Id),

    /// [`Operator`] is not verified or not available.
    #[display("`Operator(id: {_0})` cannot be booked")]
    #[from(ignore)]
    OperatorUnavailable(#[error(not(source))] operator::Id),

    /// Price calculation failed.
    #[display("Pricing failed: {_0}")]
    #[from]
    Pricing(pricing::Error),

    /// Proposed price is invalid.
    #[display("Invalid proposal: {_0}")]
    #[from]
    Proposal(negotiation::PriceError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use std::num::NonZeroU32;

    use common::Money;

    use crate::{
        command::fixture,
        domain::{
            booking::{Delivery, Duration, DurationUnit},
            equipment::Status,
            negotiation,
            user::Role,
        },
        Command as _,
    };

    use super::{ExecutionError, Proposal};

    #[tokio::test]
    async fn prices_booking_with_pickup_discount() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let mut cmd = fixture::create_booking(farmer.id, equipment.id);
        cmd.schedule.duration = Duration::Hours(NonZeroU32::new(3).unwrap());
        cmd.delivery = Delivery::Pickup;
        let out = svc.execute(cmd).await.unwrap();

        assert_eq!(out.booking.total_price, "1550INR".parse().unwrap());
        assert_eq!(out.booking.owner_id, owner.id);
        assert!(out.negotiation.is_none());
    }

    #[tokio::test]
    async fn opens_negotiation_for_proposal() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let mut cmd = fixture::create_booking(farmer.id, equipment.id);
        cmd.proposal = Some(Proposal {
            price: "1300INR".parse().unwrap(),
            message: None,
        });
        let out = svc.execute(cmd).await.unwrap();

        let negotiation = out.negotiation.unwrap();
        assert_eq!(negotiation.status, negotiation::Status::Pending);
        assert_eq!(negotiation.proposed_price, "1300INR".parse().unwrap());
        assert_eq!(negotiation.original_price, out.booking.total_price);
        assert_eq!(out.booking.negotiation_id, Some(negotiation.id));
    }

    #[tokio::test]
    async fn clamps_proposal() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        // 2 hours with delivery cost 1700INR, so the floor is 1190INR.
        for price in ["1189INR", "1701INR"] {
            let mut cmd = fixture::create_booking(farmer.id, equipment.id);
            cmd.proposal = Some(Proposal {
                price: price.parse::<Money>().unwrap(),
                message: None,
            });

            let err = svc.execute(cmd).await.unwrap_err();
            assert!(
                matches!(err.as_ref(), ExecutionError::Proposal(_)),
                "{price} must be rejected",
            );
        }
    }

    #[tokio::test]
    async fn checks_parties() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let err = svc
            .execute(fixture::create_booking(owner.id, equipment.id))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotFarmer(_)));

        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        _ = svc
            .execute(fixture::update_equipment_status(
                equipment.id,
                owner.id,
                Status::Maintenance,
            ))
            .await
            .unwrap();
        let err = svc
            .execute(fixture::create_booking(farmer.id, equipment.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::EquipmentUnavailable(Status::Maintenance),
        ));
    }

    #[tokio::test]
    async fn requires_bookable_operator() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let user = fixture::user(&svc, "mohan", Role::Operator).await;
        let operator = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap();

        let mut cmd = fixture::create_booking(farmer.id, equipment.id);
        cmd.operator_id = Some(operator.id);
        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::OperatorUnavailable(_),
        ));
    }

    #[tokio::test]
    async fn rejects_oversized_schedule() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        for count in ["367", "4000000"] {
            let mut cmd = fixture::create_booking(farmer.id, equipment.id);
            cmd.schedule.duration = Duration::parse(DurationUnit::Days, count);

            let err = svc.execute(cmd).await.unwrap_err();
            assert!(
                matches!(err.as_ref(), ExecutionError::ScheduleTooLong(_)),
                "{count} days must be rejected",
            );
        }
    }
}
