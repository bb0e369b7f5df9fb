//! [`QuoteBooking`] [`Query`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking, equipment, operator, pricing, Equipment, Operator,
    },
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] pricing a prospective [`Booking`] before it's placed.
///
/// [`Booking`]: crate::domain::Booking
#[derive(Clone, Debug)]
pub struct QuoteBooking {
    /// ID of the [`Equipment`] to rent.
    pub equipment_id: equipment::Id,

    /// ID of the [`Operator`] to book alongside, if any.
    pub operator_id: Option<operator::Id>,

    /// [`booking::Duration`] of the rent.
    pub duration: booking::Duration,

    /// How the [`Equipment`] reaches the farm.
    pub delivery: booking::Delivery,
}

impl<Db> Query<QuoteBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Operator>, operator::Id>>,
            Ok = Option<Operator>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = pricing::Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: QuoteBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let QuoteBooking {
            equipment_id,
            operator_id,
            duration,
            delivery,
        } = query;

        if !duration.is_bounded() {
            return Err(tracerr::new!(E::DurationTooLong(duration)));
        }

        let equipment = self
            .database()
            .execute(Select(By::<Option<Equipment>, _>::new(
                equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::EquipmentNotExists(equipment_id))
            })?;

        let operator_rate = if let Some(id) = operator_id {
            let operator = self
                .database()
                .execute(Select(By::<Option<Operator>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or_else(|| tracerr::new!(E::OperatorNotExists(id)))?;
            Some(operator.hourly_rate)
        } else {
            None
        };

        self.config()
            .pricing
            .quote(pricing::Request {
                duration,
                hourly_rate: equipment.rates.per_hour(),
                operator_rate,
                delivery,
                transport_charge: equipment.transport_charge,
            })
            .map_err(tracerr::from_and_wrap!(=> E))
    }
}

/// Error of [`QuoteBooking`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`booking::Duration`] is longer than
    /// [`booking::Duration::MAX_DAYS`].
    #[display("`Booking` for {_0:?} is too long")]
    #[from(ignore)]
    DurationTooLong(#[error(not(source))] booking::Duration),

    /// [`Equipment`] with the provided ID doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Operator`] with the provided ID doesn't exist.
    #[display("`Operator(id: {_0})` does not exist")]
    #[from(ignore)]
    OperatorNotExists(#[error(not(source))] operator::Id),

    /// Price calculation failed.
    #[display("Pricing failed: {_0}")]
    #[from]
    Pricing(pricing::Error),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use std::num::NonZeroU32;

    use crate::{
        command::fixture,
        domain::{booking, equipment, operator, user::Role},
        Command as _,
    };

    use super::{ExecutionError, QuoteBooking};

    fn quote(
        equipment_id: equipment::Id,
        operator_id: Option<operator::Id>,
        delivery: booking::Delivery,
    ) -> QuoteBooking {
        QuoteBooking {
            equipment_id,
            operator_id,
            duration: booking::Duration::Hours(NonZeroU32::new(2).unwrap()),
            delivery,
        }
    }

    fn delivery() -> booking::Delivery {
        booking::Delivery::Delivery {
            address: booking::Address::new("Plot 12, Wagholi").unwrap(),
        }
    }

    #[tokio::test]
    async fn quotes_like_booking() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let q = svc
            .execute(quote(equipment.id, None, delivery()))
            .await
            .unwrap();
        assert_eq!(q.hours, 2);
        assert_eq!(q.base, "1200INR".parse().unwrap());
        assert_eq!(q.total, "1700INR".parse().unwrap());

        let q = svc
            .execute(quote(equipment.id, None, booking::Delivery::Pickup))
            .await
            .unwrap();
        assert_eq!(q.transport, "-250INR".parse().unwrap());
        assert_eq!(q.total, "950INR".parse().unwrap());
    }

    #[tokio::test]
    async fn adds_operator_work() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let driver = fixture::user(&svc, "ganesh", Role::Operator).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let operator = svc
            .execute(fixture::register_operator(driver.id))
            .await
            .unwrap();

        let q = svc
            .execute(quote(equipment.id, Some(operator.id), delivery()))
            .await
            .unwrap();
        assert_eq!(q.operator, Some("400INR".parse().unwrap()));
        assert_eq!(q.total, "2100INR".parse().unwrap());
    }

    #[tokio::test]
    async fn errors_on_unknown_entities() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let err = svc
            .execute(quote(equipment::Id::new(), None, delivery()))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::EquipmentNotExists(_)));

        let err = svc
            .execute(quote(equipment.id, Some(operator::Id::new()), delivery()))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OperatorNotExists(_)));
    }

    #[tokio::test]
    async fn rejects_too_long_duration() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let mut q = quote(equipment.id, None, delivery());
        q.duration =
            booking::Duration::parse(booking::DurationUnit::Days, "4000000");
        let err = svc.execute(q).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::DurationTooLong(_)));
    }
}
