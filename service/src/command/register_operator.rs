//! [`Command`] for registering an [`Operator`] profile.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{operator, user, Operator, User, Wallet},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering an [`Operator`] profile of a [`User`] with
/// the [`user::Role::Operator`].
///
/// Registered [`Operator`]s await an admin's verification before they can be
/// booked.
#[derive(Clone, Debug)]
pub struct RegisterOperator {
    /// ID of the [`User`] the profile belongs to.
    pub user_id: user::Id,

    /// [`operator::Specialization`]s of the [`Operator`].
    pub specializations: Vec<operator::Specialization>,

    /// Price of an hour of the [`Operator`]'s work.
    pub hourly_rate: Money,

    /// Years of the [`Operator`]'s experience.
    pub experience_years: u8,
}

impl<Db> Command<RegisterOperator> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Operator>, user::Id>>,
            Ok = Option<Operator>,
            Err = Traced<database::Error>,
        > + Database<Insert<Operator>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Operator;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterOperator,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterOperator {
            user_id,
            specializations,
            hourly_rate,
            experience_years,
        } = cmd;

        if !hourly_rate.is_positive()
            || hourly_rate.currency != Wallet::CURRENCY
        {
            return Err(tracerr::new!(E::InvalidRate(hourly_rate)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let user = tx
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::UserNotExists(user_id)))?;
        if user.role != user::Role::Operator {
            return Err(tracerr::new!(E::NotOperator(user_id)));
        }

        let existing = tx
            .execute(Select(By::<Option<Operator>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(existing) = existing {
            return Err(tracerr::new!(E::AlreadyRegistered(existing.id)));
        }

        let operator = Operator {
            id: operator::Id::new(),
            user_id,
            specializations,
            hourly_rate,
            rating: None,
            experience_years,
            is_verified: false,
            is_available: true,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(operator.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Operator(id: {})` registered for `User(id: {user_id})`",
            operator.id,
        );

        Ok(operator)
    }
}

/// Error of [`RegisterOperator`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] doesn't have the [`user::Role::Operator`].
    #[display("`User(id: {_0})` is not an operator")]
    #[from(ignore)]
    NotOperator(#[error(not(source))] user::Id),

    /// [`User`] already has an [`Operator`] profile.
    #[display("`Operator(id: {_0})` is already registered")]
    #[from(ignore)]
    AlreadyRegistered(#[error(not(source))] operator::Id),

    /// Hourly rate is not a positive amount of the [`Wallet::CURRENCY`].
    #[display("Invalid hourly rate: {_0}")]
    #[from(ignore)]
    InvalidRate(#[error(not(source))] Money),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{command::fixture, domain::user::Role, Command as _};

    use super::ExecutionError;

    #[tokio::test]
    async fn registers_unverified_operator() {
        let svc = fixture::service();
        let user = fixture::user(&svc, "mohan", Role::Operator).await;

        let operator = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap();

        assert!(!operator.is_verified);
        assert!(!operator.is_bookable());
    }

    #[tokio::test]
    async fn allows_single_profile_per_user() {
        let svc = fixture::service();
        let user = fixture::user(&svc, "mohan", Role::Operator).await;
        _ = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap();

        let err = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn requires_operator_role() {
        let svc = fixture::service();
        let user = fixture::user(&svc, "ramesh", Role::Farmer).await;

        let err = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOperator(_)));
    }
}
