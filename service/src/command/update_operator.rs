//! [`Command`] for updating an [`Operator`] profile.

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{operator, user, Operator},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an [`Operator`] profile.
#[derive(Clone, Copy, Debug)]
pub struct UpdateOperator {
    /// ID of the [`Operator`] to update.
    pub operator_id: operator::Id,

    /// [`User`] performing the update.
    pub by: Editor,

    /// Change to apply.
    pub change: Change,
}

/// [`User`] updating an [`Operator`] profile.
#[derive(Clone, Copy, Debug)]
pub struct Editor {
    /// ID of the [`User`].
    pub user_id: user::Id,

    /// [`user::Role`] of the [`User`].
    pub role: user::Role,
}

/// Change of an [`Operator`] profile.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    /// Sets [`Operator::is_verified`]. Admins only.
    Verification(bool),

    /// Sets [`Operator::is_available`]. The [`Operator`] only.
    Availability(bool),
}

impl<Db> Command<UpdateOperator> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Operator>, operator::Id>>,
            Ok = Option<Operator>,
            Err = Traced<database::Error>,
        > + Database<Update<Operator>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Operator;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateOperator,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateOperator {
            operator_id,
            by,
            change,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut operator = tx
            .execute(Select(By::new(operator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::OperatorNotExists(operator_id)))?;

        match change {
            Change::Verification(verified) => {
                if by.role != user::Role::Admin {
                    return Err(tracerr::new!(E::Forbidden(by.user_id)));
                }
                operator.is_verified = verified;
            }
            Change::Availability(available) => {
                if by.user_id != operator.user_id {
                    return Err(tracerr::new!(E::Forbidden(by.user_id)));
                }
                operator.is_available = available;
            }
        }

        tx.execute(Update(operator.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Operator(id: {operator_id})` updated: {change:?}");

        Ok(operator)
    }
}

/// Error of [`UpdateOperator`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Operator`] with the provided ID doesn't exist.
    #[display("`Operator(id: {_0})` does not exist")]
    #[from(ignore)]
    OperatorNotExists(#[error(not(source))] operator::Id),

    /// [`User`] is not allowed to apply the [`Change`].
    #[display("`User(id: {_0})` is not allowed to update the operator")]
    #[from(ignore)]
    Forbidden(#[error(not(source))] user::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{command::fixture, domain::user::Role, Command as _};

    use super::{Change, Editor, ExecutionError, UpdateOperator};

    #[tokio::test]
    async fn admin_verifies_and_operator_toggles_availability() {
        let svc = fixture::service();
        let admin = fixture::user(&svc, "admin", Role::Admin).await;
        let user = fixture::user(&svc, "mohan", Role::Operator).await;
        let operator = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap();

        let operator = svc
            .execute(UpdateOperator {
                operator_id: operator.id,
                by: Editor {
                    user_id: admin.id,
                    role: admin.role,
                },
                change: Change::Verification(true),
            })
            .await
            .unwrap();
        assert!(operator.is_bookable());

        let operator = svc
            .execute(UpdateOperator {
                operator_id: operator.id,
                by: Editor {
                    user_id: user.id,
                    role: user.role,
                },
                change: Change::Availability(false),
            })
            .await
            .unwrap();
        assert!(operator.is_verified);
        assert!(!operator.is_bookable());
    }

    #[tokio::test]
    async fn operators_cannot_verify_themselves() {
        let svc = fixture::service();
        let user = fixture::user(&svc, "mohan", Role::Operator).await;
        let operator = svc
            .execute(fixture::register_operator(user.id))
            .await
            .unwrap();

        let err = svc
            .execute(UpdateOperator {
                operator_id: operator.id,
                by: Editor {
                    user_id: user.id,
                    role: user.role,
                },
                change: Change::Verification(true),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Forbidden(_)));
    }
}
