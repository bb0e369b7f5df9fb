//! [`Command`] for switching an [`Equipment`] status by its owner.

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{equipment, user, Equipment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for switching an [`Equipment`] between
/// [`equipment::Status::Available`] and [`equipment::Status::Maintenance`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateEquipmentStatus {
    /// ID of the [`Equipment`] to update.
    pub equipment_id: equipment::Id,

    /// ID of the [`User`] requesting the update.
    pub by: user::Id,

    /// New [`equipment::Status`].
    pub status: equipment::Status,
}

impl<Db> Command<UpdateEquipmentStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<Update<Equipment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Equipment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateEquipmentStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEquipmentStatus {
            equipment_id,
            by,
            status,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut equipment = tx
            .execute(Select(By::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::EquipmentNotExists(equipment_id))
            })?;
        if equipment.owner_id != by {
            return Err(tracerr::new!(E::NotOwner(by)));
        }

        equipment.status = equipment
            .status
            .switch(status)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Equipment(id: {equipment_id})` is {status} now");

        Ok(equipment)
    }
}

/// Error of [`UpdateEquipmentStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Equipment`] with the provided ID doesn't exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    #[from(ignore)]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`User`] doesn't own the [`Equipment`].
    #[display("`User(id: {_0})` does not own the equipment")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] user::Id),

    /// [`equipment::Status`] cannot be switched.
    #[display("{_0}")]
    #[from]
    Transition(equipment::TransitionError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{
        command::fixture,
        domain::{equipment::Status, user::Role},
        Command as _,
    };

    use super::{ExecutionError, UpdateEquipmentStatus};

    #[tokio::test]
    async fn owner_sends_to_maintenance_and_back() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        for status in [Status::Maintenance, Status::Available] {
            let updated = svc
                .execute(UpdateEquipmentStatus {
                    equipment_id: equipment.id,
                    by: owner.id,
                    status,
                })
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn booking_statuses_are_not_switchable() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let err = svc
            .execute(UpdateEquipmentStatus {
                equipment_id: equipment.id,
                by: owner.id,
                status: Status::InUse,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Transition(_)));
    }

    #[tokio::test]
    async fn strangers_cannot_switch() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let other = fixture::user(&svc, "vikram", Role::Owner).await;
        let equipment = fixture::equipment(&svc, owner.id).await;

        let err = svc
            .execute(UpdateEquipmentStatus {
                equipment_id: equipment.id,
                by: other.id,
                status: Status::Maintenance,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));
    }
}
