//! [`Command`] for listing a new [`Equipment`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{equipment, user, Equipment, User, Wallet},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing a new [`Equipment`] for rent.
#[derive(Clone, Debug)]
pub struct CreateEquipment {
    /// ID of the [`User`] owning the [`Equipment`].
    pub owner_id: user::Id,

    /// [`equipment::Name`] of the [`Equipment`].
    pub name: equipment::Name,

    /// [`equipment::Kind`] of the [`Equipment`].
    pub kind: equipment::Kind,

    /// [`equipment::Description`] of the [`Equipment`], if any.
    pub description: Option<equipment::Description>,

    /// [`equipment::Rates`] of the [`Equipment`].
    pub rates: equipment::Rates,

    /// [`equipment::TransportCharge`] of the [`Equipment`].
    pub transport_charge: equipment::TransportCharge,

    /// [`equipment::Location`] of the [`Equipment`].
    pub location: equipment::Location,

    /// [`equipment::Feature`]s of the [`Equipment`].
    pub features: Vec<equipment::Feature>,
}

impl<Db> Command<CreateEquipment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<Equipment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Equipment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEquipment {
            owner_id,
            name,
            kind,
            description,
            rates,
            transport_charge,
            location,
            features,
        } = cmd;

        if rates.currency() != Wallet::CURRENCY
            || transport_charge.money().currency != Wallet::CURRENCY
        {
            return Err(tracerr::new!(E::WrongCurrency));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let owner = tx
            .execute(Select(By::new(owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::UserNotExists(owner_id)))?;
        if owner.role != user::Role::Owner {
            return Err(tracerr::new!(E::NotOwner(owner_id)));
        }

        let equipment = Equipment {
            id: equipment::Id::new(),
            owner_id,
            name,
            kind,
            description,
            rates,
            transport_charge,
            location,
            status: equipment::Status::Available,
            features,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        tx.execute(Insert(equipment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Equipment(id: {})` listed by `User(id: {owner_id})`",
            equipment.id,
        );

        Ok(equipment)
    }
}

/// Error of [`CreateEquipment`] [`Command`] execution.
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

    /// [`User`] is not an equipment owner.
    #[display("`User(id: {_0})` is not an owner")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] user::Id),

    /// Prices are not in the [`Wallet::CURRENCY`].
    #[display("Prices must be in {}", Wallet::CURRENCY)]
    WrongCurrency,
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{command::fixture, domain::user::Role, Command as _};

    use super::ExecutionError;

    #[tokio::test]
    async fn lists_available_equipment() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;

        let equipment = svc
            .execute(fixture::create_equipment(owner.id, "600INR"))
            .await
            .unwrap();

        assert!(equipment.is_bookable());
        assert_eq!(equipment.owner_id, owner.id);
    }

    #[tokio::test]
    async fn only_owners_list_equipment() {
        let svc = fixture::service();
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;

        let err = svc
            .execute(fixture::create_equipment(farmer.id, "600INR"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));
    }

    #[tokio::test]
    async fn rejects_foreign_currency() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;

        let err = svc
            .execute(fixture::create_equipment(owner.id, "10USD"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::WrongCurrency));
    }
}
