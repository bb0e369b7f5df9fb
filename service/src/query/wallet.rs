//! [`Query`] collection related to a [`Wallet`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{user, Wallet},
    infra::{database, Database},
    Query, Service,
};
#[cfg(doc)]
use crate::domain::User;

/// Queries a [`Wallet`] of a [`User`].
///
/// [`User`]s who never used their [`Wallet`] get an empty one.
#[derive(Clone, Copy, Debug)]
pub struct ByUserId(pub user::Id);

impl<Db> Query<ByUserId> for Service<Db>
where
    Db: Database<
        Select<By<Option<Wallet>, user::Id>>,
        Ok = Option<Wallet>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Wallet;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ByUserId(user_id): ByUserId,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::wrap!())?
            .unwrap_or_else(|| Wallet::empty(user_id)))
    }
}
