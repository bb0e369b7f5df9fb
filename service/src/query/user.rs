//! [`Query`] collection locating a single marketplace [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;

/// Queries a [`User`] by its [`user::Login`].
pub type ByLogin<'l> = DatabaseQuery<By<Option<User>, &'l user::Login>>;

#[cfg(all(test, feature = "memory"))]
mod spec {
    use crate::{
        command::fixture,
        domain::user::{self, Role},
        Command as _,
    };

    use super::{ById, ByLogin};

    #[tokio::test]
    async fn finds_registered_user() {
        let svc = fixture::service();
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;

        let by_id = svc.execute(ById::by(farmer.id)).await.unwrap().unwrap();
        assert_eq!(by_id.role, Role::Farmer);

        let by_login = svc
            .execute(ByLogin::by(&farmer.login))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_login.id, farmer.id);
    }

    #[tokio::test]
    async fn misses_unknown_user() {
        let svc = fixture::service();
        _ = fixture::user(&svc, "ramesh", Role::Farmer).await;

        assert!(svc
            .execute(ById::by(user::Id::new()))
            .await
            .unwrap()
            .is_none());

        let login = user::Login::new("suresh").unwrap();
        assert!(svc.execute(ByLogin::by(&login)).await.unwrap().is_none());
    }
}
