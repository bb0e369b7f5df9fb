//! [`User`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::{contains_ignore_case, total_count};

impl<S, IDs> Database<Select<By<HashMap<user::Id, User>, IDs>>> for Memory<S>
where
    S: Storage,
    IDs: AsRef<[user::Id]> + Send + Sync,
{
    type Ok = HashMap<user::Id, User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<user::Id, User>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.read(|s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| s.users.get(id))
                .filter(|u| u.deleted_at.is_none())
                .map(|u| (u.id, u.clone()))
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<User>, user::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            s.users.get(&id).filter(|u| u.deleted_at.is_none()).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<User>, &user::Login>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &user::Login>>,
    ) -> Result<Self::Ok, Self::Err> {
        let login = by.into_inner();
        self.read(|s| {
            s.users
                .values()
                .find(|u| u.deleted_at.is_none() && &u.login == login)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<User>> for Memory<S>
where
    S: Storage,
    Self: Database<Update<User>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(user)).await.map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<User>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.users.insert(user.id, user)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`User`] passes the [`read::user::list::Filter`].
fn matches(filter: &read::user::list::Filter, user: &User) -> bool {
    let read::user::list::Filter { name, role } = filter;

    user.deleted_at.is_none()
        && role.map_or(true, |r| user.role == r)
        && name.as_ref().map_or(true, |n| {
            contains_ignore_case(user.name.as_ref(), n.as_ref())
        })
}

impl<S>
    Database<
        Select<By<read::user::list::Page, read::user::list::Selector>>,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::user::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::user::list::Page, read::user::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::user::list::Selector { arguments, filter } = by.into_inner();
        self.read(|s| {
            read::user::list::Page::paginate(
                &arguments,
                s.users
                    .values()
                    .filter(|u| matches(&filter, u))
                    .map(|u| (u.id, u.id)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Select<By<read::user::list::TotalCount, read::user::list::Filter>>,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::user::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::user::list::TotalCount, read::user::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.users.values().filter(|u| matches(&filter, u)).count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
