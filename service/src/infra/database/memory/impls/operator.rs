//! [`Operator`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{operator, user, Operator},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::total_count;

impl<S, IDs> Database<Select<By<HashMap<operator::Id, Operator>, IDs>>>
    for Memory<S>
where
    S: Storage,
    IDs: AsRef<[operator::Id]> + Send + Sync,
{
    type Ok = HashMap<operator::Id, Operator>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<operator::Id, Operator>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.read(|s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| s.operators.get(id))
                .map(|o| (o.id, o.clone()))
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Operator>, operator::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Operator>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Operator>, operator::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.operators.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Operator>, user::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Operator>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Operator>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        self.read(|s| {
            s.operators.values().find(|o| o.user_id == user_id).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Operator>> for Memory<S>
where
    S: Storage,
    Self: Database<Update<Operator>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(operator): Insert<Operator>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(operator))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<Operator>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(operator): Update<Operator>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.operators.insert(operator.id, operator)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`Operator`] passes the
/// [`read::operator::list::Filter`].
fn matches(filter: &read::operator::list::Filter, o: &Operator) -> bool {
    let read::operator::list::Filter {
        specialization,
        verified_only,
        available_only,
    } = filter;

    (!verified_only || o.is_verified)
        && (!available_only || o.is_available)
        && specialization.as_ref().map_or(true, |s| o.specializes_in(s))
}

impl<S>
    Database<
        Select<
            By<read::operator::list::Page, read::operator::list::Selector>,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::operator::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::operator::list::Page, read::operator::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::operator::list::Selector { arguments, filter } =
            by.into_inner();
        self.read(|s| {
            read::operator::list::Page::paginate(
                &arguments,
                s.operators
                    .values()
                    .filter(|o| matches(&filter, o))
                    .map(|o| (o.id, o.id)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Select<
            By<read::operator::list::TotalCount, read::operator::list::Filter>,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::operator::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::operator::list::TotalCount, read::operator::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.operators.values().filter(|o| matches(&filter, o)).count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
