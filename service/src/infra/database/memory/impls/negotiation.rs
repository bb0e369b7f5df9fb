//! [`Negotiation`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{negotiation, Negotiation},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::total_count;

impl<S, IDs> Database<Select<By<HashMap<negotiation::Id, Negotiation>, IDs>>>
    for Memory<S>
where
    S: Storage,
    IDs: AsRef<[negotiation::Id]> + Send + Sync,
{
    type Ok = HashMap<negotiation::Id, Negotiation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<negotiation::Id, Negotiation>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.read(|s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| s.negotiations.get(id))
                .map(|n| (n.id, n.clone()))
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Negotiation>, negotiation::Id>>>
    for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Negotiation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Negotiation>, negotiation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.negotiations.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Negotiation>> for Memory<S>
where
    S: Storage,
    Self:
        Database<Update<Negotiation>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(negotiation): Insert<Negotiation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(negotiation))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<Negotiation>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(negotiation): Update<Negotiation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.negotiations.insert(negotiation.id, negotiation));
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`Negotiation`] passes the
/// [`read::negotiation::list::Filter`].
fn matches(filter: &read::negotiation::list::Filter, n: &Negotiation) -> bool {
    let read::negotiation::list::Filter {
        farmer_id,
        owner_id,
        status,
    } = *filter;

    farmer_id.map_or(true, |id| n.farmer_id == id)
        && owner_id.map_or(true, |id| n.owner_id == id)
        && status.map_or(true, |st| n.status.kind() == st)
}

impl<S>
    Database<
        Select<
            By<
                read::negotiation::list::Page,
                read::negotiation::list::Selector,
            >,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::negotiation::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::negotiation::list::Page,
                read::negotiation::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::negotiation::list::Selector { arguments, filter } =
            by.into_inner();
        self.read(|s| {
            read::negotiation::list::Page::paginate(
                &arguments,
                s.negotiations
                    .values()
                    .filter(|n| matches(&filter, n))
                    .map(|n| (n.id, n.id)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Select<
            By<
                read::negotiation::list::TotalCount,
                read::negotiation::list::Filter,
            >,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::negotiation::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::negotiation::list::TotalCount,
                read::negotiation::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.negotiations
                    .values()
                    .filter(|n| matches(&filter, n))
                    .count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
