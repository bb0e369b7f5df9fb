//! [`Equipment`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{equipment, Equipment},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::{contains_ignore_case, eq_ignore_case, total_count};

impl<S, IDs> Database<Select<By<HashMap<equipment::Id, Equipment>, IDs>>>
    for Memory<S>
where
    S: Storage,
    IDs: AsRef<[equipment::Id]> + Send + Sync,
{
    type Ok = HashMap<equipment::Id, Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<equipment::Id, Equipment>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.read(|s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| s.equipment.get(id))
                .filter(|e| e.deleted_at.is_none())
                .map(|e| (e.id, e.clone()))
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Equipment>, equipment::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Equipment>, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            s.equipment
                .get(&id)
                .filter(|e| e.deleted_at.is_none())
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Equipment>> for Memory<S>
where
    S: Storage,
    Self: Database<Update<Equipment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(equipment): Insert<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(equipment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<Equipment>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(equipment): Update<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.equipment.insert(equipment.id, equipment)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`Equipment`] passes the
/// [`read::equipment::list::Filter`].
fn matches(filter: &read::equipment::list::Filter, e: &Equipment) -> bool {
    let read::equipment::list::Filter {
        kind,
        status,
        owner_id,
        state,
        district,
        max_hourly_rate,
        name,
    } = filter;

    e.deleted_at.is_none()
        && kind.map_or(true, |k| e.kind == k)
        && status.map_or(true, |st| e.status == st)
        && owner_id.map_or(true, |id| e.owner_id == id)
        && state.as_ref().map_or(true, |st| {
            eq_ignore_case(e.location.state.as_ref(), st.as_ref())
        })
        && district.as_ref().map_or(true, |d| {
            eq_ignore_case(e.location.district.as_ref(), d.as_ref())
        })
        && max_hourly_rate.map_or(true, |max| {
            let rate = e.rates.per_hour();
            rate.currency == max.currency && rate.amount <= max.amount
        })
        && name.as_ref().map_or(true, |n| {
            contains_ignore_case(e.name.as_ref(), n.as_ref())
        })
}

impl<S>
    Database<
        Select<
            By<read::equipment::list::Page, read::equipment::list::Selector>,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::equipment::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::equipment::list::Page, read::equipment::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::equipment::list::Selector { arguments, filter } =
            by.into_inner();
        self.read(|s| {
            read::equipment::list::Page::paginate(
                &arguments,
                s.equipment
                    .values()
                    .filter(|e| matches(&filter, e))
                    .map(|e| (e.id, e.id)),
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
                read::equipment::list::TotalCount,
                read::equipment::list::Filter,
            >,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::equipment::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::equipment::list::TotalCount,
                read::equipment::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.equipment.values().filter(|e| matches(&filter, e)).count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        pagination::Arguments,
        DateTime,
    };

    use crate::{
        domain::{equipment, user, Equipment},
        infra::{Database as _, Memory},
        read,
    };

    fn tractor(owner_id: user::Id, name: &str, per_hour: &str) -> Equipment {
        Equipment {
            id: equipment::Id::new(),
            owner_id,
            name: equipment::Name::new(name).unwrap(),
            kind: equipment::Kind::Tractor,
            description: None,
            rates: equipment::Rates::new(per_hour.parse().unwrap(), None, None)
                .unwrap(),
            transport_charge: equipment::TransportCharge::new(
                "500INR".parse().unwrap(),
            )
            .unwrap(),
            location: equipment::Location {
                coordinates: equipment::Coordinates::new(18.52, 73.85)
                    .unwrap(),
                village: equipment::Place::new("Wagholi").unwrap(),
                district: equipment::Place::new("Pune").unwrap(),
                state: equipment::Place::new("Maharashtra").unwrap(),
            },
            status: equipment::Status::Available,
            features: vec![],
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn filters_catalog() {
        let db = Memory::new();
        let owner = user::Id::new();

        let cheap = tractor(owner, "Mahindra 575 DI", "600INR");
        let pricey = tractor(owner, "John Deere 5050", "900INR");
        let mut broken = tractor(user::Id::new(), "Swaraj 744", "500INR");
        broken.status = equipment::Status::Maintenance;
        for e in [&cheap, &pricey, &broken] {
            db.execute(Insert(e.clone())).await.unwrap();
        }

        let select = |filter| {
            let db = db.clone();
            async move {
                db.execute(Select(By::<read::equipment::list::Page, _>::new(
                    read::equipment::list::Selector {
                        arguments: Arguments::new(None, None, None, None, 10)
                            .unwrap(),
                        filter,
                    },
                )))
                .await
                .unwrap()
                .edges
                .into_iter()
                .map(|e| e.node)
                .collect::<Vec<_>>()
            }
        };

        let all = select(read::equipment::list::Filter::default()).await;
        assert_eq!(all, [cheap.id, pricey.id, broken.id]);

        let affordable = select(read::equipment::list::Filter {
            max_hourly_rate: Some("700INR".parse().unwrap()),
            status: Some(equipment::Status::Available),
            ..Default::default()
        })
        .await;
        assert_eq!(affordable, [cheap.id]);

        let by_name = select(read::equipment::list::Filter {
            name: Some(equipment::Name::new("deere").unwrap()),
            district: Some(equipment::Place::new("PUNE").unwrap()),
            ..Default::default()
        })
        .await;
        assert_eq!(by_name, [pricey.id]);

        let owned = select(read::equipment::list::Filter {
            owner_id: Some(owner),
            ..Default::default()
        })
        .await;
        assert_eq!(owned, [cheap.id, pricey.id]);
    }
}
