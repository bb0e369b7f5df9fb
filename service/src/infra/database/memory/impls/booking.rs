//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking, Wallet},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::total_count;

impl<S, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Memory<S>
where
    S: Storage,
    IDs: AsRef<[booking::Id]> + Send + Sync,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        self.read(|s| {
            ids.as_ref()
                .iter()
                .filter_map(|id| s.bookings.get(id))
                .map(|b| (b.id, b.clone()))
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Booking>, booking::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.bookings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Booking>> for Memory<S>
where
    S: Storage,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<Booking>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.bookings.insert(booking.id, booking)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`Booking`] passes the [`read::booking::list::Filter`].
fn matches(filter: &read::booking::list::Filter, b: &Booking) -> bool {
    let read::booking::list::Filter {
        farmer_id,
        owner_id,
        operator_id,
        equipment_id,
        status,
    } = *filter;

    farmer_id.map_or(true, |id| b.farmer_id == id)
        && owner_id.map_or(true, |id| b.owner_id == id)
        && operator_id.map_or(true, |id| b.operator_id == Some(id))
        && equipment_id.map_or(true, |id| b.equipment_id == id)
        && status.map_or(true, |st| b.status.kind() == st)
}

impl<S>
    Database<
        Select<By<read::booking::list::Page, read::booking::list::Selector>>,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::booking::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Selector { arguments, filter } =
            by.into_inner();
        self.read(|s| {
            read::booking::list::Page::paginate(
                &arguments,
                s.bookings
                    .values()
                    .filter(|b| matches(&filter, b))
                    .map(|b| (b.id, b.id)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::booking::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::TotalCount, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.bookings.values().filter(|b| matches(&filter, b)).count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Select<By<read::booking::Summary, read::booking::list::Filter>>,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::booking::Summary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::Summary, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        /// Adds the `price` to the `sum`, skipping foreign currencies.
        fn add(sum: Money, price: Money) -> Money {
            sum.checked_add(price).unwrap_or(sum)
        }

        let filter = by.into_inner();
        self.read(|s| {
            let mut counts = HashMap::<booking::StatusKind, usize>::new();
            let mut completed_value = Money::zero(Wallet::CURRENCY);
            let mut paid_value = Money::zero(Wallet::CURRENCY);

            for b in s.bookings.values().filter(|b| matches(&filter, b)) {
                *counts.entry(b.status.kind()).or_default() += 1;
                if b.status.kind() == booking::StatusKind::Completed {
                    completed_value = add(completed_value, b.total_price);
                }
                if b.paid_at.is_some() {
                    paid_value = add(paid_value, b.total_price);
                }
            }

            read::booking::Summary {
                by_status: counts
                    .into_iter()
                    .map(|(st, n)| (st, total_count(n)))
                    .collect(),
                completed_value,
                paid_value,
            }
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::{
        operations::{By, Insert, Select},
        pagination::Arguments,
        DateTime, Money,
    };

    use crate::{
        domain::{booking, equipment, pricing, user, Booking},
        infra::{Database as _, Memory},
        read,
    };

    fn booking(
        farmer_id: user::Id,
        owner_id: user::Id,
        total: &str,
    ) -> Booking {
        let total: Money = total.parse().unwrap();
        Booking {
            id: booking::Id::new(),
            equipment_id: equipment::Id::new(),
            farmer_id,
            owner_id,
            operator_id: None,
            schedule: booking::Schedule {
                starts_at: DateTime::now().coerce(),
                duration: booking::Duration::Hours(NonZeroU32::MIN),
            },
            delivery: booking::Delivery::Pickup,
            quote: pricing::Quote {
                hours: 1,
                base: total,
                operator: None,
                transport: Money::zero(total.currency),
                total,
            },
            negotiation_id: None,
            total_price: total,
            status: booking::Status::Pending,
            paid_at: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn lists_only_farmer_bookings() {
        let db = Memory::new();
        let (farmer, other, owner) =
            (user::Id::new(), user::Id::new(), user::Id::new());

        let mine = [
            booking(farmer, owner, "600INR"),
            booking(farmer, owner, "1550INR"),
        ];
        let theirs = booking(other, owner, "9140INR");
        for b in mine.iter().chain([&theirs]) {
            db.execute(Insert(b.clone())).await.unwrap();
        }

        let page = db
            .execute(Select(By::<read::booking::list::Page, _>::new(
                read::booking::list::Selector {
                    arguments: Arguments::new(None, None, None, None, 10)
                        .unwrap(),
                    filter: read::booking::list::Filter {
                        farmer_id: Some(farmer),
                        ..Default::default()
                    },
                },
            )))
            .await
            .unwrap();

        let ids = page.edges.iter().map(|e| e.node).collect::<Vec<_>>();
        assert_eq!(ids, [mine[0].id, mine[1].id]);
    }

    #[tokio::test]
    async fn summarizes_bookings() {
        let db = Memory::new();
        let (farmer, owner) = (user::Id::new(), user::Id::new());
        let now = DateTime::now();

        let mut done = booking(farmer, owner, "1550INR");
        done.status = booking::Status::Completed {
            started_at: now.coerce(),
            completed_at: now.coerce(),
        };
        done.paid_at = Some(now.coerce());
        let mut confirmed = booking(farmer, owner, "9140INR");
        confirmed.status = booking::Status::Confirmed {
            confirmed_at: now.coerce(),
        };
        confirmed.paid_at = Some(now.coerce());
        let pending = booking(farmer, owner, "600INR");
        for b in [&done, &confirmed, &pending] {
            db.execute(Insert(b.clone())).await.unwrap();
        }

        let summary = db
            .execute(Select(By::<read::booking::Summary, _>::new(
                read::booking::list::Filter {
                    owner_id: Some(owner),
                    ..Default::default()
                },
            )))
            .await
            .unwrap();

        assert_eq!(
            i32::from(summary.count(booking::StatusKind::Pending)),
            1,
        );
        assert_eq!(
            i32::from(summary.count(booking::StatusKind::Cancelled)),
            0,
        );
        assert_eq!(summary.completed_value, "1550INR".parse().unwrap());
        assert_eq!(summary.paid_value, "10690INR".parse().unwrap());
    }
}
