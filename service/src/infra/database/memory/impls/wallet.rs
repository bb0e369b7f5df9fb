//! [`Wallet`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{user, wallet, Wallet},
    infra::{
        database::{self, memory::Storage, Memory},
        Database,
    },
    read,
};

use super::total_count;

impl<S> Database<Select<By<Option<Wallet>, user::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Wallet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Wallet>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        self.read(|s| s.wallets.get(&user_id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Update<Wallet>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(wallet): Update<Wallet>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.wallets.insert(wallet.user_id, wallet)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<wallet::Transaction>, wallet::TransactionId>>>
    for Memory<S>
where
    S: Storage,
{
    type Ok = Option<wallet::Transaction>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<wallet::Transaction>, wallet::TransactionId>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.transactions.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<wallet::Transaction>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(tx): Insert<wallet::Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.transactions.insert(tx.id, tx)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Checks whether the [`wallet::Transaction`] passes the
/// [`read::wallet::transaction::list::Filter`].
fn matches(
    filter: &read::wallet::transaction::list::Filter,
    tx: &wallet::Transaction,
) -> bool {
    let read::wallet::transaction::list::Filter { user_id, kind } = *filter;

    tx.user_id == user_id && kind.map_or(true, |k| tx.kind == k)
}

impl<S>
    Database<
        Select<
            By<
                read::wallet::transaction::list::Page,
                read::wallet::transaction::list::Selector,
            >,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::wallet::transaction::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::wallet::transaction::list::Page,
                read::wallet::transaction::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::wallet::transaction::list::Selector { arguments, filter } =
            by.into_inner();
        self.read(|s| {
            read::wallet::transaction::list::Page::paginate(
                &arguments,
                s.transactions
                    .values()
                    .filter(|tx| matches(&filter, tx))
                    .map(|tx| (tx.id, tx.id)),
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
                read::wallet::transaction::list::TotalCount,
                read::wallet::transaction::list::Filter,
            >,
        >,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::wallet::transaction::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::wallet::transaction::list::TotalCount,
                read::wallet::transaction::list::Filter,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| {
            total_count(
                s.transactions
                    .values()
                    .filter(|tx| matches(&filter, tx))
                    .count(),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
