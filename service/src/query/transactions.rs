//! [`Query`] collection related to [`wallet::Transaction`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::wallet, read};

use super::DatabaseQuery;

/// Queries a [`wallet::Transaction`] by its [`wallet::TransactionId`].
pub type ById =
    DatabaseQuery<By<Option<wallet::Transaction>, wallet::TransactionId>>;

/// Queries a history of [`wallet::Transaction`]s.
pub type List = DatabaseQuery<
    By<
        read::wallet::transaction::list::Page,
        read::wallet::transaction::list::Selector,
    >,
>;

/// Queries total count of [`wallet::Transaction`]s passing a filter.
pub type TotalCount = DatabaseQuery<
    By<
        read::wallet::transaction::list::TotalCount,
        read::wallet::transaction::list::Filter,
    >,
>;
