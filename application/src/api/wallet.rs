//! [`Wallet`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Balance a `User` pays `Booking`s from and receives earnings to.
#[derive(Clone, Debug, From)]
pub struct Wallet(domain::Wallet);

/// Balance a `User` pays `Booking`s from and receives earnings to.
#[graphql_object(context = Context)]
impl Wallet {
    /// `User` owning this `Wallet`.
    #[must_use]
    pub fn user(&self) -> api::User {
        #[expect(unsafe_code, reason = "`Wallet` guarantees `User` existence")]
        unsafe {
            api::User::new_unchecked(self.0.user_id)
        }
    }

    /// Current balance of this `Wallet`.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.0.balance
    }

    /// `DateTime` when the balance last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// A movement of money on a `Wallet`.
#[derive(Clone, Debug, From)]
pub struct Transaction {
    /// ID of this [`Transaction`].
    id: TransactionId,

    /// Underlying [`domain::wallet::Transaction`].
    transaction: OnceCell<domain::wallet::Transaction>,
}

impl From<domain::wallet::Transaction> for Transaction {
    fn from(transaction: domain::wallet::Transaction) -> Self {
        Self {
            id: transaction.id.into(),
            transaction: OnceCell::new_with(Some(transaction)),
        }
    }
}

impl Transaction {
    /// Creates a new [`Transaction`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Transaction`] with the provided ID exists,
    /// otherwise accessing this [`Transaction`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<TransactionId>) -> Self {
        Self {
            id: id.into(),
            transaction: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::wallet::Transaction`].
    async fn transaction(
        &self,
        ctx: &Context,
    ) -> Result<&domain::wallet::Transaction, Error> {
        let id = self.id.into();
        self.transaction
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::transactions::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|t| {
                        future::ready(t.ok_or_else(|| {
                            api::query::TransactionError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A movement of money on a `Wallet`.
#[graphql_object(name = "WalletTransaction", context = Context)]
impl Transaction {
    /// Unique identifier of this `WalletTransaction`.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// `WalletTransactionKind` of this `WalletTransaction`.
    pub async fn kind(&self, ctx: &Context) -> Result<TransactionKind, Error> {
        Ok(self.transaction(ctx).await?.kind.into())
    }

    /// Moved amount, always positive.
    pub async fn amount(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.transaction(ctx).await?.amount)
    }

    /// Paid `Booking`, if any.
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        let id = self.transaction(ctx).await?.booking_id;

        #[expect(unsafe_code, reason = "`Transaction` guarantees `Booking`")]
        Ok(id.map(|id| unsafe { api::Booking::new_unchecked(id) }))
    }

    /// `DateTime` when this `WalletTransaction` happened.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.transaction(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `WalletTransaction`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::wallet::TransactionId)]
#[into(domain::wallet::TransactionId)]
#[graphql(name = "WalletTransactionId", transparent)]
pub struct TransactionId(Uuid);

/// Kind of a `WalletTransaction`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "WalletTransactionKind")]
pub enum TransactionKind {
    /// Money added to a `Wallet`.
    TopUp,

    /// Farmer paid for a `Booking`.
    Payment,

    /// Owner earned from a `Booking`.
    Earning,
}

impl From<domain::wallet::TransactionKind> for TransactionKind {
    fn from(kind: domain::wallet::TransactionKind) -> Self {
        use domain::wallet::TransactionKind as K;

        match kind {
            K::TopUp => Self::TopUp,
            K::Payment => Self::Payment,
            K::Earning => Self::Earning,
        }
    }
}

impl From<TransactionKind> for domain::wallet::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::TopUp => Self::TopUp,
            TransactionKind::Payment => Self::Payment,
            TransactionKind::Earning => Self::Earning,
        }
    }
}

pub mod transaction {
    //! Definitions related to the [`Transaction`] history.
    //!
    //! [`Transaction`]: super::Transaction

    pub mod list {
        //! Definitions related to [`Transaction`] list.

        use derive_more::{AsRef, From, Into};
        use juniper::{graphql_object, GraphQLScalar};
        use service::{query, read, Query as _};

        use crate::{api::scalar, AsError, Context, Error};

        use super::super::{Transaction, TransactionId};

        /// Cursor for the `WalletTransaction` list.
        #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
        #[from(TransactionId, read::wallet::transaction::list::Cursor)]
        #[graphql(
            name = "WalletTransactionListCursor",
            with = scalar::Via::<read::wallet::transaction::list::Cursor>,
        )]
        pub struct Cursor(pub read::wallet::transaction::list::Cursor);

        /// Edge in the [`Transaction`] list.
        #[derive(Clone, Copy, Debug, From, Into)]
        pub struct Edge(read::wallet::transaction::list::Edge);

        /// Edge in the `WalletTransaction` list.
        #[graphql_object(
            name = "WalletTransactionListEdge",
            context = Context,
        )]
        impl Edge {
            /// Cursor of this `WalletTransactionListEdge`.
            #[must_use]
            pub fn cursor(&self) -> Cursor {
                self.0.cursor.into()
            }

            /// Node of this `WalletTransactionListEdge`.
            #[must_use]
            pub fn node(&self) -> Transaction {
                #[expect(
                    unsafe_code,
                    reason = "`Edge` loaded from repository guarantees \
                              `Transaction` existence"
                )]
                unsafe {
                    Transaction::new_unchecked(self.0.node)
                }
            }
        }

        /// Connection of the [`Transaction`] list.
        #[derive(Clone, Debug)]
        pub struct Connection {
            /// Underlying [`read::wallet::transaction::list::Connection`].
            page: read::wallet::transaction::list::Connection,

            /// [`read::wallet::transaction::list::Filter`] of the page.
            filter: read::wallet::transaction::list::Filter,
        }

        impl Connection {
            /// Creates a new [`Connection`] out of the selected `page`.
            #[must_use]
            pub fn new(
                page: read::wallet::transaction::list::Connection,
                filter: read::wallet::transaction::list::Filter,
            ) -> Self {
                Self { page, filter }
            }
        }

        /// Connection of the `WalletTransaction` list.
        #[graphql_object(
            name = "WalletTransactionListConnection",
            context = Context,
        )]
        impl Connection {
            /// Edges of this `WalletTransactionListConnection`.
            #[must_use]
            pub fn edges(&self) -> Vec<Edge> {
                self.page.edges.iter().copied().map(Into::into).collect()
            }

            /// Information about the page.
            #[must_use]
            pub fn page_info(&self) -> PageInfo {
                let edges = &self.page.edges;
                PageInfo {
                    info: self.page.page_info(),
                    start_cursor: edges.first().map(|e| e.cursor.into()),
                    end_cursor: edges.last().map(|e| e.cursor.into()),
                    filter: self.filter,
                }
            }
        }

        /// Information about a [`Connection`] page.
        #[derive(Clone, Copy, Debug)]
        pub struct PageInfo {
            /// Underlying [`read::wallet::transaction::list::PageInfo`].
            info: read::wallet::transaction::list::PageInfo,

            /// Start cursor of the page.
            start_cursor: Option<Cursor>,

            /// End cursor of the page.
            end_cursor: Option<Cursor>,

            /// [`read::wallet::transaction::list::Filter`] to count with.
            filter: read::wallet::transaction::list::Filter,
        }

        /// Information about a `WalletTransactionListConnection` page.
        #[graphql_object(
            name = "WalletTransactionListPageInfo",
            context = Context,
        )]
        impl PageInfo {
            /// Indicator whether there is a next page.
            #[must_use]
            pub fn has_next_page(&self) -> bool {
                self.info.has_next_page
            }

            /// Indicator whether there is a previous page.
            #[must_use]
            pub fn has_previous_page(&self) -> bool {
                self.info.has_previous_page
            }

            /// Start cursor of the page.
            #[must_use]
            pub fn start_cursor(&self) -> &Option<Cursor> {
                &self.start_cursor
            }

            /// End cursor of the page.
            #[must_use]
            pub fn end_cursor(&self) -> &Option<Cursor> {
                &self.end_cursor
            }

            /// Total count of the `WalletTransaction`s passing the filter.
            pub async fn total_count(
                &self,
                ctx: &Context,
            ) -> Result<i32, Error> {
                ctx.service()
                    .execute(query::transactions::TotalCount::by(self.filter))
                    .await
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .map(Into::into)
            }
        }
    }
}
