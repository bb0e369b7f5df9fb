//! [`Operator`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// An operator who can be booked to drive rented machinery.
#[derive(Clone, Debug, From)]
pub struct Operator {
    /// ID of this [`Operator`].
    id: Id,

    /// Underlying [`domain::Operator`].
    operator: OnceCell<domain::Operator>,
}

impl From<domain::Operator> for Operator {
    fn from(operator: domain::Operator) -> Self {
        Self {
            id: operator.id.into(),
            operator: OnceCell::new_with(Some(operator)),
        }
    }
}

impl Operator {
    /// Creates a new [`Operator`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Operator`] with the provided ID exists,
    /// otherwise accessing this [`Operator`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            operator: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Operator`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Operator`] doesn't exist.
    async fn operator(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Operator, Error> {
        let id = self.id.into();
        self.operator
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::operator::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|o| {
                        future::ready(o.ok_or_else(|| {
                            api::query::OperatorError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An operator who can be booked to drive rented machinery.
#[graphql_object(context = Context)]
impl Operator {
    /// Unique identifier of this `Operator`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` this `Operator` profile belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.user",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.operator(ctx).await?.user_id;

        #[expect(
            unsafe_code,
            reason = "`Operator` guarantees `User` existence"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Specializations of this `Operator`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.specializations",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn specializations(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Specialization>, Error> {
        Ok(self
            .operator(ctx)
            .await?
            .specializations
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Price of an hour of this `Operator`'s work.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.hourlyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hourly_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.operator(ctx).await?.hourly_rate)
    }

    /// Rating of this `Operator`, if rated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<Option<Rating>, Error> {
        Ok(self.operator(ctx).await?.rating.map(Into::into))
    }

    /// Years of this `Operator`'s experience.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.experienceYears",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn experience_years(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.operator(ctx).await?.experience_years.into())
    }

    /// Indicator whether an admin verified this `Operator`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.isVerified",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_verified(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.operator(ctx).await?.is_verified)
    }

    /// Indicator whether this `Operator` accepts new bookings.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.operator(ctx).await?.is_available)
    }

    /// `DateTime` when this `Operator` was registered.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Operator.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.operator(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Operator`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::operator::Id)]
#[into(domain::operator::Id)]
#[graphql(name = "OperatorId", transparent)]
pub struct Id(Uuid);

/// Specialization of an `Operator`, like `Harvester`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OperatorSpecialization",
    with = scalar::Via::<domain::operator::Specialization>,
)]
pub struct Specialization(domain::operator::Specialization);

/// Rating of an `Operator` within `[0; 5]`.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "OperatorRating",
    with = scalar::Via::<domain::operator::Rating>,
)]
pub struct Rating(domain::operator::Rating);

pub mod list {
    //! Definitions related to [`Operator`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use crate::{api::scalar, AsError, Context, Error};

    use super::{Id, Operator};

    /// Cursor for the `Operator` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::operator::list::Cursor)]
    #[graphql(
        name = "OperatorListCursor",
        with = scalar::Via::<read::operator::list::Cursor>,
    )]
    pub struct Cursor(pub read::operator::list::Cursor);

    /// Edge in the [`Operator`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::operator::list::Edge);

    /// Edge in the `Operator` list.
    #[graphql_object(name = "OperatorListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `OperatorListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `OperatorListEdge`.
        #[must_use]
        pub fn node(&self) -> Operator {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Operator` existence"
            )]
            unsafe {
                Operator::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Operator`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::operator::list::Connection`].
        page: read::operator::list::Connection,

        /// [`read::operator::list::Filter`] the page is selected with.
        filter: read::operator::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected `page`.
        #[must_use]
        pub fn new(
            page: read::operator::list::Connection,
            filter: read::operator::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Operator` list.
    #[graphql_object(name = "OperatorListConnection", context = Context)]
    impl Connection {
        /// Edges in this `OperatorListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.page.page_info(),
                start_cursor: self.page.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.page.edges.last().map(|e| e.cursor.into()),
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::operator::list::PageInfo`].
        info: read::operator::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::operator::list::Filter`] to count the `Operator`s with.
        filter: read::operator::list::Filter,
    }

    /// Information about an `OperatorListConnection` page.
    #[graphql_object(name = "OperatorListPageInfo", context = Context)]
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

        /// Total count of the `Operator`s passing the filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::operators::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
