//! [`Negotiation`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A farmer's request to rent for a lower price than quoted.
#[derive(Clone, Debug, From)]
pub struct Negotiation {
    /// ID of this [`Negotiation`].
    id: Id,

    /// Underlying [`domain::Negotiation`].
    negotiation: OnceCell<domain::Negotiation>,
}

impl From<domain::Negotiation> for Negotiation {
    fn from(negotiation: domain::Negotiation) -> Self {
        Self {
            id: negotiation.id.into(),
            negotiation: OnceCell::new_with(Some(negotiation)),
        }
    }
}

impl Negotiation {
    /// Creates a new [`Negotiation`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Negotiation`] with the provided ID exists,
    /// otherwise accessing this [`Negotiation`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            negotiation: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Negotiation`].
    async fn negotiation(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Negotiation, Error> {
        let id = self.id.into();
        self.negotiation
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::negotiation::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|n| {
                        future::ready(n.ok_or_else(|| {
                            api::query::NegotiationError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A farmer's request to rent for a lower price than quoted.
#[graphql_object(context = Context)]
impl Negotiation {
    /// Unique identifier of this `Negotiation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Booking` being negotiated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(&self, ctx: &Context) -> Result<api::Booking, Error> {
        let id = self.negotiation(ctx).await?.booking_id;

        #[expect(unsafe_code, reason = "`Negotiation` guarantees `Booking`")]
        Ok(unsafe { api::Booking::new_unchecked(id) })
    }

    /// Negotiated `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        let id = self.negotiation(ctx).await?.equipment_id;

        #[expect(unsafe_code, reason = "`Negotiation` guarantees `Equipment`")]
        Ok(unsafe { api::Equipment::new_unchecked(id) })
    }

    /// Farmer `User` proposing the price.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.farmer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn farmer(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.negotiation(ctx).await?.farmer_id;

        #[expect(unsafe_code, reason = "`Negotiation` guarantees farmer")]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Owner `User` responding to the proposal.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.negotiation(ctx).await?.owner_id;

        #[expect(unsafe_code, reason = "`Negotiation` guarantees owner")]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Quoted price this `Negotiation` started from.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.originalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn original_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.negotiation(ctx).await?.original_price)
    }

    /// Price proposed by the farmer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.proposedPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proposed_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.negotiation(ctx).await?.proposed_price)
    }

    /// Message of the farmer, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.message",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn message(
        &self,
        ctx: &Context,
    ) -> Result<Option<Message>, Error> {
        Ok(self.negotiation(ctx).await?.message.clone().map(Into::into))
    }

    /// Price countered by the owner, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.counterOfferPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn counter_offer_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.negotiation(ctx).await?.counter_offer_price())
    }

    /// Message of the owner's counter offer, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.counterOfferMessage",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn counter_offer_message(
        &self,
        ctx: &Context,
    ) -> Result<Option<Message>, Error> {
        Ok(match &self.negotiation(ctx).await?.status {
            domain::negotiation::Status::Countered { message, .. } => {
                message.clone().map(Into::into)
            }
            domain::negotiation::Status::Pending
            | domain::negotiation::Status::Accepted { .. }
            | domain::negotiation::Status::Rejected { .. }
            | domain::negotiation::Status::FarmerAccepted { .. }
            | domain::negotiation::Status::FarmerRejected { .. } => None,
        })
    }

    /// Price both sides agreed on, if they did.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.agreedPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn agreed_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.negotiation(ctx).await?.agreed_price())
    }

    /// `NegotiationStatus` of this `Negotiation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.negotiation(ctx).await?.status.kind().into())
    }

    /// `DateTime` when this `Negotiation` was opened.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.negotiation(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Negotiation` was last responded to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Negotiation.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.negotiation(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Negotiation`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::negotiation::Id)]
#[into(domain::negotiation::Id)]
#[graphql(name = "NegotiationId", transparent)]
pub struct Id(Uuid);

/// Message attached to a `Negotiation` proposal or counter offer.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "NegotiationMessage",
    with = scalar::Via::<domain::negotiation::Message>,
)]
pub struct Message(domain::negotiation::Message);

/// Status of a `Negotiation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "NegotiationStatus")]
pub enum Status {
    /// Awaits the owner's response.
    Pending,

    /// Owner accepted the proposed price.
    Accepted,

    /// Owner rejected the proposal.
    Rejected,

    /// Owner countered with another price.
    Countered,

    /// Farmer accepted the counter offer.
    FarmerAccepted,

    /// Farmer rejected the counter offer.
    FarmerRejected,
}

impl From<domain::negotiation::StatusKind> for Status {
    fn from(kind: domain::negotiation::StatusKind) -> Self {
        use domain::negotiation::StatusKind as S;

        match kind {
            S::Pending => Self::Pending,
            S::Accepted => Self::Accepted,
            S::Rejected => Self::Rejected,
            S::Countered => Self::Countered,
            S::FarmerAccepted => Self::FarmerAccepted,
            S::FarmerRejected => Self::FarmerRejected,
        }
    }
}

impl From<Status> for domain::negotiation::StatusKind {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Accepted => Self::Accepted,
            Status::Rejected => Self::Rejected,
            Status::Countered => Self::Countered,
            Status::FarmerAccepted => Self::FarmerAccepted,
            Status::FarmerRejected => Self::FarmerRejected,
        }
    }
}

/// Result of a response to a `Negotiation`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "RespondToNegotiationResult")]
pub struct RespondResult {
    /// Responded `Negotiation`.
    pub negotiation: Negotiation,

    /// Negotiated `Booking` with its price updated on agreement.
    pub booking: api::Booking,
}

impl From<command::respond_to_negotiation::Output> for RespondResult {
    fn from(output: command::respond_to_negotiation::Output) -> Self {
        Self {
            negotiation: output.negotiation.into(),
            booking: output.booking.into(),
        }
    }
}

/// Decision of an owner on a `Negotiation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "NegotiationOwnerDecision")]
pub enum OwnerDecision {
    /// Accept the proposed price.
    Accept,

    /// Reject the proposal.
    Reject,

    /// Counter with another price.
    Counter,
}

/// Decision of a farmer on a counter offer.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "NegotiationFarmerDecision")]
pub enum FarmerDecision {
    /// Accept the countered price.
    Accept,

    /// Reject the counter offer.
    Reject,
}

impl From<FarmerDecision> for domain::negotiation::FarmerResponse {
    fn from(decision: FarmerDecision) -> Self {
        match decision {
            FarmerDecision::Accept => Self::Accept,
            FarmerDecision::Reject => Self::Reject,
        }
    }
}

pub mod list {
    //! Definitions related to [`Negotiation`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use crate::{api::scalar, AsError, Context, Error};

    use super::{Id, Negotiation};

    /// Cursor for the `Negotiation` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::negotiation::list::Cursor)]
    #[graphql(
        name = "NegotiationListCursor",
        with = scalar::Via::<read::negotiation::list::Cursor>,
    )]
    pub struct Cursor(pub read::negotiation::list::Cursor);

    /// Edge in the [`Negotiation`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::negotiation::list::Edge);

    /// Edge in the `Negotiation` list.
    #[graphql_object(name = "NegotiationListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `NegotiationListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `NegotiationListEdge`.
        #[must_use]
        pub fn node(&self) -> Negotiation {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Negotiation` existence"
            )]
            unsafe {
                Negotiation::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Negotiation`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::negotiation::list::Connection`].
        page: read::negotiation::list::Connection,

        /// [`read::negotiation::list::Filter`] the page is selected with.
        filter: read::negotiation::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected `page`.
        #[must_use]
        pub fn new(
            page: read::negotiation::list::Connection,
            filter: read::negotiation::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Negotiation` list.
    #[graphql_object(name = "NegotiationListConnection", context = Context)]
    impl Connection {
        /// Edges of this `NegotiationListConnection`.
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
                filter: self.filter,
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::negotiation::list::PageInfo`].
        info: read::negotiation::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::negotiation::list::Filter`] to count with.
        filter: read::negotiation::list::Filter,
    }

    /// Information about a `NegotiationListConnection` page.
    #[graphql_object(name = "NegotiationListPageInfo", context = Context)]
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

        /// Total count of the `Negotiation`s passing the filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::negotiations::TotalCount::by(self.filter))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
