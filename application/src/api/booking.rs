//! [`Booking`]-related definitions.

use common::{DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{command, domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A rent of an `Equipment` by a farmer.
#[derive(Clone, Debug, From)]
pub struct Booking {
    /// ID of this [`Booking`].
    id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(&self, ctx: &Context) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A rent of an `Equipment` by a farmer.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Rented `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        let id = self.booking(ctx).await?.equipment_id;

        #[expect(unsafe_code, reason = "`Booking` guarantees `Equipment`")]
        Ok(unsafe { api::Equipment::new_unchecked(id) })
    }

    /// Farmer `User` who placed this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.farmer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn farmer(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.booking(ctx).await?.farmer_id;

        #[expect(unsafe_code, reason = "`Booking` guarantees farmer existence")]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Owner `User` of the rented `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.booking(ctx).await?.owner_id;

        #[expect(unsafe_code, reason = "`Booking` guarantees owner existence")]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// `Operator` driving the rented `Equipment`, if booked.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.operator",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn operator(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Operator>, Error> {
        let id = self.booking(ctx).await?.operator_id;

        #[expect(unsafe_code, reason = "`Booking` guarantees `Operator`")]
        Ok(id.map(|id| unsafe { api::Operator::new_unchecked(id) }))
    }

    /// `DateTime` when the rent starts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.startsAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn starts_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.schedule.starts_at.coerce())
    }

    /// `DateTime` when the rent ends.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.endsAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn ends_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        self.booking(ctx)
            .await?
            .schedule
            .ends_at()
            .map(|ends_at| ends_at.coerce())
            .ok_or_else(|| Error::internal(&"`Booking` end is out of range"))
    }

    /// `BookingDuration` of the rent.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.duration",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn duration(&self, ctx: &Context) -> Result<Duration, Error> {
        Ok(self.booking(ctx).await?.schedule.duration.into())
    }

    /// How the rented `Equipment` reaches the farm.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.delivery",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn delivery(&self, ctx: &Context) -> Result<Delivery, Error> {
        Ok(self.booking(ctx).await?.delivery.clone().into())
    }

    /// Price breakdown quoted when this `Booking` was placed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.quote",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn quote(&self, ctx: &Context) -> Result<Quote, Error> {
        Ok(self.booking(ctx).await?.quote.into())
    }

    /// `Negotiation` of the price of this `Booking`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.negotiation",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn negotiation(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Negotiation>, Error> {
        let id = self.booking(ctx).await?.negotiation_id;

        #[expect(unsafe_code, reason = "`Booking` guarantees `Negotiation`")]
        Ok(id.map(|id| unsafe { api::Negotiation::new_unchecked(id) }))
    }

    /// Price the farmer pays for this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.totalPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.booking(ctx).await?.total_price)
    }

    /// `BookingStatus` of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.kind().into())
    }

    /// `DateTime` when the owner confirmed this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.confirmedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn confirmed_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(match self.booking(ctx).await?.status {
            domain::booking::Status::Confirmed { confirmed_at } => {
                Some(confirmed_at.coerce())
            }
            domain::booking::Status::Pending
            | domain::booking::Status::Ongoing { .. }
            | domain::booking::Status::Completed { .. }
            | domain::booking::Status::Cancelled { .. } => None,
        })
    }

    /// `DateTime` when the work on this `Booking` started.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.startedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn started_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.booking(ctx).await?.status.started_at().map(|at| at.coerce()))
    }

    /// `DateTime` when the work on this `Booking` was completed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.completedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn completed_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(match self.booking(ctx).await?.status {
            domain::booking::Status::Completed { completed_at, .. } => {
                Some(completed_at.coerce())
            }
            domain::booking::Status::Pending
            | domain::booking::Status::Confirmed { .. }
            | domain::booking::Status::Ongoing { .. }
            | domain::booking::Status::Cancelled { .. } => None,
        })
    }

    /// `DateTime` when this `Booking` was cancelled.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.cancelledAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cancelled_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(match self.booking(ctx).await?.status {
            domain::booking::Status::Cancelled { cancelled_at, .. } => {
                Some(cancelled_at.coerce())
            }
            domain::booking::Status::Pending
            | domain::booking::Status::Confirmed { .. }
            | domain::booking::Status::Ongoing { .. }
            | domain::booking::Status::Completed { .. } => None,
        })
    }

    /// `User` who cancelled this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.cancelledBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cancelled_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        Ok(match self.booking(ctx).await?.status {
            domain::booking::Status::Cancelled { by, .. } => {
                #[expect(unsafe_code, reason = "`Booking` guarantees `User`")]
                Some(unsafe { api::User::new_unchecked(by) })
            }
            domain::booking::Status::Pending
            | domain::booking::Status::Confirmed { .. }
            | domain::booking::Status::Ongoing { .. }
            | domain::booking::Status::Completed { .. } => None,
        })
    }

    /// `DateTime` when the farmer paid for this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.paidAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn paid_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.booking(ctx).await?.paid_at.map(|at| at.coerce()))
    }

    /// `DateTime` when this `Booking` was placed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.created_at.coerce())
    }
}

/// Result of a `Booking` creation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CreateBookingResult")]
pub struct CreateResult {
    /// Created `Booking`.
    pub booking: Booking,

    /// `Negotiation` opened for the proposed price, if any.
    pub negotiation: Option<api::Negotiation>,
}

impl From<command::create_booking::Output> for CreateResult {
    fn from(output: command::create_booking::Output) -> Self {
        Self {
            booking: output.booking.into(),
            negotiation: output.negotiation.map(Into::into),
        }
    }
}

/// Unique identifier of a `Booking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Address of a farm to deliver `Equipment` to.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DeliveryAddress",
    with = scalar::Via::<domain::booking::Address>,
)]
pub struct Address(domain::booking::Address);

/// Unit of a `BookingDuration`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingDurationUnit")]
pub enum DurationUnit {
    /// Rent by hours.
    Hours,

    /// Rent by days.
    Days,
}

impl From<domain::booking::DurationUnit> for DurationUnit {
    fn from(unit: domain::booking::DurationUnit) -> Self {
        use domain::booking::DurationUnit as U;

        match unit {
            U::Hours => Self::Hours,
            U::Days => Self::Days,
        }
    }
}

impl From<DurationUnit> for domain::booking::DurationUnit {
    fn from(unit: DurationUnit) -> Self {
        match unit {
            DurationUnit::Hours => Self::Hours,
            DurationUnit::Days => Self::Days,
        }
    }
}

/// Duration of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "BookingDuration")]
pub struct Duration {
    /// Unit of this `BookingDuration`.
    pub unit: DurationUnit,

    /// Number of units.
    pub count: i32,
}

impl From<domain::booking::Duration> for Duration {
    fn from(duration: domain::booking::Duration) -> Self {
        Self {
            unit: duration.unit().into(),
            count: i32::try_from(duration.count().get()).unwrap_or(i32::MAX),
        }
    }
}

/// Duration of a `Booking` to place.
///
/// `count` is taken as typed: unparsable or zero counts become `1`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "BookingDurationInput")]
pub struct DurationInput {
    /// Unit of the duration.
    pub unit: DurationUnit,

    /// Number of units.
    pub count: String,
}

impl From<DurationInput> for domain::booking::Duration {
    fn from(input: DurationInput) -> Self {
        Self::parse(input.unit.into(), &input.count)
    }
}

/// Way the rented `Equipment` reaches the farm.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "DeliveryKind")]
pub enum DeliveryKind {
    /// Owner delivers the `Equipment` to the farm.
    Delivery,

    /// Farmer picks the `Equipment` up.
    Pickup,
}

/// Way the rented `Equipment` reaches the farm.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "BookingDelivery")]
pub struct Delivery {
    /// Kind of the delivery.
    pub kind: DeliveryKind,

    /// Address to deliver to, if delivered.
    pub address: Option<Address>,
}

impl From<domain::booking::Delivery> for Delivery {
    fn from(delivery: domain::booking::Delivery) -> Self {
        match delivery {
            domain::booking::Delivery::Delivery { address } => Self {
                kind: DeliveryKind::Delivery,
                address: Some(address.into()),
            },
            domain::booking::Delivery::Pickup => Self {
                kind: DeliveryKind::Pickup,
                address: None,
            },
        }
    }
}

/// Way the rented `Equipment` should reach the farm.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "BookingDeliveryInput")]
pub struct DeliveryInput {
    /// Kind of the delivery.
    pub kind: DeliveryKind,

    /// Address to deliver to, required for `DELIVERY`.
    pub address: Option<Address>,
}

impl TryFrom<DeliveryInput> for domain::booking::Delivery {
    type Error = DeliveryError;

    fn try_from(input: DeliveryInput) -> Result<Self, Self::Error> {
        match input.kind {
            DeliveryKind::Delivery => Ok(Self::Delivery {
                address: input
                    .address
                    .ok_or(DeliveryError::AddressRequired)?
                    .into(),
            }),
            DeliveryKind::Pickup => Ok(Self::Pickup),
        }
    }
}

define_error! {
    enum DeliveryError {
        #[code = "DELIVERY_ADDRESS_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "`DeliveryAddress` must be provided for `DELIVERY`"]
        AddressRequired,
    }
}

define_error! {
    enum DurationError {
        #[code = "BOOKING_TOO_LONG"]
        #[status = BAD_REQUEST]
        #[message = "`Booking` cannot last longer than 366 days"]
        TooLong,
    }
}

/// Price breakdown of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "BookingQuote")]
pub struct Quote {
    /// Billed working hours.
    pub hours: i32,

    /// Price of the `Equipment` itself.
    pub base: Money,

    /// Price of the `Operator` work, if booked.
    pub operator: Option<Money>,

    /// Transport charge on delivery, or a negative discount on pickup.
    pub transport: Money,

    /// Total price, never negative.
    pub total: Money,
}

impl From<domain::pricing::Quote> for Quote {
    fn from(quote: domain::pricing::Quote) -> Self {
        let domain::pricing::Quote {
            hours,
            base,
            operator,
            transport,
            total,
        } = quote;
        Self {
            hours: i32::try_from(hours).unwrap_or(i32::MAX),
            base,
            operator,
            transport,
            total,
        }
    }
}

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Awaits the owner's confirmation.
    Pending,

    /// Confirmed by the owner.
    Confirmed,

    /// `Equipment` is working on the farm.
    Ongoing,

    /// Work is done.
    Completed,

    /// `Booking` was called off.
    Cancelled,
}

impl From<domain::booking::StatusKind> for Status {
    fn from(kind: domain::booking::StatusKind) -> Self {
        use domain::booking::StatusKind as S;

        match kind {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Ongoing => Self::Ongoing,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::booking::StatusKind {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Confirmed => Self::Confirmed,
            Status::Ongoing => Self::Ongoing,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Transition between `BookingStatus`es.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingTransition")]
pub enum Transition {
    /// Owner confirms a pending `Booking`.
    Confirm,

    /// Work on a confirmed `Booking` starts.
    Start,

    /// Work on an ongoing `Booking` completes.
    Complete,

    /// Pending or confirmed `Booking` is called off.
    Cancel,
}

impl From<Transition> for domain::booking::Transition {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Confirm => Self::Confirm,
            Transition::Start => Self::Start,
            Transition::Complete => Self::Complete,
            Transition::Cancel => Self::Cancel,
        }
    }
}

/// Position of a delivery of the rented `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "BookingPosition")]
pub struct Position {
    /// Index of the last passed waypoint.
    pub index: i32,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Share of the route covered, within `[0; 1]`.
    pub progress: f64,

    /// Kilometers covered.
    pub covered_km: f64,

    /// Kilometers remaining.
    pub remaining_km: f64,

    /// Estimated seconds until the arrival.
    pub eta_secs: f64,

    /// Indicator whether the `Equipment` has arrived.
    pub arrived: bool,
}

impl From<domain::tracking::Position> for Position {
    fn from(position: domain::tracking::Position) -> Self {
        let domain::tracking::Position {
            index,
            coordinates,
            progress,
            covered_km,
            remaining_km,
            eta,
            arrived,
        } = position;
        Self {
            index: i32::try_from(index).unwrap_or(i32::MAX),
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            progress,
            covered_km,
            remaining_km,
            eta_secs: eta.as_secs_f64(),
            arrived,
        }
    }
}

/// Pricing policy of the marketplace.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "PricingPolicy")]
pub struct PricingPolicy {
    /// Working hours billed for a single day of rent.
    pub hours_per_day: i32,

    /// Discount applied to hourly rates when renting by days.
    pub daily_discount: Percent,

    /// Share of the transport charge refunded on pickup.
    pub pickup_discount: Percent,

    /// Lowest share of a quote a farmer may propose while negotiating.
    pub negotiation_floor: Percent,
}

impl From<domain::pricing::Policy> for PricingPolicy {
    fn from(policy: domain::pricing::Policy) -> Self {
        let domain::pricing::Policy {
            hours_per_day,
            daily_discount,
            pickup_discount,
            negotiation_floor,
        } = policy;
        Self {
            hours_per_day: hours_per_day.into(),
            daily_discount,
            pickup_discount,
            negotiation_floor,
        }
    }
}

pub mod list {
    //! Definitions related to [`Booking`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use crate::{api::scalar, AsError, Context, Error};

    use super::{Booking, Id};

    /// Cursor for the `Booking` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::booking::list::Cursor)]
    #[graphql(
        name = "BookingListCursor",
        with = scalar::Via::<read::booking::list::Cursor>,
    )]
    pub struct Cursor(pub read::booking::list::Cursor);

    /// Edge in the [`Booking`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::booking::list::Edge);

    /// Edge in the `Booking` list.
    #[graphql_object(name = "BookingListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `BookingListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `BookingListEdge`.
        #[must_use]
        pub fn node(&self) -> Booking {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Booking` existence"
            )]
            unsafe {
                Booking::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Booking`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::booking::list::Connection`].
        page: read::booking::list::Connection,

        /// [`read::booking::list::Filter`] the page is selected with.
        filter: read::booking::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected `page`.
        #[must_use]
        pub fn new(
            page: read::booking::list::Connection,
            filter: read::booking::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Booking` list.
    #[graphql_object(name = "BookingListConnection", context = Context)]
    impl Connection {
        /// Edges of this `BookingListConnection`.
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
        /// Underlying [`read::booking::list::PageInfo`].
        info: read::booking::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::booking::list::Filter`] to count the `Booking`s with.
        filter: read::booking::list::Filter,
    }

    /// Information about a `BookingListConnection` page.
    #[graphql_object(name = "BookingListPageInfo", context = Context)]
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

        /// Total count of the `Booking`s passing the filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::bookings::TotalCount::by(self.filter))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
