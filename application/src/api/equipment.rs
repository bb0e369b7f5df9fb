//! [`Equipment`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A piece of farm equipment listed for rent.
#[derive(Clone, Debug, From)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    id: Id,

    /// Underlying [`domain::Equipment`].
    equipment: OnceCell<domain::Equipment>,
}

impl From<domain::Equipment> for Equipment {
    fn from(equipment: domain::Equipment) -> Self {
        Self {
            id: equipment.id.into(),
            equipment: OnceCell::new_with(Some(equipment)),
        }
    }
}

impl Equipment {
    /// Creates a new [`Equipment`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Equipment`] with the provided ID exists,
    /// otherwise accessing this [`Equipment`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            equipment: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Equipment`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Equipment`] doesn't exist.
    async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Equipment, Error> {
        let id = self.id.into();
        self.equipment
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::equipment::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EquipmentError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A piece of farm equipment listed for rent.
#[graphql_object(context = Context)]
impl Equipment {
    /// Unique identifier of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `User` owning this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.owner",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn owner(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.equipment(ctx).await?.owner_id;

        #[expect(
            unsafe_code,
            reason = "`Equipment` guarantees owner existence"
        )]
        Ok(unsafe { api::User::new_unchecked(id) })
    }

    /// Name of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.equipment(ctx).await?.name.clone().into())
    }

    /// `EquipmentKind` of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.equipment(ctx).await?.kind.into())
    }

    /// Description of this `Equipment`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.equipment(ctx).await?.description.clone().map(Into::into))
    }

    /// Price of an hour of this `Equipment` use.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.hourlyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hourly_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.equipment(ctx).await?.rates.per_hour())
    }

    /// Price of a day of this `Equipment` use, if quoted by the owner.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.dailyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn daily_rate(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.equipment(ctx).await?.rates.per_day())
    }

    /// Price of an acre processed by this `Equipment`, if quoted by the
    /// owner.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.acreRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn acre_rate(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.equipment(ctx).await?.rates.per_acre())
    }

    /// Charge for delivering this `Equipment` to a farm.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.transportCharge",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn transport_charge(
        &self,
        ctx: &Context,
    ) -> Result<Money, Error> {
        Ok(self.equipment(ctx).await?.transport_charge.money())
    }

    /// `EquipmentLocation` this `Equipment` is stationed at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.equipment(ctx).await?.location.clone().into())
    }

    /// `EquipmentStatus` of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.equipment(ctx).await?.status.into())
    }

    /// Feature tags of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.features",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn features(&self, ctx: &Context) -> Result<Vec<Feature>, Error> {
        Ok(self
            .equipment(ctx)
            .await?
            .features
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when this `Equipment` was listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.equipment(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Equipment`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::equipment::Id)]
#[into(domain::equipment::Id)]
#[graphql(name = "EquipmentId", transparent)]
pub struct Id(Uuid);

/// Name of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentName",
    with = scalar::Via::<domain::equipment::Name>,
)]
pub struct Name(domain::equipment::Name);

/// Description of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentDescription",
    with = scalar::Via::<domain::equipment::Description>,
)]
pub struct Description(domain::equipment::Description);

/// Feature tag of an `Equipment`, like `4WD`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentFeature",
    with = scalar::Via::<domain::equipment::Feature>,
)]
pub struct Feature(domain::equipment::Feature);

/// Name of a village, district or state.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Place", with = scalar::Via::<domain::equipment::Place>)]
pub struct Place(domain::equipment::Place);

/// Location an `Equipment` is stationed at.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "EquipmentLocation")]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Village the `Equipment` is stationed in.
    pub village: Place,

    /// District the `Equipment` is stationed in.
    pub district: Place,

    /// State the `Equipment` is stationed in.
    pub state: Place,
}

impl From<domain::equipment::Location> for Location {
    fn from(location: domain::equipment::Location) -> Self {
        let domain::equipment::Location {
            coordinates,
            village,
            district,
            state,
        } = location;
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            village: village.into(),
            district: district.into(),
            state: state.into(),
        }
    }
}

/// Location an `Equipment` is stationed at.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "EquipmentLocationInput")]
pub struct LocationInput {
    /// Latitude in decimal degrees, within `[-90; 90]`.
    pub latitude: f64,

    /// Longitude in decimal degrees, within `[-180; 180]`.
    pub longitude: f64,

    /// Village the `Equipment` is stationed in.
    pub village: Place,

    /// District the `Equipment` is stationed in.
    pub district: Place,

    /// State the `Equipment` is stationed in.
    pub state: Place,
}

impl TryFrom<LocationInput> for domain::equipment::Location {
    type Error = InputError;

    fn try_from(input: LocationInput) -> Result<Self, Self::Error> {
        Ok(Self {
            coordinates: domain::equipment::Coordinates::new(
                input.latitude,
                input.longitude,
            )
            .ok_or(InputError::InvalidCoordinates)?,
            village: input.village.into(),
            district: input.district.into(),
            state: input.state.into(),
        })
    }
}

/// Rental rates of an `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "EquipmentRatesInput")]
pub struct RatesInput {
    /// Price of an hour of work.
    pub per_hour: Money,

    /// Price of a day of work, if offered.
    pub per_day: Option<Money>,

    /// Price of an acre of work, if offered.
    pub per_acre: Option<Money>,
}

impl TryFrom<RatesInput> for domain::equipment::Rates {
    type Error = InputError;

    fn try_from(input: RatesInput) -> Result<Self, Self::Error> {
        Self::new(input.per_hour, input.per_day, input.per_acre)
            .ok_or(InputError::InvalidRates)
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_COORDINATES"]
        #[status = BAD_REQUEST]
        #[message = "Latitude must be within [-90; 90] and longitude within \
                     [-180; 180]"]
        InvalidCoordinates,

        #[code = "INVALID_RATES"]
        #[status = BAD_REQUEST]
        #[message = "Rates must be positive and in the same currency"]
        InvalidRates,

        #[code = "INVALID_TRANSPORT_CHARGE"]
        #[status = BAD_REQUEST]
        #[message = "Transport charge must not be negative"]
        InvalidTransportCharge,
    }
}

/// Kind of an `Equipment`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "EquipmentKind")]
pub enum Kind {
    /// Tractor.
    Tractor,

    /// Combine harvester.
    Harvester,

    /// Rotavator.
    Rotavator,

    /// Seed drill.
    Seeder,

    /// Crop sprayer.
    Sprayer,

    /// Thresher.
    Thresher,

    /// Cultivator.
    Cultivator,

    /// Plough.
    Plough,

    /// Hay baler.
    Baler,
}

impl From<domain::equipment::Kind> for Kind {
    fn from(kind: domain::equipment::Kind) -> Self {
        use domain::equipment::Kind as K;

        match kind {
            K::Tractor => Self::Tractor,
            K::Harvester => Self::Harvester,
            K::Rotavator => Self::Rotavator,
            K::Seeder => Self::Seeder,
            K::Sprayer => Self::Sprayer,
            K::Thresher => Self::Thresher,
            K::Cultivator => Self::Cultivator,
            K::Plough => Self::Plough,
            K::Baler => Self::Baler,
        }
    }
}

impl From<Kind> for domain::equipment::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Tractor => Self::Tractor,
            Kind::Harvester => Self::Harvester,
            Kind::Rotavator => Self::Rotavator,
            Kind::Seeder => Self::Seeder,
            Kind::Sprayer => Self::Sprayer,
            Kind::Thresher => Self::Thresher,
            Kind::Cultivator => Self::Cultivator,
            Kind::Plough => Self::Plough,
            Kind::Baler => Self::Baler,
        }
    }
}

/// Status of an `Equipment`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "EquipmentStatus")]
pub enum Status {
    /// `Equipment` can be booked.
    Available,

    /// `Equipment` is reserved by a confirmed `Booking`.
    Booked,

    /// `Equipment` is working on a farm.
    InUse,

    /// `Equipment` is under maintenance.
    Maintenance,
}

impl From<domain::equipment::Status> for Status {
    fn from(status: domain::equipment::Status) -> Self {
        use domain::equipment::Status as S;

        match status {
            S::Available => Self::Available,
            S::Booked => Self::Booked,
            S::InUse => Self::InUse,
            S::Maintenance => Self::Maintenance,
        }
    }
}

impl From<Status> for domain::equipment::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Available => Self::Available,
            Status::Booked => Self::Booked,
            Status::InUse => Self::InUse,
            Status::Maintenance => Self::Maintenance,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Equipment`] catalog.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use crate::{api::scalar, AsError, Context, Error};

    use super::{Equipment, Id};

    /// Cursor for the `Equipment` catalog.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::equipment::list::Cursor)]
    #[graphql(
        name = "EquipmentListCursor",
        with = scalar::Via::<read::equipment::list::Cursor>,
    )]
    pub struct Cursor(pub read::equipment::list::Cursor);

    /// Edge in the [`Equipment`] catalog.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::equipment::list::Edge);

    /// Edge in the `Equipment` catalog.
    #[graphql_object(name = "EquipmentListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `EquipmentListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `EquipmentListEdge`.
        #[must_use]
        pub fn node(&self) -> Equipment {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees \
                          `Equipment` existence"
            )]
            unsafe {
                Equipment::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Equipment`] catalog.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::equipment::list::Connection`].
        page: read::equipment::list::Connection,

        /// [`read::equipment::list::Filter`] the page is selected with.
        filter: read::equipment::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected `page`.
        #[must_use]
        pub fn new(
            page: read::equipment::list::Connection,
            filter: read::equipment::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Equipment` catalog.
    #[graphql_object(name = "EquipmentListConnection", context = Context)]
    impl Connection {
        /// Edges of this `EquipmentListConnection`.
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
        /// Underlying [`read::equipment::list::PageInfo`].
        info: read::equipment::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::equipment::list::Filter`] to count the catalog with.
        filter: read::equipment::list::Filter,
    }

    /// Information about an `EquipmentListConnection` page.
    #[graphql_object(name = "EquipmentListPageInfo", context = Context)]
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

        /// Total count of the `Equipment` passing the filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::catalog::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
