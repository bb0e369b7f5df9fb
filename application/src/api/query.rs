//! GraphQL [`Query`]s definitions.

use common::Money;
use juniper::graphql_object;
use service::{
    domain::{self, user, user::Role},
    query, read, Query as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Default number of items in a page.
    const DEFAULT_PAGE_SIZE: i32 = 10;
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        drop(ctx.current_session().await?);

        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `User`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `NOT_ADMIN` - the current `User` is not an admin.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "users",
            last = ?last,
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn users(
        first: Option<i32>,
        after: Option<api::user::list::Cursor>,
        last: Option<i32>,
        before: Option<api::user::list::Cursor>,
        name: Option<api::user::Name>,
        role: Option<api::user::Role>,
        ctx: &Context,
    ) -> Result<api::user::list::Connection, Error> {
        let arguments = read::user::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        drop(api::session_of(Role::Admin, ctx).await?);

        let filter = read::user::list::Filter {
            name: name.map(Into::into),
            role: role.map(Into::into),
        };
        ctx.service()
            .execute(query::users::List::by(read::user::list::Selector {
                arguments,
                filter: filter.clone(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::user::list::Connection::new(page, filter))
    }

    /// Returns the `Equipment` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "equipment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(query::equipment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|e| e.deleted_at.is_none())
            .ok_or_else(|| EquipmentError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of the `Equipment` catalog.
    ///
    /// Textual filters match case-insensitively, `name` matches any part of
    /// the `EquipmentName`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            district = ?district.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "catalog",
            kind = ?kind,
            last = ?last,
            max_hourly_rate = ?max_hourly_rate
                .as_ref()
                .map(ToString::to_string),
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            owner_id = ?owner_id.as_ref().map(ToString::to_string),
            state = ?state.as_ref().map(ToString::to_string),
            status = ?status,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn catalog(
        first: Option<i32>,
        after: Option<api::equipment::list::Cursor>,
        last: Option<i32>,
        before: Option<api::equipment::list::Cursor>,
        kind: Option<api::equipment::Kind>,
        status: Option<api::equipment::Status>,
        owner_id: Option<api::user::Id>,
        state: Option<api::equipment::Place>,
        district: Option<api::equipment::Place>,
        max_hourly_rate: Option<Money>,
        name: Option<api::equipment::Name>,
        ctx: &Context,
    ) -> Result<api::equipment::list::Connection, Error> {
        let arguments = read::equipment::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let filter = read::equipment::list::Filter {
            kind: kind.map(Into::into),
            status: status.map(Into::into),
            owner_id: owner_id.map(Into::into),
            state: state.map(Into::into),
            district: district.map(Into::into),
            max_hourly_rate,
            name: name.map(Into::into),
        };
        ctx.service()
            .execute(query::catalog::List::by(
                read::equipment::list::Selector {
                    arguments,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::equipment::list::Connection::new(page, filter))
    }

    /// Returns the `Operator` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OPERATOR_NOT_EXISTS` - the `Operator` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "operator",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn operator(
        id: api::operator::Id,
        ctx: &Context,
    ) -> Result<api::Operator, Error> {
        ctx.service()
            .execute(query::operator::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| OperatorError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Operator`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            available_only = ?available_only,
            before = ?before,
            first = ?first,
            gql.name = "operators",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            specialization = ?specialization.as_ref().map(ToString::to_string),
            verified_only = ?verified_only,
        ),
    )]
    pub async fn operators(
        first: Option<i32>,
        after: Option<api::operator::list::Cursor>,
        last: Option<i32>,
        before: Option<api::operator::list::Cursor>,
        specialization: Option<api::operator::Specialization>,
        verified_only: Option<bool>,
        available_only: Option<bool>,
        ctx: &Context,
    ) -> Result<api::operator::list::Connection, Error> {
        let arguments = read::operator::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let filter = read::operator::list::Filter {
            specialization: specialization.map(Into::into),
            verified_only: verified_only.unwrap_or_default(),
            available_only: available_only.unwrap_or_default(),
        };
        ctx.service()
            .execute(query::operators::List::by(
                read::operator::list::Selector {
                    arguments,
                    filter: filter.clone(),
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::operator::list::Connection::new(page, filter))
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// Only the `Booking` participants and admins see it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist or is not visible to the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let actor = ctx.current_actor().await?;

        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|b| b.involves(&actor))
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Booking`s the current `User` takes part in.
    ///
    /// Farmers see the `Booking`s they placed, owners see the `Booking`s of
    /// their `Equipment`, operators see the `Booking`s they are assigned to,
    /// and admins see every `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `OPERATOR_NOT_REGISTERED` - the current operator `User` has no
    ///                               `Operator` profile.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            equipment_id = ?equipment_id.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "bookings",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn bookings(
        first: Option<i32>,
        after: Option<api::booking::list::Cursor>,
        last: Option<i32>,
        before: Option<api::booking::list::Cursor>,
        status: Option<api::booking::Status>,
        equipment_id: Option<api::equipment::Id>,
        ctx: &Context,
    ) -> Result<api::booking::list::Connection, Error> {
        let arguments = read::booking::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let actor = ctx.current_actor().await?;
        let mut filter = read::booking::list::Filter {
            equipment_id: equipment_id.map(Into::into),
            status: status.map(Into::into),
            ..read::booking::list::Filter::default()
        };
        match actor.role {
            Role::Farmer => filter.farmer_id = Some(actor.user_id),
            Role::Owner => filter.owner_id = Some(actor.user_id),
            Role::Operator => {
                filter.operator_id = Some(
                    actor
                        .operator_id
                        .ok_or_else(|| OperatorError::NotRegistered.into())
                        .map_err(ctx.error())?,
                );
            }
            Role::Admin => {}
        }

        ctx.service()
            .execute(query::bookings::List::by(read::booking::list::Selector {
                arguments,
                filter,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::booking::list::Connection::new(page, filter))
    }

    /// Returns the `Negotiation` with the specified ID.
    ///
    /// Only the negotiating farmer, owner and admins see it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NEGOTIATION_NOT_EXISTS` - the `Negotiation` with the specified ID
    ///                              does not exist or is not visible to the
    ///                              current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "negotiation",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn negotiation(
        id: api::negotiation::Id,
        ctx: &Context,
    ) -> Result<api::Negotiation, Error> {
        let session = ctx.current_session().await?;
        let my_id: user::Id = session.user_id.into();

        ctx.service()
            .execute(query::negotiation::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|n| {
                session.role == Role::Admin
                    || n.farmer_id == my_id
                    || n.owner_id == my_id
            })
            .ok_or_else(|| NegotiationError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Negotiation`s the current `User` takes part in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `NOT_NEGOTIATION_PARTY` - the current `User` is an operator.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "negotiations",
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn negotiations(
        first: Option<i32>,
        after: Option<api::negotiation::list::Cursor>,
        last: Option<i32>,
        before: Option<api::negotiation::list::Cursor>,
        status: Option<api::negotiation::Status>,
        ctx: &Context,
    ) -> Result<api::negotiation::list::Connection, Error> {
        let arguments = read::negotiation::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let session = ctx.current_session().await?;
        let my_id: user::Id = session.user_id.into();
        let mut filter = read::negotiation::list::Filter {
            status: status.map(Into::into),
            ..read::negotiation::list::Filter::default()
        };
        match session.role {
            Role::Farmer => filter.farmer_id = Some(my_id),
            Role::Owner => filter.owner_id = Some(my_id),
            Role::Operator => {
                return Err(NegotiationError::NotParty.into())
                    .map_err(ctx.error());
            }
            Role::Admin => {}
        }

        ctx.service()
            .execute(query::negotiations::List::by(
                read::negotiation::list::Selector { arguments, filter },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::negotiation::list::Connection::new(page, filter))
    }

    /// Returns the `Wallet` of the current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myWallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_wallet(
        ctx: &Context,
    ) -> Result<api::wallet::Wallet, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::wallet::ByUserId(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of the current `User`'s `WalletTransaction`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "transactions",
            kind = ?kind,
            last = ?last,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn transactions(
        first: Option<i32>,
        after: Option<api::wallet::transaction::list::Cursor>,
        last: Option<i32>,
        before: Option<api::wallet::transaction::list::Cursor>,
        kind: Option<api::wallet::TransactionKind>,
        ctx: &Context,
    ) -> Result<api::wallet::transaction::list::Connection, Error> {
        let arguments = read::wallet::transaction::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            Self::DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;

        let my_id = ctx.current_session().await?.user_id;
        let filter = read::wallet::transaction::list::Filter {
            user_id: my_id.into(),
            kind: kind.map(Into::into),
        };
        ctx.service()
            .execute(query::transactions::List::by(
                read::wallet::transaction::list::Selector { arguments, filter },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| {
                api::wallet::transaction::list::Connection::new(page, filter)
            })
    }

    /// Calculates the price breakdown of a prospective `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist;
    /// - `OPERATOR_NOT_EXISTS` - the `Operator` with the specified ID does not
    ///                           exist;
    /// - `DELIVERY_ADDRESS_REQUIRED` - `DELIVERY` is requested without an
    ///                                 address;
    /// - `BOOKING_TOO_LONG` - the `duration` is longer than 366 days.
    #[tracing::instrument(
        skip_all,
        fields(
            delivery = ?delivery.kind,
            duration = ?duration,
            equipment_id = %equipment_id,
            gql.name = "quote",
            operator_id = ?operator_id.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn quote(
        equipment_id: api::equipment::Id,
        operator_id: Option<api::operator::Id>,
        duration: api::booking::DurationInput,
        delivery: api::booking::DeliveryInput,
        ctx: &Context,
    ) -> Result<api::booking::Quote, Error> {
        let delivery = domain::booking::Delivery::try_from(delivery)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::QuoteBooking {
                equipment_id: equipment_id.into(),
                operator_id: operator_id.map(Into::into),
                duration: duration.into(),
                delivery,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the current `PricingPolicy` of the marketplace.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pricingPolicy",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub fn pricing_policy(ctx: &Context) -> api::booking::PricingPolicy {
        ctx.service().config().pricing.into()
    }

    /// Calculates the `OverviewReport` of the `Booking`s the current `User`
    /// takes part in.
    ///
    /// Admins get the report of the whole marketplace.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `OPERATOR_NOT_REGISTERED` - the current operator `User` has no
    ///                               `Operator` profile.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "overviewReport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn overview_report(
        ctx: &Context,
    ) -> Result<api::report::Overview, Error> {
        use query::report::overview::Scope;

        let actor = ctx.current_actor().await?;
        let scope = match actor.role {
            Role::Farmer => Scope::Farmer(actor.user_id),
            Role::Owner => Scope::Owner(actor.user_id),
            Role::Operator => Scope::Operator(
                actor
                    .operator_id
                    .ok_or_else(|| OperatorError::NotRegistered.into())
                    .map_err(ctx.error())?,
            ),
            Role::Admin => Scope::Platform,
        };

        ctx.service()
            .execute(query::report::Overview { scope })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EquipmentError {
        #[code = "EQUIPMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Equipment` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum NegotiationError {
        #[code = "NEGOTIATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Negotiation` with the specified ID does not exist"]
        NotExists,

        #[code = "NOT_NEGOTIATION_PARTY"]
        #[status = FORBIDDEN]
        #[message = "Only farmers, owners and admins take part in \
                     `Negotiation`s"]
        NotParty,
    }
}

define_error! {
    enum OperatorError {
        #[code = "OPERATOR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Operator` with the specified ID does not exist"]
        NotExists,

        #[code = "OPERATOR_NOT_REGISTERED"]
        #[status = CONFLICT]
        #[message = "Authenticated `User` has no `Operator` profile"]
        NotRegistered,
    }
}

define_error! {
    enum TransactionError {
        #[code = "TRANSACTION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`WalletTransaction` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

impl AsError for query::quote_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::DurationTooLong(_) => {
                api::booking::DurationError::TooLong.into()
            }
            Self::EquipmentNotExists(_) => EquipmentError::NotExists.into(),
            Self::OperatorNotExists(_) => OperatorError::NotExists.into(),
            Self::Pricing(e) => return e.try_as_error(),
        })
    }
}

impl AsError for query::track_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_ONGOING"]
                #[status = CONFLICT]
                #[message = "Only ongoing `Booking`s can be tracked"]
                NotOngoing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) | Self::NotParticipant(_) => {
                BookingError::NotExists.into()
            }
            Self::NotOngoing(_) => Error::NotOngoing.into(),
        })
    }
}
