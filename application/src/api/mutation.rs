//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money};
use juniper::graphql_object;
use service::{
    command,
    domain::{self, user::Role},
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `User` with the provided credentials and contact info.
    ///
    /// Only admins may create other admins.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another `User`;
    /// - `NO_CONTACT_INFO` - either `UserEmail` or `UserPhone` must be
    ///                       provided;
    /// - `NOT_ADMIN` - an `ADMIN` is requested by a non-admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = ?email,
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        role: api::user::Role,
        email: Option<api::user::Email>,
        phone: Option<api::user::Phone>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let role: Role = role.into();
        if role == Role::Admin {
            drop(api::session_of(Role::Admin, ctx).await?);
        }

        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                role,
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output)).await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output)).await;

        Ok(output.into())
    }

    /// Lists a new `Equipment` of the current owner for rent.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the current `User` is not an equipment owner;
    /// - `INVALID_RATES` - the rates are not positive or mix currencies;
    /// - `INVALID_TRANSPORT_CHARGE` - the transport charge is negative;
    /// - `INVALID_COORDINATES` - the coordinates are out of range;
    /// - `WRONG_CURRENCY` - the prices are not in the marketplace currency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createEquipment",
            kind = ?kind,
            name = %name,
            otel.name = Self::SPAN_NAME,
            rates = ?rates,
            transport_charge = %transport_charge,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_equipment(
        name: api::equipment::Name,
        kind: api::equipment::Kind,
        description: Option<api::equipment::Description>,
        rates: api::equipment::RatesInput,
        transport_charge: Money,
        location: api::equipment::LocationInput,
        features: Option<Vec<api::equipment::Feature>>,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        let session = api::session_of(Role::Owner, ctx).await?;

        let rates = domain::equipment::Rates::try_from(rates)
            .map_err(Error::from)
            .map_err(ctx.error())?;
        let transport_charge =
            domain::equipment::TransportCharge::new(transport_charge)
                .ok_or_else(|| {
                    api::equipment::InputError::InvalidTransportCharge.into()
                })
                .map_err(ctx.error())?;
        let location = domain::equipment::Location::try_from(location)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateEquipment {
                owner_id: session.user_id.into(),
                name: name.into(),
                kind: kind.into(),
                description: description.map(Into::into),
                rates,
                transport_charge,
                location,
                features: features
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Switches the `EquipmentStatus` of the current owner's `Equipment`.
    ///
    /// Only `AVAILABLE` and `MAINTENANCE` can be switched between manually.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist;
    /// - `NOT_EQUIPMENT_OWNER` - the current `User` doesn't own the
    ///                           `Equipment`;
    /// - `INVALID_EQUIPMENT_TRANSITION` - the `EquipmentStatus` cannot be
    ///                                    switched.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateEquipmentStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_equipment_status(
        id: api::equipment::Id,
        status: api::equipment::Status,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::UpdateEquipmentStatus {
                equipment_id: id.into(),
                by: my_id.into(),
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers the `Operator` profile of the current operator `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OPERATOR` - the current `User` is not an operator;
    /// - `OPERATOR_REGISTERED` - the current `User` already has an `Operator`
    ///                           profile;
    /// - `INVALID_HOURLY_RATE` - the hourly rate is not a positive amount of
    ///                           the marketplace currency;
    /// - `INVALID_EXPERIENCE` - the years of experience are out of range.
    #[tracing::instrument(
        skip_all,
        fields(
            experience_years = experience_years,
            gql.name = "registerOperator",
            hourly_rate = %hourly_rate,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn register_operator(
        specializations: Vec<api::operator::Specialization>,
        hourly_rate: Money,
        experience_years: i32,
        ctx: &Context,
    ) -> Result<api::Operator, Error> {
        let session = api::session_of(Role::Operator, ctx).await?;

        let experience_years = u8::try_from(experience_years)
            .map_err(|_| InputError::InvalidExperience.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::RegisterOperator {
                user_id: session.user_id.into(),
                specializations: specializations
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                hourly_rate,
                experience_years,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `Operator` as verified or not.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_ADMIN` - the current `User` is not an admin;
    /// - `OPERATOR_NOT_EXISTS` - the `Operator` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "verifyOperator",
            id = %id,
            otel.name = Self::SPAN_NAME,
            verified = verified,
        ),
    )]
    pub async fn verify_operator(
        id: api::operator::Id,
        verified: bool,
        ctx: &Context,
    ) -> Result<api::Operator, Error> {
        let session = api::session_of(Role::Admin, ctx).await?;

        ctx.service()
            .execute(command::UpdateOperator {
                operator_id: id.into(),
                by: command::update_operator::Editor {
                    user_id: session.user_id.into(),
                    role: session.role,
                },
                change: command::update_operator::Change::Verification(
                    verified,
                ),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Toggles whether the current `Operator` can be booked.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OPERATOR` - the current `User` is not an operator;
    /// - `OPERATOR_NOT_REGISTERED` - the current `User` has no `Operator`
    ///                               profile.
    #[tracing::instrument(
        skip_all,
        fields(
            available = available,
            gql.name = "setOperatorAvailability",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_operator_availability(
        available: bool,
        ctx: &Context,
    ) -> Result<api::Operator, Error> {
        drop(api::session_of(Role::Operator, ctx).await?);
        let actor = ctx.current_actor().await?;
        let operator_id = actor
            .operator_id
            .ok_or_else(|| api::query::OperatorError::NotRegistered.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateOperator {
                operator_id,
                by: command::update_operator::Editor {
                    user_id: actor.user_id,
                    role: actor.role,
                },
                change: command::update_operator::Change::Availability(
                    available,
                ),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Books an `Equipment` on behalf of the current farmer.
    ///
    /// Providing a `proposedPrice` opens a `Negotiation` the owner has to
    /// settle before confirming the `Booking`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FARMER` - the current `User` is not a farmer;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist;
    /// - `OWN_EQUIPMENT` - the farmer owns the `Equipment`;
    /// - `EQUIPMENT_UNAVAILABLE` - the `Equipment` is not `AVAILABLE`;
    /// - `OPERATOR_NOT_EXISTS` - the `Operator` with the specified ID does not
    ///                           exist;
    /// - `OPERATOR_UNAVAILABLE` - the `Operator` is not verified or not
    ///                            available;
    /// - `DELIVERY_ADDRESS_REQUIRED` - `DELIVERY` is requested without an
    ///                                 address;
    /// - `BOOKING_TOO_LONG` - the `duration` is longer than 366 days;
    /// - `PRICE_OUT_OF_RANGE` - the proposed price is out of the negotiable
    ///                          range.
    #[tracing::instrument(
        skip_all,
        fields(
            delivery = ?delivery.kind,
            duration = ?duration,
            equipment_id = %equipment_id,
            gql.name = "createBooking",
            operator_id = ?operator_id.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            proposed_price = ?proposed_price.as_ref().map(ToString::to_string),
            starts_at = %starts_at.to_rfc3339(),
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_booking(
        equipment_id: api::equipment::Id,
        operator_id: Option<api::operator::Id>,
        starts_at: DateTime,
        duration: api::booking::DurationInput,
        delivery: api::booking::DeliveryInput,
        proposed_price: Option<Money>,
        message: Option<api::negotiation::Message>,
        ctx: &Context,
    ) -> Result<api::booking::CreateResult, Error> {
        let session = api::session_of(Role::Farmer, ctx).await?;

        let delivery = domain::booking::Delivery::try_from(delivery)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateBooking {
                farmer_id: session.user_id.into(),
                equipment_id: equipment_id.into(),
                operator_id: operator_id.map(Into::into),
                schedule: domain::booking::Schedule {
                    starts_at: starts_at.coerce(),
                    duration: duration.into(),
                },
                delivery,
                proposal: proposed_price.map(|price| {
                    command::create_booking::Proposal {
                        price,
                        message: message.map(Into::into),
                    }
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `Booking` along its lifecycle.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist or is not visible to the current `User`;
    /// - `TRANSITION_FORBIDDEN` - the current `User` is not allowed to perform
    ///                            the `BookingTransition`;
    /// - `NEGOTIATION_OPEN` - the `Booking` has an unsettled `Negotiation`;
    /// - `INVALID_BOOKING_TRANSITION` - the `BookingTransition` is not allowed
    ///                                  from the current `BookingStatus`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateBookingStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            transition = ?transition,
        ),
    )]
    pub async fn update_booking_status(
        id: api::booking::Id,
        transition: api::booking::Transition,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let actor = ctx.current_actor().await?;

        ctx.service()
            .execute(command::UpdateBookingStatus {
                booking_id: id.into(),
                actor,
                transition: transition.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Responds to a `Negotiation` as the owner of the negotiated
    /// `Equipment`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_OWNER` - the current `User` is not an equipment owner;
    /// - `NEGOTIATION_NOT_EXISTS` - the `Negotiation` with the specified ID
    ///                              does not exist or is not visible to the
    ///                              current `User`;
    /// - `COUNTER_PRICE_REQUIRED` - `COUNTER` is decided without a price;
    /// - `UNEXPECTED_RESPONSE` - the `Negotiation` doesn't await the owner;
    /// - `PRICE_OUT_OF_RANGE` - the countered price is out of range;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is not `PENDING` anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            counter_price = ?counter_price.as_ref().map(ToString::to_string),
            decision = ?decision,
            gql.name = "respondToNegotiationAsOwner",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn respond_to_negotiation_as_owner(
        id: api::negotiation::Id,
        decision: api::negotiation::OwnerDecision,
        counter_price: Option<Money>,
        message: Option<api::negotiation::Message>,
        ctx: &Context,
    ) -> Result<api::negotiation::RespondResult, Error> {
        use api::negotiation::OwnerDecision as D;
        use domain::negotiation::OwnerResponse as R;

        let session = api::session_of(Role::Owner, ctx).await?;

        let response = match decision {
            D::Accept => R::Accept,
            D::Reject => R::Reject,
            D::Counter => R::Counter {
                price: counter_price
                    .ok_or_else(|| InputError::CounterPriceRequired.into())
                    .map_err(ctx.error())?,
                message: message.map(Into::into),
            },
        };

        ctx.service()
            .execute(command::RespondToNegotiation {
                negotiation_id: id.into(),
                by: session.user_id.into(),
                response: command::respond_to_negotiation::Response::Owner(
                    response,
                ),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Responds to a counter offer as the farmer who opened the
    /// `Negotiation`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FARMER` - the current `User` is not a farmer;
    /// - `NEGOTIATION_NOT_EXISTS` - the `Negotiation` with the specified ID
    ///                              does not exist or is not visible to the
    ///                              current `User`;
    /// - `UNEXPECTED_RESPONSE` - the `Negotiation` is not `COUNTERED`;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is not `PENDING` anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            decision = ?decision,
            gql.name = "respondToNegotiationAsFarmer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn respond_to_negotiation_as_farmer(
        id: api::negotiation::Id,
        decision: api::negotiation::FarmerDecision,
        ctx: &Context,
    ) -> Result<api::negotiation::RespondResult, Error> {
        let session = api::session_of(Role::Farmer, ctx).await?;

        ctx.service()
            .execute(command::RespondToNegotiation {
                negotiation_id: id.into(),
                by: session.user_id.into(),
                response: command::respond_to_negotiation::Response::Farmer(
                    decision.into(),
                ),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds money to the current `User`'s `Wallet`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NON_POSITIVE_AMOUNT` - the amount is not positive;
    /// - `WALLET_CURRENCY_MISMATCH` - the amount is not in the `Wallet`
    ///                                currency.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "topUpWallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn top_up_wallet(
        amount: Money,
        ctx: &Context,
    ) -> Result<api::wallet::Wallet, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::TopUpWallet {
                user_id: my_id.into(),
                amount,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Pays for the `Booking` from the current farmer's `Wallet`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FARMER` - the current `User` is not a farmer;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist or is not visible to the current `User`;
    /// - `BOOKING_NOT_PAYABLE` - the `Booking` is already paid or is not
    ///                           confirmed yet;
    /// - `INSUFFICIENT_FUNDS` - the `Wallet` balance doesn't cover the
    ///                          `Booking` total.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "payForBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pay_for_booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let session = api::session_of(Role::Farmer, ctx).await?;

        ctx.service()
            .execute(command::PayForBooking {
                booking_id: id.into(),
                farmer_id: session.user_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum InputError {
        #[code = "COUNTER_PRICE_REQUIRED"]
        #[status = BAD_REQUEST]
        #[message = "`counterPrice` must be provided for `COUNTER`"]
        CounterPriceRequired,

        #[code = "INVALID_EXPERIENCE"]
        #[status = BAD_REQUEST]
        #[message = "Years of experience must be within [0; 255]"]
        InvalidExperience,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserLogin` is occupied by another `User`"]
                LoginOccupied,

                #[code = "NO_CONTACT_INFO"]
                #[status = BAD_REQUEST]
                #[message = "Either `UserEmail` or `UserPhone` must be \
                             provided"]
                NoContactInfo,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LoginOccupied(_) => Some(Error::LoginOccupied.into()),
            Self::NoContactInfo => Some(Error::NoContactInfo.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::create_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CURRENCY"]
                #[status = BAD_REQUEST]
                #[message = "Prices must be in the marketplace currency"]
                WrongCurrency,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotOwner(_) => api::PrivilegeError::Owner.into(),
            Self::UserNotExists(_) => return None,
            Self::WrongCurrency => Error::WrongCurrency.into(),
        })
    }
}

impl AsError for command::update_equipment_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_EQUIPMENT_OWNER"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` doesn't own the `Equipment`"]
                NotOwner,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::query::EquipmentError::NotExists.into()
            }
            Self::NotOwner(_) => Error::NotOwner.into(),
            Self::Transition(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::register_operator::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OPERATOR_REGISTERED"]
                #[status = CONFLICT]
                #[message = "Authenticated `User` already has an `Operator` \
                             profile"]
                AlreadyRegistered,

                #[code = "INVALID_HOURLY_RATE"]
                #[status = BAD_REQUEST]
                #[message = "Hourly rate must be a positive amount of the \
                             marketplace currency"]
                InvalidRate,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyRegistered(_) => Error::AlreadyRegistered.into(),
            Self::InvalidRate(_) => Error::InvalidRate.into(),
            Self::NotOperator(_) => api::PrivilegeError::Operator.into(),
            Self::UserNotExists(_) => return None,
        })
    }
}

impl AsError for command::update_operator::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OPERATOR_UPDATE_FORBIDDEN"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` is not allowed to update the \
                             `Operator`"]
                Forbidden,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Forbidden(_) => Error::Forbidden.into(),
            Self::OperatorNotExists(_) => {
                api::query::OperatorError::NotExists.into()
            }
        })
    }
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "OWN_EQUIPMENT"]
                #[status = CONFLICT]
                #[message = "`Equipment` cannot be booked by its owner"]
                OwnEquipment,

                #[code = "EQUIPMENT_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Equipment` is not available for booking"]
                EquipmentUnavailable,

                #[code = "OPERATOR_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Operator` is not verified or not available"]
                OperatorUnavailable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::query::EquipmentError::NotExists.into()
            }
            Self::EquipmentUnavailable(_) => Error::EquipmentUnavailable.into(),
            Self::NotFarmer(_) => api::PrivilegeError::Farmer.into(),
            Self::OperatorNotExists(_) => {
                api::query::OperatorError::NotExists.into()
            }
            Self::OperatorUnavailable(_) => Error::OperatorUnavailable.into(),
            Self::OwnEquipment(_) => Error::OwnEquipment.into(),
            Self::Pricing(e) => return e.try_as_error(),
            Self::UserNotExists(_) => return None,
            Self::Proposal(e) => return e.try_as_error(),
            Self::ScheduleTooLong(_) => {
                api::booking::DurationError::TooLong.into()
            }
        })
    }
}

impl AsError for command::update_booking_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "TRANSITION_FORBIDDEN"]
                #[status = FORBIDDEN]
                #[message = "Authenticated `User` is not allowed to perform \
                             the `BookingTransition`"]
                Forbidden,

                #[code = "NEGOTIATION_OPEN"]
                #[status = CONFLICT]
                #[message = "`Booking` has an unsettled `Negotiation`"]
                NegotiationOpen,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => {
                api::query::BookingError::NotExists.into()
            }
            Self::Equipment(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => return None,
            Self::Forbidden(_) => Error::Forbidden.into(),
            Self::NegotiationOpen(_) => Error::NegotiationOpen.into(),
            Self::Transition(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::respond_to_negotiation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_PENDING"]
                #[status = CONFLICT]
                #[message = "Only `PENDING` `Booking`s can be negotiated"]
                BookingNotPending,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => return None,
            Self::BookingNotPending(_) => Error::BookingNotPending.into(),
            Self::NegotiationNotExists(_) | Self::NotParty(_) => {
                api::query::NegotiationError::NotExists.into()
            }
            Self::Response(e) => return e.try_as_error(),
            Self::Transition(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::top_up_wallet::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Balance(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::pay_for_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_PAYABLE"]
                #[status = CONFLICT]
                #[message = "`Booking` is already paid or not confirmed yet"]
                NotPayable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Balance(e) => return e.try_as_error(),
            Self::BookingNotExists(_) | Self::NotFarmer(_) => {
                api::query::BookingError::NotExists.into()
            }
            Self::NotPayable(_) => Error::NotPayable.into(),
        })
    }
}

impl AsError for domain::booking::TransitionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Kind {
                #[code = "INVALID_BOOKING_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`BookingTransition` is not allowed"]
                Invalid,
            }
        }

        Some(Error {
            message: self.to_string(),
            ..Kind::Invalid.into()
        })
    }
}

impl AsError for domain::equipment::TransitionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Kind {
                #[code = "INVALID_EQUIPMENT_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`EquipmentStatus` cannot be switched"]
                Invalid,
            }
        }

        Some(Error {
            message: self.to_string(),
            ..Kind::Invalid.into()
        })
    }
}

impl AsError for domain::negotiation::PriceError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Kind {
                #[code = "PRICE_CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Negotiated prices are in different currencies"]
                CurrencyMismatch,

                #[code = "PRICE_OUT_OF_RANGE"]
                #[status = BAD_REQUEST]
                #[message = "Price is out of the negotiable range"]
                OutOfRange,
            }
        }

        Some(match self {
            Self::CurrencyMismatch => Kind::CurrencyMismatch.into(),
            Self::OutOfRange { .. } => Error {
                message: self.to_string(),
                ..Kind::OutOfRange.into()
            },
        })
    }
}

impl AsError for domain::negotiation::ResponseError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Kind {
                #[code = "UNEXPECTED_RESPONSE"]
                #[status = CONFLICT]
                #[message = "`Negotiation` doesn't await this response"]
                Unexpected,
            }
        }

        match self {
            Self::Unexpected { .. } => Some(Error {
                message: self.to_string(),
                ..Kind::Unexpected.into()
            }),
            Self::Price(e) => e.try_as_error(),
        }
    }
}

impl AsError for domain::wallet::BalanceError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Kind {
                #[code = "NON_POSITIVE_AMOUNT"]
                #[status = BAD_REQUEST]
                #[message = "Amount must be positive"]
                NonPositiveAmount,

                #[code = "WALLET_CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Amount is not in the `Wallet` currency"]
                CurrencyMismatch,

                #[code = "INSUFFICIENT_FUNDS"]
                #[status = CONFLICT]
                #[message = "`Wallet` balance is insufficient"]
                InsufficientFunds,
            }
        }

        let kind = match self {
            Self::NonPositiveAmount(_) => Kind::NonPositiveAmount,
            Self::CurrencyMismatch(_) => Kind::CurrencyMismatch,
            Self::InsufficientFunds { .. } => Kind::InsufficientFunds,
        };
        Some(Error {
            message: self.to_string(),
            ..kind.into()
        })
    }
}
