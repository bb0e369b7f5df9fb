//! GraphQL [`Subscription`]s definitions.

use common::DateTime;
use futures::{
    stream::{self, BoxStream},
    FutureExt as _, StreamExt as _,
};
use juniper::graphql_subscription;
use service::{domain::tracking, query, Query as _};

use crate::{api, context, define_error, AsError, Context, Error};

/// Root of all GraphQL subscription.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

impl Subscription {
    /// Name of the [`tracing::Span`] for the subscriptions.
    const SPAN_NAME: &'static str = "GraphQL subscription";
}

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Subscription waiting for the current authenticated session to expire.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - if the current session is not
    ///                              authenticated or session expired.
    pub async fn wait_session(
        &self,
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<bool, Error>>, Error> {
        let session = ctx.current_session().await?;
        let timeout = session.expires_at.saturating_since(DateTime::now());
        Ok(stream::once(
            tokio::time::sleep(timeout).map(|()| {
                Err(context::AuthError::AuthroizationRequired.into())
            }),
        )
        .boxed())
    }

    /// Tracks the delivery of the rented `Equipment` of an `ONGOING`
    /// `Booking`.
    ///
    /// Emits a `BookingPosition` every step and finishes once the
    /// destination is reached. Without a `speed` the positions are emitted
    /// in real time, otherwise the whole route is replayed from its start
    /// `speed` times faster.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRACKING_SPEED` - the `speed` is out of `[0.25; 8]`;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist or is not visible to the current `User`;
    /// - `BOOKING_NOT_ONGOING` - the `Booking` is not `ONGOING`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "trackBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
            speed = ?speed,
        ),
    )]
    pub async fn track_booking(
        &self,
        id: api::booking::Id,
        speed: Option<f64>,
        ctx: &Context,
    ) -> Result<
        BoxStream<'static, Result<api::booking::Position, Error>>,
        Error,
    > {
        let actor = ctx.current_actor().await?;
        let mode = match speed {
            None => tracking::Mode::Live,
            Some(speed) => tracking::Mode::Playback(
                tracking::Speed::new(speed)
                    .ok_or_else(|| TrackingError::InvalidSpeed.into())
                    .map_err(ctx.error())?,
            ),
        };
        let tracked = query::TrackBooking {
            booking_id: id.into(),
            actor,
            mode,
            origin: matches!(mode, tracking::Mode::Playback(_))
                .then(DateTime::now),
        };
        let service = ctx.service().clone();

        Ok(stream::unfold(Some(true), move |first| {
            let service = service.clone();
            async move {
                if !first? {
                    tokio::time::sleep(mode.step()).await;
                }
                let position = service
                    .execute(tracked)
                    .await
                    .map_err(AsError::into_error);
                let next = matches!(&position, Ok(p) if !p.arrived)
                    .then_some(false);
                Some((position.map(Into::into), next))
            }
        })
        .boxed())
    }
}

define_error! {
    enum TrackingError {
        #[code = "INVALID_TRACKING_SPEED"]
        #[status = BAD_REQUEST]
        #[message = "Tracking speed must be within [0.25; 8]"]
        InvalidSpeed,
    }
}
