//! [`Command`] for responding to a [`Negotiation`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{booking, negotiation, user, Booking, Negotiation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for responding to a [`Negotiation`] by one of its parties.
///
/// Settling the [`Negotiation`] affects its [`Booking`]: an agreed price
/// becomes the [`Booking::total_price`], while a declined [`Negotiation`]
/// cancels the [`Booking`].
#[derive(Clone, Debug)]
pub struct RespondToNegotiation {
    /// ID of the [`Negotiation`] to respond to.
    pub negotiation_id: negotiation::Id,

    /// ID of the responding [`User`].
    pub by: user::Id,

    /// [`Response`] itself.
    pub response: Response,
}

/// Response to a [`Negotiation`].
#[derive(Clone, Debug, From)]
pub enum Response {
    /// Owner's response to the farmer's proposal.
    Owner(negotiation::OwnerResponse),

    /// Farmer's response to the owner's counter offer.
    Farmer(negotiation::FarmerResponse),
}

/// Output of [`RespondToNegotiation`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Responded [`Negotiation`].
    pub negotiation: Negotiation,

    /// [`Booking`] being negotiated.
    pub booking: Booking,
}

impl<Db> Command<RespondToNegotiation> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Negotiation>, negotiation::Id>>,
            Ok = Option<Negotiation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Negotiation>, Err = Traced<database::Error>>
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RespondToNegotiation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RespondToNegotiation {
            negotiation_id,
            by,
            response,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut negotiation = tx
            .execute(Select(By::<Option<Negotiation>, _>::new(
                negotiation_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::NegotiationNotExists(negotiation_id))
            })?;

        let party = match &response {
            Response::Owner(_) => negotiation.owner_id,
            Response::Farmer(_) => negotiation.farmer_id,
        };
        if party != by {
            return Err(tracerr::new!(E::NotParty(by)));
        }

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(
                negotiation.booking_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                tracerr::new!(E::BookingNotExists(negotiation.booking_id))
            })?;
        if booking.status != booking::Status::Pending {
            return Err(tracerr::new!(E::BookingNotPending(
                booking.status.kind()
            )));
        }

        let now = DateTime::now();
        let outcome = match response {
            Response::Owner(r) => negotiation.respond_as_owner(r, now),
            Response::Farmer(r) => negotiation.respond_as_farmer(r, now),
        }
        .map_err(tracerr::from_and_wrap!(=> E))?;

        match outcome {
            negotiation::Outcome::Agreed(price) => booking.total_price = price,
            negotiation::Outcome::Declined => booking
                .apply(booking::Transition::Cancel, by, now)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            negotiation::Outcome::Open => {}
        }

        tx.execute(Update(negotiation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Negotiation(id: {negotiation_id})` is `{}` now",
            negotiation.status.kind(),
        );

        Ok(Output {
            negotiation,
            booking,
        })
    }
}

/// Error of [`RespondToNegotiation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Negotiation`] with the provided ID doesn't exist.
    #[display("`Negotiation(id: {_0})` does not exist")]
    #[from(ignore)]
    NegotiationNotExists(#[error(not(source))] negotiation::Id),

    /// [`Booking`] of the [`Negotiation`] doesn't exist.
    #[display("`Booking(id: {_0})` does not exist")]
    #[from(ignore)]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`User`] is not the responding party of the [`Negotiation`].
    #[display("`User(id: {_0})` cannot respond to the negotiation")]
    #[from(ignore)]
    NotParty(#[error(not(source))] user::Id),

    /// [`Booking`] is not [`booking::Status::Pending`] anymore.
    #[display("Cannot negotiate a `{_0}` booking")]
    #[from(ignore)]
    BookingNotPending(#[error(not(source))] booking::StatusKind),

    /// [`Negotiation`] doesn't accept the response.
    #[display("{_0}")]
    #[from]
    Response(negotiation::ResponseError),

    /// [`Booking`] cannot be cancelled.
    #[display("{_0}")]
    #[from]
    Transition(booking::TransitionError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::Money;

    use crate::{
        command::{
            create_booking::{self, Proposal},
            fixture, update_booking_status,
        },
        domain::{
            booking::{StatusKind, Transition},
            negotiation::{
                FarmerResponse, OwnerResponse, PriceError, ResponseError,
                StatusKind as NegotiationStatus,
            },
            user::{Role, User},
        },
        infra::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError, RespondToNegotiation, Response};

    struct Parties {
        owner: User,
        farmer: User,
        placed: create_booking::Output,
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    /// Places a 1700INR booking with the farmer proposing 1300INR.
    async fn negotiate(svc: &Service<Memory>) -> Parties {
        let owner = fixture::user(svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(svc, owner.id).await;

        let mut cmd = fixture::create_booking(farmer.id, equipment.id);
        cmd.proposal = Some(Proposal {
            price: money("1300INR"),
            message: None,
        });
        let placed = svc.execute(cmd).await.unwrap();

        Parties {
            owner,
            farmer,
            placed,
        }
    }

    fn respond(
        parties: &Parties,
        by: &User,
        response: impl Into<Response>,
    ) -> RespondToNegotiation {
        RespondToNegotiation {
            negotiation_id: parties.placed.negotiation.as_ref().unwrap().id,
            by: by.id,
            response: response.into(),
        }
    }

    #[tokio::test]
    async fn accepted_proposal_sets_booking_price() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        let out = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Accept))
            .await
            .unwrap();

        assert_eq!(out.negotiation.status.kind(), NegotiationStatus::Accepted);
        assert_eq!(out.booking.total_price, money("1300INR"));
        assert_eq!(out.booking.status.kind(), StatusKind::Pending);
    }

    #[tokio::test]
    async fn accepted_counter_offer_sets_booking_price() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        _ = svc
            .execute(respond(
                &p,
                &p.owner,
                OwnerResponse::Counter {
                    price: money("1500INR"),
                    message: None,
                },
            ))
            .await
            .unwrap();
        let out = svc
            .execute(respond(&p, &p.farmer, FarmerResponse::Accept))
            .await
            .unwrap();

        assert_eq!(
            out.negotiation.status.kind(),
            NegotiationStatus::FarmerAccepted,
        );
        assert_eq!(out.booking.total_price, money("1500INR"));
    }

    #[tokio::test]
    async fn rejection_cancels_booking() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        let out = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Reject))
            .await
            .unwrap();

        assert_eq!(out.booking.status.kind(), StatusKind::Cancelled);
        assert_eq!(out.booking.total_price, p.placed.booking.total_price);
    }

    #[tokio::test]
    async fn rejects_out_of_band_counter_offer() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        for price in ["1300INR", "1701INR"] {
            let err = svc
                .execute(respond(
                    &p,
                    &p.owner,
                    OwnerResponse::Counter {
                        price: money(price),
                        message: None,
                    },
                ))
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err.as_ref(),
                    ExecutionError::Response(ResponseError::Price(
                        PriceError::OutOfRange { .. }
                    )),
                ),
                "{price} must be rejected",
            );
        }
    }

    #[tokio::test]
    async fn rejects_responses_out_of_turn() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        let err = svc
            .execute(respond(&p, &p.farmer, FarmerResponse::Accept))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Response(ResponseError::Unexpected { .. }),
        ));

        let err = svc
            .execute(respond(&p, &p.farmer, OwnerResponse::Accept))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotParty(_)));

        _ = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Accept))
            .await
            .unwrap();
        let err = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Reject))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Response(ResponseError::Unexpected { .. }),
        ));
    }

    #[tokio::test]
    async fn open_negotiation_blocks_confirmation() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;
        let booking_id = p.placed.booking.id;

        let err = svc
            .execute(fixture::transition(
                booking_id,
                &p.owner,
                Transition::Confirm,
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            update_booking_status::ExecutionError::NegotiationOpen(_),
        ));

        _ = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Accept))
            .await
            .unwrap();
        let booking = svc
            .execute(fixture::transition(
                booking_id,
                &p.owner,
                Transition::Confirm,
            ))
            .await
            .unwrap();
        assert_eq!(booking.status.kind(), StatusKind::Confirmed);
    }

    #[tokio::test]
    async fn cannot_negotiate_after_booking_is_cancelled() {
        let svc = fixture::service();
        let p = negotiate(&svc).await;

        _ = svc
            .execute(fixture::transition(
                p.placed.booking.id,
                &p.farmer,
                Transition::Cancel,
            ))
            .await
            .unwrap();
        let err = svc
            .execute(respond(&p, &p.owner, OwnerResponse::Accept))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::BookingNotPending(StatusKind::Cancelled),
        ));
    }
}
