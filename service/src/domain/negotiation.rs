//! [`Negotiation`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::{booking, define_id, define_text, equipment, user};

/// Farmer's request to rent for a lower price than quoted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Negotiation {
    /// ID of this [`Negotiation`].
    pub id: Id,

    /// ID of the [`Booking`] being negotiated.
    ///
    /// [`Booking`]: crate::domain::Booking
    pub booking_id: booking::Id,

    /// ID of the negotiated [`Equipment`].
    ///
    /// [`Equipment`]: crate::domain::Equipment
    pub equipment_id: equipment::Id,

    /// ID of the farmer proposing the price.
    pub farmer_id: user::Id,

    /// ID of the owner responding to the proposal.
    pub owner_id: user::Id,

    /// Quoted price the negotiation started from.
    pub original_price: Money,

    /// Price proposed by the farmer.
    pub proposed_price: Money,

    /// [`Message`] of the farmer, if any.
    pub message: Option<Message>,

    /// Current [`Status`] of this [`Negotiation`].
    pub status: Status,

    /// [`DateTime`] when this [`Negotiation`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Negotiation`] was last responded to.
    pub updated_at: ModificationDateTime,
}

impl Negotiation {
    /// Validates the `proposed` price against the `original` one.
    ///
    /// The proposal must be within `[floor; original]`.
    ///
    /// # Errors
    ///
    /// If the prices are in different currencies or out of the range.
    pub fn check_proposal(
        original: Money,
        proposed: Money,
        floor: Money,
    ) -> Result<(), PriceError> {
        if proposed.currency != original.currency
            || floor.currency != original.currency
        {
            return Err(PriceError::CurrencyMismatch);
        }
        if proposed.amount < floor.amount || proposed.amount > original.amount
        {
            return Err(PriceError::OutOfRange {
                min: floor,
                max: original,
            });
        }
        Ok(())
    }

    /// Returns the price countered by the owner, if any.
    #[must_use]
    pub fn counter_offer_price(&self) -> Option<Money> {
        match &self.status {
            Status::Countered { price, .. }
            | Status::FarmerAccepted { price, .. }
            | Status::FarmerRejected { price, .. } => Some(*price),
            Status::Pending
            | Status::Accepted { .. }
            | Status::Rejected { .. } => {
                None
            }
        }
    }

    /// Returns the price both sides agreed on, if they did.
    #[must_use]
    pub fn agreed_price(&self) -> Option<Money> {
        match &self.status {
            Status::Accepted { .. } => Some(self.proposed_price),
            Status::FarmerAccepted { price, .. } => Some(*price),
            Status::Pending
            | Status::Rejected { .. }
            | Status::Countered { .. }
            | Status::FarmerRejected { .. } => None,
        }
    }

    /// Responds to this [`Negotiation`] on behalf of the owner.
    ///
    /// # Errors
    ///
    /// If this [`Negotiation`] doesn't await the owner's response, or the
    /// countered price is not within `(proposed; original]`.
    pub fn respond_as_owner(
        &mut self,
        response: OwnerResponse,
        at: DateTime,
    ) -> Result<Outcome, ResponseError> {
        if self.status != Status::Pending {
            return Err(ResponseError::Unexpected {
                status: self.status.kind(),
                party: Party::Owner,
            });
        }

        let (status, outcome) = match response {
            OwnerResponse::Accept => (
                Status::Accepted { at: at.coerce() },
                Outcome::Agreed(self.proposed_price),
            ),
            OwnerResponse::Reject => {
                (Status::Rejected { at: at.coerce() }, Outcome::Declined)
            }
            OwnerResponse::Counter { price, message } => {
                if price.currency != self.original_price.currency {
                    return Err(PriceError::CurrencyMismatch.into());
                }
                if price.amount <= self.proposed_price.amount
                    || price.amount > self.original_price.amount
                {
                    return Err(PriceError::OutOfRange {
                        min: self.proposed_price,
                        max: self.original_price,
                    }
                    .into());
                }
                (
                    Status::Countered {
                        price,
                        message,
                        at: at.coerce(),
                    },
                    Outcome::Open,
                )
            }
        };

        self.status = status;
        self.updated_at = at.coerce();
        Ok(outcome)
    }

    /// Responds to the owner's counter offer on behalf of the farmer.
    ///
    /// # Errors
    ///
    /// If this [`Negotiation`] is not [`Status::Countered`].
    pub fn respond_as_farmer(
        &mut self,
        response: FarmerResponse,
        at: DateTime,
    ) -> Result<Outcome, ResponseError> {
        let Status::Countered { price, .. } = self.status else {
            return Err(ResponseError::Unexpected {
                status: self.status.kind(),
                party: Party::Farmer,
            });
        };

        let (status, outcome) = match response {
            FarmerResponse::Accept => (
                Status::FarmerAccepted {
                    price,
                    at: at.coerce(),
                },
                Outcome::Agreed(price),
            ),
            FarmerResponse::Reject => (
                Status::FarmerRejected {
                    price,
                    at: at.coerce(),
                },
                Outcome::Declined,
            ),
        };

        self.status = status;
        self.updated_at = at.coerce();
        Ok(outcome)
    }
}

define_id! {
    #[doc = "ID of a [`Negotiation`]."]
    Id
}

define_text! {
    #[doc = "Message attached to a [`Negotiation`] proposal or counter offer."]
    Message(max = 1024)
}

/// Status of a [`Negotiation`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Awaits the owner's response.
    Pending,

    /// Owner accepted the proposed price.
    Accepted {
        /// [`DateTime`] of the response.
        at: ResponseDateTime,
    },

    /// Owner rejected the proposal.
    Rejected {
        /// [`DateTime`] of the response.
        at: ResponseDateTime,
    },

    /// Owner countered with another price, awaiting the farmer's response.
    Countered {
        /// Countered price.
        price: Money,

        /// [`Message`] of the owner, if any.
        message: Option<Message>,

        /// [`DateTime`] of the response.
        at: ResponseDateTime,
    },

    /// Farmer accepted the counter offer.
    FarmerAccepted {
        /// Countered price.
        price: Money,

        /// [`DateTime`] of the response.
        at: ResponseDateTime,
    },

    /// Farmer rejected the counter offer.
    FarmerRejected {
        /// Countered price.
        price: Money,

        /// [`DateTime`] of the response.
        at: ResponseDateTime,
    },
}

impl Status {
    /// Returns [`StatusKind`] of this [`Status`].
    #[must_use]
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Pending => StatusKind::Pending,
            Self::Accepted { .. } => StatusKind::Accepted,
            Self::Rejected { .. } => StatusKind::Rejected,
            Self::Countered { .. } => StatusKind::Countered,
            Self::FarmerAccepted { .. } => StatusKind::FarmerAccepted,
            Self::FarmerRejected { .. } => StatusKind::FarmerRejected,
        }
    }

    /// Indicates whether the [`Negotiation`] still awaits somebody's
    /// response.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Countered { .. })
    }
}

define_kind! {
    #[doc = "Kind of a [`Negotiation`] [`Status`]."]
    enum StatusKind {
        #[doc = "[`Status::Pending`]."]
        Pending = 1,

        #[doc = "[`Status::Accepted`]."]
        Accepted = 2,

        #[doc = "[`Status::Rejected`]."]
        Rejected = 3,

        #[doc = "[`Status::Countered`]."]
        Countered = 4,

        #[doc = "[`Status::FarmerAccepted`]."]
        FarmerAccepted = 5,

        #[doc = "[`Status::FarmerRejected`]."]
        FarmerRejected = 6,
    }
}

define_kind! {
    #[doc = "Party of a [`Negotiation`]."]
    enum Party {
        #[doc = "Farmer proposing the price."]
        Farmer = 1,

        #[doc = "Owner responding to the proposal."]
        Owner = 2,
    }
}

/// Response of an owner to a [`Negotiation`].
#[derive(Clone, Debug)]
pub enum OwnerResponse {
    /// Accept the proposed price.
    Accept,

    /// Reject the proposal.
    Reject,

    /// Counter with another price.
    Counter {
        /// Countered price.
        price: Money,

        /// [`Message`] to the farmer, if any.
        message: Option<Message>,
    },
}

/// Response of a farmer to a counter offer.
#[derive(Clone, Copy, Debug)]
pub enum FarmerResponse {
    /// Accept the countered price.
    Accept,

    /// Reject the counter offer.
    Reject,
}

/// Outcome of a [`Negotiation`] response for the negotiated booking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Both sides agreed on the price.
    Agreed(Money),

    /// Negotiation failed, so the booking is called off.
    Declined,

    /// Negotiation continues.
    Open,
}

/// Error of a negotiated price.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum PriceError {
    /// Prices are in different currencies.
    #[display("Negotiated prices are in different currencies")]
    CurrencyMismatch,

    /// Price is out of the allowed range.
    #[display("Price must be within {min} and {max}")]
    OutOfRange {
        /// Lower bound of the range.
        min: Money,

        /// Upper bound of the range.
        max: Money,
    },
}

/// Error of responding to a [`Negotiation`].
#[derive(Clone, Copy, Debug, Display, Error, derive_more::From)]
pub enum ResponseError {
    /// [`Negotiation`] doesn't await a response from this [`Party`].
    #[from(ignore)]
    #[display("`{status}` negotiation doesn't await a response of {party}")]
    Unexpected {
        /// Current [`StatusKind`] of the [`Negotiation`].
        status: StatusKind,

        /// [`Party`] trying to respond.
        party: Party,
    },

    /// Countered price is invalid.
    #[display("Invalid counter offer: {_0}")]
    Price(PriceError),
}

/// [`DateTime`] when a [`Negotiation`] was created.
pub type CreationDateTime = DateTimeOf<(Negotiation, unit::Creation)>;

/// [`DateTime`] when a [`Negotiation`] was last responded to.
pub type ModificationDateTime = DateTimeOf<(Negotiation, unit::Modification)>;

/// [`DateTime`] of a [`Negotiation`] response.
pub type ResponseDateTime = DateTimeOf<(Negotiation, unit::Response)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::domain::{booking, equipment, user};

    use super::{
        FarmerResponse, Id, Negotiation, OwnerResponse, Outcome, PriceError,
        ResponseError, Status, StatusKind,
    };

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn negotiation(original: &str, proposed: &str) -> Negotiation {
        let now = DateTime::now();
        Negotiation {
            id: Id::new(),
            booking_id: booking::Id::new(),
            equipment_id: equipment::Id::new(),
            farmer_id: user::Id::new(),
            owner_id: user::Id::new(),
            original_price: money(original),
            proposed_price: money(proposed),
            message: None,
            status: Status::Pending,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    fn counter(price: &str) -> OwnerResponse {
        OwnerResponse::Counter {
            price: money(price),
            message: None,
        }
    }

    #[test]
    fn proposal_stays_within_floor_and_quote() {
        let check = |p: &str| {
            Negotiation::check_proposal(
                money("1550INR"),
                money(p),
                money("1085INR"),
            )
        };

        assert!(check("1085INR").is_ok());
        assert!(check("1300INR").is_ok());
        assert!(check("1550INR").is_ok());

        assert!(matches!(
            check("1084.99INR"),
            Err(PriceError::OutOfRange { .. }),
        ));
        assert!(matches!(check("1551INR"), Err(PriceError::OutOfRange { .. })));
        assert!(matches!(check("1300USD"), Err(PriceError::CurrencyMismatch)));
    }

    #[test]
    fn owner_accepts_proposed_price() {
        let mut n = negotiation("9140INR", "8000INR");

        let outcome =
            n.respond_as_owner(OwnerResponse::Accept, DateTime::now()).unwrap();

        assert_eq!(outcome, Outcome::Agreed(money("8000INR")));
        assert_eq!(n.status.kind(), StatusKind::Accepted);
        assert_eq!(n.agreed_price(), Some(money("8000INR")));
    }

    #[test]
    fn counter_offer_is_bounded() {
        let mut n = negotiation("9140INR", "8000INR");

        for invalid in ["8000INR", "7999INR", "9140.01INR"] {
            assert!(matches!(
                n.respond_as_owner(counter(invalid), DateTime::now()),
                Err(ResponseError::Price(PriceError::OutOfRange { .. })),
            ));
        }
        assert_eq!(n.status, Status::Pending);

        let outcome =
            n.respond_as_owner(counter("8600INR"), DateTime::now()).unwrap();
        assert_eq!(outcome, Outcome::Open);
        assert_eq!(n.counter_offer_price(), Some(money("8600INR")));
    }

    #[test]
    fn farmer_settles_counter_offer() {
        let mut accepted = negotiation("9140INR", "8000INR");
        _ = accepted.respond_as_owner(counter("8600INR"), DateTime::now());
        assert_eq!(
            accepted
                .respond_as_farmer(FarmerResponse::Accept, DateTime::now())
                .unwrap(),
            Outcome::Agreed(money("8600INR")),
        );
        assert_eq!(accepted.status.kind(), StatusKind::FarmerAccepted);

        let mut rejected = negotiation("9140INR", "8000INR");
        _ = rejected.respond_as_owner(counter("8600INR"), DateTime::now());
        assert_eq!(
            rejected
                .respond_as_farmer(FarmerResponse::Reject, DateTime::now())
                .unwrap(),
            Outcome::Declined,
        );
        assert_eq!(rejected.counter_offer_price(), Some(money("8600INR")));
        assert_eq!(rejected.agreed_price(), None);
    }

    #[test]
    fn rejects_out_of_order_responses() {
        let now = DateTime::now();

        let mut pending = negotiation("9140INR", "8000INR");
        assert!(pending
            .respond_as_farmer(FarmerResponse::Accept, now)
            .is_err());

        let mut rejected = negotiation("9140INR", "8000INR");
        _ = rejected.respond_as_owner(OwnerResponse::Reject, now).unwrap();
        assert!(rejected.respond_as_owner(OwnerResponse::Accept, now).is_err());
        assert!(rejected
            .respond_as_farmer(FarmerResponse::Accept, now)
            .is_err());

        let mut farmer_rejected = negotiation("9140INR", "8000INR");
        _ = farmer_rejected.respond_as_owner(counter("8600INR"), now).unwrap();
        _ = farmer_rejected
            .respond_as_farmer(FarmerResponse::Reject, now)
            .unwrap();
        for response in [
            OwnerResponse::Accept,
            OwnerResponse::Reject,
            counter("8700INR"),
        ] {
            assert!(matches!(
                farmer_rejected.respond_as_owner(response, now),
                Err(ResponseError::Unexpected { .. }),
            ));
        }
        assert!(farmer_rejected
            .respond_as_farmer(FarmerResponse::Accept, now)
            .is_err());
        assert_eq!(farmer_rejected.status.kind(), StatusKind::FarmerRejected);

        let mut countered = negotiation("9140INR", "8000INR");
        _ = countered.respond_as_owner(counter("8600INR"), now).unwrap();
        assert!(countered
            .respond_as_owner(OwnerResponse::Accept, now)
            .is_err());
    }
}
