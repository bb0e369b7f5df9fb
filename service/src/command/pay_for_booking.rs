//! [`Command`] for paying for a [`Booking`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{booking, user, wallet, Booking, Wallet},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for paying for a [`Booking`] from the farmer's [`Wallet`].
///
/// The [`Booking::total_price`] is debited from the farmer's [`Wallet`] and
/// credited to the owner's one.
#[derive(Clone, Copy, Debug)]
pub struct PayForBooking {
    /// ID of the [`Booking`] to pay for.
    pub booking_id: booking::Id,

    /// ID of the paying farmer [`User`].
    pub farmer_id: user::Id,
}

impl<Db> Command<PayForBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Wallet>, user::Id>>,
            Ok = Option<Wallet>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Update<Wallet>, Err = Traced<database::Error>>
        + Database<Insert<wallet::Transaction>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: PayForBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayForBooking {
            booking_id,
            farmer_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::BookingNotExists(booking_id)))?;
        if booking.farmer_id != farmer_id {
            return Err(tracerr::new!(E::NotFarmer(farmer_id)));
        }
        if !booking.is_payable() {
            return Err(tracerr::new!(E::NotPayable(booking.status.kind())));
        }

        let now = DateTime::now();
        let amount = booking.total_price;

        let mut farmer = tx
            .execute(Select(By::<Option<Wallet>, _>::new(farmer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Wallet::empty(farmer_id));
        farmer
            .debit(amount, now.coerce())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let mut owner = tx
            .execute(Select(By::<Option<Wallet>, _>::new(booking.owner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Wallet::empty(booking.owner_id));
        owner
            .credit(amount, now.coerce())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        booking.paid_at = Some(now.coerce());

        for (account, kind) in [
            (farmer, wallet::TransactionKind::Payment),
            (owner, wallet::TransactionKind::Earning),
        ] {
            tx.execute(Insert(wallet::Transaction {
                id: wallet::TransactionId::new(),
                user_id: account.user_id,
                kind,
                amount,
                booking_id: Some(booking_id),
                created_at: now.coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
            tx.execute(Update(account))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`Booking(id: {booking_id})` paid with {amount}");

        Ok(booking)
    }
}

/// Error of [`PayForBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] with the provided ID doesn't exist.
    #[display("`Booking(id: {_0})` does not exist")]
    #[from(ignore)]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`User`] is not the farmer of the [`Booking`].
    #[display("`User(id: {_0})` did not place the booking")]
    #[from(ignore)]
    NotFarmer(#[error(not(source))] user::Id),

    /// [`Booking`] is already paid or not confirmed yet.
    #[display("`{_0}` booking cannot be paid for")]
    #[from(ignore)]
    NotPayable(#[error(not(source))] booking::StatusKind),

    /// [`Wallet`] balance cannot be changed.
    #[display("{_0}")]
    #[from]
    Balance(wallet::BalanceError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::Money;

    use crate::{
        command::{fixture, update_booking_status, TopUpWallet},
        domain::{
            booking::{StatusKind, Transition, TransitionError},
            user::Role,
            wallet::BalanceError,
        },
        query, Command as _,
    };

    use super::{ExecutionError, PayForBooking};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn moves_money_from_farmer_to_owner() {
        let svc = fixture::service();
        let owner = fixture::user(&svc, "suresh", Role::Owner).await;
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let equipment = fixture::equipment(&svc, owner.id).await;
        let booking = fixture::booking(&svc, farmer.id, equipment.id).await;

        let pay = PayForBooking {
            booking_id: booking.id,
            farmer_id: farmer.id,
        };
        let err = svc.execute(pay).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotPayable(StatusKind::Pending),
        ));

        _ = svc
            .execute(fixture::transition(
                booking.id,
                &owner,
                Transition::Confirm,
            ))
            .await
            .unwrap();
        let err = svc.execute(pay).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Balance(BalanceError::InsufficientFunds { .. }),
        ));

        _ = svc
            .execute(TopUpWallet {
                user_id: farmer.id,
                amount: money("2000INR"),
            })
            .await
            .unwrap();
        let paid = svc.execute(pay).await.unwrap();
        assert!(paid.paid_at.is_some());

        let farmer_wallet = svc
            .execute(query::wallet::ByUserId(farmer.id))
            .await
            .unwrap();
        let owner_wallet = svc
            .execute(query::wallet::ByUserId(owner.id))
            .await
            .unwrap();
        assert_eq!(farmer_wallet.balance, money("300INR"));
        assert_eq!(owner_wallet.balance, money("1700INR"));

        let err = svc.execute(pay).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotPayable(_)));

        let err = svc
            .execute(fixture::transition(
                booking.id,
                &farmer,
                Transition::Cancel,
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            update_booking_status::ExecutionError::Transition(
                TransitionError::Paid,
            ),
        ));
    }
}
