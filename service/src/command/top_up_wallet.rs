//! [`Command`] for topping up a [`Wallet`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{user, wallet, Wallet},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for topping up a [`Wallet`] of a [`User`].
///
/// There is no payment gateway behind, the amount is credited as is.
#[derive(Clone, Copy, Debug)]
pub struct TopUpWallet {
    /// ID of the [`User`] owning the [`Wallet`].
    pub user_id: user::Id,

    /// Amount to credit.
    pub amount: Money,
}

impl<Db> Command<TopUpWallet> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Wallet>, user::Id>>,
            Ok = Option<Wallet>,
            Err = Traced<database::Error>,
        > + Database<Update<Wallet>, Err = Traced<database::Error>>
        + Database<Insert<wallet::Transaction>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Wallet;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TopUpWallet,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TopUpWallet { user_id, amount } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut wallet = tx
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .unwrap_or_else(|| Wallet::empty(user_id));

        let now = DateTime::now();
        wallet
            .credit(amount, now.coerce())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(wallet.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(wallet::Transaction {
            id: wallet::TransactionId::new(),
            user_id,
            kind: wallet::TransactionKind::TopUp,
            amount,
            booking_id: None,
            created_at: now.coerce(),
        }))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Wallet(user_id: {user_id})` topped up with {amount}");

        Ok(wallet)
    }
}

/// Error of [`TopUpWallet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Amount cannot be credited.
    #[display("{_0}")]
    #[from]
    Balance(wallet::BalanceError),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::Money;

    use crate::{
        command::fixture,
        domain::{user::Role, wallet::BalanceError},
        query, Command as _,
    };

    use super::{ExecutionError, TopUpWallet};

    #[tokio::test]
    async fn credits_lazily_created_wallet() {
        let svc = fixture::service();
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;

        for amount in ["1000INR", "500INR"] {
            _ = svc
                .execute(TopUpWallet {
                    user_id: farmer.id,
                    amount: amount.parse().unwrap(),
                })
                .await
                .unwrap();
        }

        let wallet = svc
            .execute(query::wallet::ByUserId(farmer.id))
            .await
            .unwrap();
        assert_eq!(wallet.balance, "1500INR".parse::<Money>().unwrap());
    }

    #[tokio::test]
    async fn rejects_invalid_amounts() {
        let svc = fixture::service();
        let farmer = fixture::user(&svc, "ramesh", Role::Farmer).await;
        let top_up = |amount: &str| TopUpWallet {
            user_id: farmer.id,
            amount: amount.parse().unwrap(),
        };

        for amount in ["0INR", "-5INR"] {
            let err = svc.execute(top_up(amount)).await.unwrap_err();
            assert!(
                matches!(
                    err.as_ref(),
                    ExecutionError::Balance(BalanceError::NonPositiveAmount(_)),
                ),
                "{amount} must be rejected",
            );
        }

        let err = svc.execute(top_up("10USD")).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Balance(BalanceError::CurrencyMismatch(_)),
        ));
    }
}
