//! [`Wallet`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, money::Currency, unit, DateTimeOf, Money};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::{booking, define_id, user};

/// Balance a [`User`] pays bookings from and receives earnings to.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Wallet {
    /// ID of the [`User`] owning this [`Wallet`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Current balance of this [`Wallet`].
    pub balance: Money,

    /// [`DateTime`] when the balance last changed.
    pub updated_at: ModificationDateTime,
}

impl Wallet {
    /// [`Currency`] every [`Wallet`] is kept in.
    pub const CURRENCY: Currency = Currency::Inr;

    /// Creates a new empty [`Wallet`] of the provided [`User`].
    ///
    /// [`User`]: crate::domain::User
    #[must_use]
    pub fn empty(user_id: user::Id) -> Self {
        Self {
            user_id,
            balance: Money::zero(Self::CURRENCY),
            updated_at: ModificationDateTime::UNIX_EPOCH,
        }
    }

    /// Credits the provided `amount` to this [`Wallet`].
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive or is in another [`Currency`].
    pub fn credit(
        &mut self,
        amount: Money,
        at: ModificationDateTime,
    ) -> Result<(), BalanceError> {
        if !amount.is_positive() {
            return Err(BalanceError::NonPositiveAmount(amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(BalanceError::CurrencyMismatch(amount))?;
        self.updated_at = at;
        Ok(())
    }

    /// Debits the provided `amount` from this [`Wallet`].
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive, is in another [`Currency`], or
    /// exceeds the balance.
    pub fn debit(
        &mut self,
        amount: Money,
        at: ModificationDateTime,
    ) -> Result<(), BalanceError> {
        if !amount.is_positive() {
            return Err(BalanceError::NonPositiveAmount(amount));
        }
        let rest = self
            .balance
            .checked_sub(amount)
            .ok_or(BalanceError::CurrencyMismatch(amount))?;
        if rest.is_negative() {
            return Err(BalanceError::InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        self.balance = rest;
        self.updated_at = at;
        Ok(())
    }
}

/// Error of changing a [`Wallet`] balance.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum BalanceError {
    /// Amount is zero or negative.
    #[display("Amount must be positive, got {_0}")]
    NonPositiveAmount(#[error(not(source))] Money),

    /// Amount is in another [`Currency`].
    #[display("Amount {_0} is not in the `Wallet` currency")]
    CurrencyMismatch(#[error(not(source))] Money),

    /// Balance is lower than required.
    #[display("Insufficient funds: {balance} available, {required} required")]
    InsufficientFunds {
        /// Current balance.
        balance: Money,

        /// Required amount.
        required: Money,
    },
}

/// Movement of money on a [`Wallet`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Transaction {
    /// ID of this [`Transaction`].
    pub id: TransactionId,

    /// ID of the [`User`] whose [`Wallet`] moved.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// [`TransactionKind`] of this [`Transaction`].
    pub kind: TransactionKind,

    /// Moved amount, always positive.
    pub amount: Money,

    /// ID of the paid [`Booking`], if any.
    ///
    /// [`Booking`]: crate::domain::Booking
    pub booking_id: Option<booking::Id>,

    /// [`DateTime`] when this [`Transaction`] happened.
    pub created_at: TransactionDateTime,
}

define_id! {
    #[doc = "ID of a [`Transaction`]."]
    TransactionId
}

define_kind! {
    #[doc = "Kind of a [`Transaction`]."]
    enum TransactionKind {
        #[doc = "Money added to a [`Wallet`]."]
        TopUp = 1,

        #[doc = "Farmer paid for a booking."]
        Payment = 2,

        #[doc = "Owner earned from a booking."]
        Earning = 3,
    }
}

/// [`DateTime`] when a [`Wallet`] balance last changed.
pub type ModificationDateTime = DateTimeOf<(Wallet, unit::Modification)>;

/// [`DateTime`] of a [`Transaction`].
pub type TransactionDateTime = DateTimeOf<(Transaction, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::domain::user;

    use super::{BalanceError, Wallet};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn credits_and_debits() {
        let now = DateTime::now().coerce();
        let mut wallet = Wallet::empty(user::Id::new());

        wallet.credit(money("2000INR"), now).unwrap();
        wallet.debit(money("1550INR"), now).unwrap();

        assert_eq!(wallet.balance, money("450INR"));
        assert_eq!(wallet.updated_at, now);
    }

    #[test]
    fn refuses_overdraft() {
        let now = DateTime::now().coerce();
        let mut wallet = Wallet::empty(user::Id::new());
        wallet.credit(money("100INR"), now).unwrap();

        assert!(matches!(
            wallet.debit(money("100.01INR"), now),
            Err(BalanceError::InsufficientFunds { .. }),
        ));
        assert_eq!(wallet.balance, money("100INR"));
    }

    #[test]
    fn refuses_invalid_amounts() {
        let now = DateTime::now().coerce();
        let mut wallet = Wallet::empty(user::Id::new());

        assert!(matches!(
            wallet.credit(money("0INR"), now),
            Err(BalanceError::NonPositiveAmount(_)),
        ));
        assert!(matches!(
            wallet.credit(money("-5INR"), now),
            Err(BalanceError::NonPositiveAmount(_)),
        ));
        assert!(matches!(
            wallet.credit(money("5USD"), now),
            Err(BalanceError::CurrencyMismatch(_)),
        ));
    }
}
