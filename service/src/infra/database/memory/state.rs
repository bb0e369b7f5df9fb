//! [`State`] of the in-memory database and its [`Snapshot`].

use std::{collections::HashMap, io, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracerr::Traced;

use crate::{
    domain::{
        booking, equipment, negotiation, operator, user, wallet, Booking,
        Equipment, Negotiation, Operator, User, Wallet,
    },
    infra::database,
};

use super::Error;

/// Whole data of the in-memory database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Registered [`User`]s.
    pub(crate) users: HashMap<user::Id, User>,

    /// Listed [`Equipment`].
    pub(crate) equipment: HashMap<equipment::Id, Equipment>,

    /// [`Operator`] profiles.
    pub(crate) operators: HashMap<operator::Id, Operator>,

    /// Placed [`Booking`]s.
    pub(crate) bookings: HashMap<booking::Id, Booking>,

    /// Price [`Negotiation`]s.
    pub(crate) negotiations: HashMap<negotiation::Id, Negotiation>,

    /// [`Wallet`]s by their owners.
    pub(crate) wallets: HashMap<user::Id, Wallet>,

    /// [`wallet::Transaction`]s history.
    pub(crate) transactions:
        HashMap<wallet::TransactionId, wallet::Transaction>,
}

impl From<Snapshot> for State {
    fn from(snapshot: Snapshot) -> Self {
        let Snapshot {
            version: _,
            users,
            equipment,
            operators,
            bookings,
            negotiations,
            wallets,
            transactions,
        } = snapshot;

        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            equipment: equipment.into_iter().map(|e| (e.id, e)).collect(),
            operators: operators.into_iter().map(|o| (o.id, o)).collect(),
            bookings: bookings.into_iter().map(|b| (b.id, b)).collect(),
            negotiations: negotiations
                .into_iter()
                .map(|n| (n.id, n))
                .collect(),
            wallets: wallets.into_iter().map(|w| (w.user_id, w)).collect(),
            transactions: transactions
                .into_iter()
                .map(|t| (t.id, t))
                .collect(),
        }
    }
}

/// Serializable copy of a [`State`], stored as a JSON file.
///
/// Records are ordered by their IDs, so the file is stable between writes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    /// Format version of this [`Snapshot`].
    pub version: u32,

    /// [`User`]s of the [`State`].
    #[serde(default)]
    pub users: Vec<User>,

    /// [`Equipment`] of the [`State`].
    #[serde(default)]
    pub equipment: Vec<Equipment>,

    /// [`Operator`]s of the [`State`].
    #[serde(default)]
    pub operators: Vec<Operator>,

    /// [`Booking`]s of the [`State`].
    #[serde(default)]
    pub bookings: Vec<Booking>,

    /// [`Negotiation`]s of the [`State`].
    #[serde(default)]
    pub negotiations: Vec<Negotiation>,

    /// [`Wallet`]s of the [`State`].
    #[serde(default)]
    pub wallets: Vec<Wallet>,

    /// [`wallet::Transaction`]s of the [`State`].
    #[serde(default)]
    pub transactions: Vec<wallet::Transaction>,
}

impl Snapshot {
    /// Current format version of a [`Snapshot`].
    pub const VERSION: u32 = 1;

    /// Loads a [`Snapshot`] from the file at the provided `path`.
    ///
    /// Returns [`None`] if the file doesn't exist or is blank.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, is malformed, or is of an unsupported
    /// version.
    pub async fn load(
        path: &Path,
    ) -> Result<Option<Self>, Traced<database::Error>> {
        /// Leading part of a [`Snapshot`] being checked before the rest.
        #[derive(Deserialize)]
        struct Header {
            /// [`Snapshot::version`].
            version: u32,
        }

        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(tracerr::new!(Error::SnapshotIo(e)))
                    .map_err(tracerr::map_from)
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let Header { version } = serde_json::from_slice(&bytes)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        if version != Self::VERSION {
            return Err(tracerr::new!(Error::UnsupportedVersion(version)))
                .map_err(tracerr::map_from);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Stores this [`Snapshot`] into the file at the provided `path`.
    ///
    /// The file is replaced atomically: the contents are written into a
    /// sibling temporary file first, which is renamed afterwards.
    ///
    /// # Errors
    ///
    /// If the file cannot be written.
    pub async fn save(
        &self,
        path: &Path,
    ) -> Result<(), Traced<database::Error>> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(tracerr::from_and_wrap!(=> Error))
                    .map_err(tracerr::map_from)?;
            }
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        fs::rename(&tmp, path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl From<&State> for Snapshot {
    fn from(state: &State) -> Self {
        /// Clones the values of the `map` ordered by the `key`.
        fn sorted<K, V, O: Ord>(
            map: &HashMap<K, V>,
            key: impl Fn(&V) -> O,
        ) -> Vec<V>
        where
            V: Clone,
        {
            let mut values = map.values().cloned().collect::<Vec<_>>();
            values.sort_by_key(key);
            values
        }

        Self {
            version: Self::VERSION,
            users: sorted(&state.users, |u| u.id),
            equipment: sorted(&state.equipment, |e| e.id),
            operators: sorted(&state.operators, |o| o.id),
            bookings: sorted(&state.bookings, |b| b.id),
            negotiations: sorted(&state.negotiations, |n| n.id),
            wallets: sorted(&state.wallets, |w| w.user_id),
            transactions: sorted(&state.transactions, |t| t.id),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{env, path::PathBuf};

    use common::{DateTime, Money};
    use uuid::Uuid;

    use crate::{
        domain::{user, wallet, Wallet},
        infra::database::{self, memory},
    };

    use super::{Snapshot, State};

    fn temp_path() -> PathBuf {
        env::temp_dir()
            .join(format!("snapshot-{}", Uuid::new_v4()))
            .join("state.json")
    }

    fn farmer() -> user::User {
        let password = user::Password::new("secret").unwrap();
        user::User {
            id: user::Id::new(),
            name: user::Name::new("Ramesh Patil").unwrap(),
            login: user::Login::new("ramesh").unwrap(),
            password_hash: user::PasswordHash::new(&password),
            role: user::Role::Farmer,
            email: None,
            phone: Some(user::Phone::new("+91 98765 43210").unwrap()),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn round_trips_through_file() {
        let path = temp_path();

        let user = farmer();
        let mut wallet = Wallet::empty(user.id);
        wallet
            .credit(
                "2500INR".parse::<Money>().unwrap(),
                DateTime::now().coerce(),
            )
            .unwrap();
        let tx = wallet::Transaction {
            id: wallet::TransactionId::new(),
            user_id: user.id,
            kind: wallet::TransactionKind::TopUp,
            amount: "2500INR".parse().unwrap(),
            booking_id: None,
            created_at: DateTime::now().coerce(),
        };

        let mut state = State::default();
        _ = state.users.insert(user.id, user.clone());
        _ = state.wallets.insert(user.id, wallet.clone());
        _ = state.transactions.insert(tx.id, tx.clone());

        Snapshot::from(&state).save(&path).await.unwrap();
        let loaded = State::from(Snapshot::load(&path).await.unwrap().unwrap());

        let loaded_user = &loaded.users[&user.id];
        assert_eq!(loaded_user.login, user.login);
        assert_eq!(loaded_user.role, user::Role::Farmer);
        assert_eq!(loaded_user.phone, user.phone);
        assert_eq!(loaded_user.created_at, user.created_at);
        assert_eq!(loaded.wallets[&user.id].balance, wallet.balance);
        assert_eq!(loaded.transactions[&tx.id].amount, tx.amount);

        _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn treats_missing_and_blank_files_as_empty() {
        let path = temp_path();
        assert!(Snapshot::load(&path).await.unwrap().is_none());

        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "  \n").await.unwrap();
        assert!(Snapshot::load(&path).await.unwrap().is_none());

        _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn rejects_unknown_versions() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, r#"{"version": 42}"#).await.unwrap();

        let err = Snapshot::load(&path).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::UnsupportedVersion(42)),
        ));

        tokio::fs::write(&path, "{not json").await.unwrap();
        let err = Snapshot::load(&path).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::SnapshotFormat(_)),
        ));

        _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
