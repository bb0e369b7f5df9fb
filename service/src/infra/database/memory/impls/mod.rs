//! [`Database`] implementations.

mod booking;
mod equipment;
mod negotiation;
mod operator;
mod user;
mod wallet;

use common::operations::{Commit, Persist, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{Memory, NonTx, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::from_non_tx(&self.0).await))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

impl Database<Persist> for Memory<NonTx> {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Persist) -> Result<Self::Ok, Self::Err> {
        self.persist().await.map_err(tracerr::wrap!())
    }
}

/// Checks whether the `text` contains the `pattern` ignoring case.
fn contains_ignore_case(text: &str, pattern: &str) -> bool {
    text.to_lowercase().contains(&pattern.to_lowercase())
}

/// Checks whether the `text` equals the `other` one ignoring case.
fn eq_ignore_case(text: &str, other: &str) -> bool {
    text.to_lowercase() == other.to_lowercase()
}

/// Converts the provided number of items into a total count.
fn total_count<T: From<i32>>(count: usize) -> T {
    T::from(i32::try_from(count).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod spec {
    use std::{env, time::Duration};

    use common::{
        operations::{By, Commit, Insert, Persist, Select, Transact},
        DateTime,
    };
    use tokio::time;
    use uuid::Uuid;

    use crate::{
        domain::{user, User},
        infra::{memory, Database as _, Memory},
    };

    fn user(login: &str) -> User {
        let password = user::Password::new("secret").unwrap();
        User {
            id: user::Id::new(),
            name: user::Name::new("Suresh Jadhav").unwrap(),
            login: user::Login::new(login).unwrap(),
            password_hash: user::PasswordHash::new(&password),
            role: user::Role::Owner,
            email: Some(user::Email::new("suresh@example.com").unwrap()),
            phone: None,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    async fn select(db: &Memory, id: user::Id) -> Option<User> {
        db.execute(Select(By::<Option<User>, _>::new(id))).await.unwrap()
    }

    #[tokio::test]
    async fn commits_transaction() {
        let db = Memory::new();
        let u = user("suresh");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(u.clone())).await.unwrap();
        assert!(
            tx.execute(Select(By::<Option<User>, _>::new(u.id)))
                .await
                .unwrap()
                .is_some(),
        );
        tx.execute(Commit).await.unwrap();
        drop(tx);

        assert!(select(&db, u.id).await.is_some());
    }

    #[tokio::test]
    async fn discards_dropped_transaction() {
        let db = Memory::new();
        let u = user("suresh");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(u.clone())).await.unwrap();
        drop(tx);

        assert!(select(&db, u.id).await.is_none());
    }

    #[tokio::test]
    async fn persists_committed_state_on_demand() {
        let path = env::temp_dir()
            .join(format!("memory-{}", Uuid::new_v4()))
            .join("state.json");
        let conf = memory::Config {
            snapshot: Some(path.clone()),
        };
        let db = Memory::open(&conf).await.unwrap();
        let u = user("suresh");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(u.clone())).await.unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);

        assert!(db.execute(Persist).await.unwrap());
        assert!(!db.execute(Persist).await.unwrap());

        let reopened = Memory::open(&conf).await.unwrap();
        assert!(select(&reopened, u.id).await.is_some());

        _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn refuses_committing_twice() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert!(tx.execute(Commit).await.is_err());
        assert!(tx.execute(Insert(user("suresh"))).await.is_err());
    }

    #[tokio::test]
    async fn serializes_transactions() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();

        let other = db.clone();
        let second =
            tokio::spawn(async move {
                other.execute(Transact).await.map(drop)
            });
        time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        tx.execute(Commit).await.unwrap();
        drop(tx);
        time::timeout(Duration::from_secs(1), second)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
