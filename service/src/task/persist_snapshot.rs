//! [`PersistSnapshot`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Persist, Start};
use tokio::time::{interval, MissedTickBehavior};
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`PersistSnapshot`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between checks whether the data should be persisted.
    pub interval: time::Duration,
}

/// [`Task`] periodically mirroring the changed data of the [`Database`] into
/// its snapshot.
#[derive(Clone, Copy, Debug)]
pub struct PersistSnapshot<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<PersistSnapshot<Self>, Config>>> for Service<Db>
where
    PersistSnapshot<Service<Db>>:
        Task<Perform<()>, Ok = bool, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PersistSnapshot<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PersistSnapshot {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(true) => log::debug!("snapshot persisted"),
                Ok(false) => {}
                Err(e) => log::error!("`task::PersistSnapshot` failed: {e}"),
            }
        }
    }
}

impl<Db> Task<Perform<()>> for PersistSnapshot<Service<Db>>
where
    Db: Database<Persist, Ok = bool, Err = Traced<database::Error>>,
{
    type Ok = bool;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service
            .database()
            .execute(Persist)
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`PersistSnapshot`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(all(test, feature = "memory"))]
mod spec {
    use std::{env, time::Duration};

    use common::operations::Perform;
    use uuid::Uuid;

    use crate::{
        command::fixture,
        domain::user::Role,
        infra::{memory, Memory},
        Command as _,
    };

    use super::{Config, PersistSnapshot};

    #[tokio::test]
    async fn persists_only_changed_state() {
        let path = env::temp_dir()
            .join(format!("persist-{}", Uuid::new_v4()))
            .join("state.json");
        let db = Memory::open(&memory::Config {
            snapshot: Some(path.clone()),
        })
        .await
        .unwrap();
        let service = fixture::service_with(db);
        let task = PersistSnapshot {
            config: Config {
                interval: Duration::from_secs(1),
            },
            service: service.clone(),
        };

        assert!(!task.execute(Perform(())).await.unwrap());

        _ = service
            .execute(fixture::create_user("ramesh", Role::Farmer))
            .await
            .unwrap();
        assert!(task.execute(Perform(())).await.unwrap());
        assert!(tokio::fs::try_exists(&path).await.unwrap());
        assert!(!task.execute(Perform(())).await.unwrap());

        _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
