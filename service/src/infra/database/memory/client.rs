//! In-memory database client definitions.

use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use tracerr::Traced;

use crate::infra::database;

use super::{Error, Snapshot, State};

/// Generic access to a [`State`].
pub trait Storage {
    /// Reads the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore.
    fn read<F, R>(
        &self,
        f: F,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>> + Send
    where
        F: FnOnce(&State) -> R + Send,
        R: Send;

    /// Modifies the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore.
    fn write<F, R>(
        &self,
        f: F,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>> + Send
    where
        F: FnOnce(&mut State) -> R + Send,
        R: Send;
}

/// Non-transactional in-memory database client.
///
/// Every [`Storage::write()`] is applied to the shared [`State`] right away.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Shared [`State`].
    state: Arc<RwLock<State>>,

    /// Indicator whether the [`State`] changed since the last snapshot.
    dirty: Arc<AtomicBool>,

    /// Path of the snapshot file to mirror the [`State`] to, if any.
    snapshot: Option<Arc<Path>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client holding the provided [`State`].
    #[must_use]
    pub(crate) fn new(state: State, snapshot: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            dirty: Arc::new(AtomicBool::new(false)),
            snapshot: snapshot.map(Arc::from),
        }
    }

    /// Writes the [`State`] into the snapshot file, if it's configured and
    /// the [`State`] changed since the last time.
    ///
    /// Returns whether the snapshot was written.
    ///
    /// # Errors
    ///
    /// If failed to write the snapshot file.
    pub(crate) async fn persist(
        &self,
    ) -> Result<bool, Traced<database::Error>> {
        let Some(path) = &self.snapshot else {
            return Ok(false);
        };
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        let snapshot = Snapshot::from(&*self.state.read().await);
        snapshot
            .save(path)
            .await
            .inspect_err(|_| self.dirty.store(true, Ordering::Release))
            .map_err(tracerr::wrap!())?;
        Ok(true)
    }
}

impl Storage for NonTx {
    async fn read<F, R>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&State) -> R + Send,
        R: Send,
    {
        Ok(f(&*self.state.read().await))
    }

    async fn write<F, R>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&mut State) -> R + Send,
        R: Send,
    {
        let out = f(&mut *self.state.write().await);
        self.dirty.store(true, Ordering::Release);
        Ok(out)
    }
}

/// Transactional in-memory database client.
///
/// Holds the write lock of the shared [`State`] until committed or dropped,
/// working on a staged copy of it. Dropping a [`Tx`] without committing
/// discards all the changes.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Staged changes, [`None`] once committed.
    staged: Arc<Mutex<Option<Staged>>>,

    /// Indicator whether the shared [`State`] changed since the last
    /// snapshot.
    dirty: Arc<AtomicBool>,
}

/// Changes staged in a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Exclusive access to the shared [`State`].
    guard: OwnedRwLockWriteGuard<State>,

    /// Copy of the shared [`State`] being modified.
    state: State,
}

impl Tx {
    /// Starts a new [`Tx`] from the provided [`NonTx`] client, waiting for
    /// other [`Tx`]s to finish.
    pub(crate) async fn from_non_tx(client: &NonTx) -> Self {
        let guard = Arc::clone(&client.state).write_owned().await;
        let state = State::clone(&guard);
        Self {
            staged: Arc::new(Mutex::new(Some(Staged { guard, state }))),
            dirty: Arc::clone(&client.dirty),
        }
    }

    /// Commits this [`Tx`], replacing the shared [`State`] with the staged
    /// one.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is already committed.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(Staged { mut guard, state }) = self.staged.lock().await.take()
        else {
            return Err(tracerr::new!(Error::FinishedTransaction))
                .map_err(tracerr::map_from);
        };
        *guard = state;
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }
}

impl Storage for Tx {
    async fn read<F, R>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&State) -> R + Send,
        R: Send,
    {
        let staged = self.staged.lock().await;
        let Some(staged) = staged.as_ref() else {
            return Err(tracerr::new!(Error::FinishedTransaction))
                .map_err(tracerr::map_from);
        };
        Ok(f(&staged.state))
    }

    async fn write<F, R>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&mut State) -> R + Send,
        R: Send,
    {
        let mut staged = self.staged.lock().await;
        let Some(staged) = staged.as_mut() else {
            return Err(tracerr::new!(Error::FinishedTransaction))
                .map_err(tracerr::map_from);
        };
        Ok(f(&mut staged.state))
    }
}
