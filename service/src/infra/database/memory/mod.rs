//! In-memory [`Database`] implementation, mirrored to a JSON snapshot file.

pub mod client;
mod impls;
pub mod state;

use std::{io, path::PathBuf};

use derive_more::{Deref, Display, Error as StdError, From};
use serde::Deserialize;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{NonTx, Storage, Tx},
    state::{Snapshot, State},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] client, not mirrored to any file.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::new(State::default(), None))
    }

    /// Opens a [`Memory`] client with the provided [`Config`].
    ///
    /// If a snapshot file is configured, the initial [`State`] is loaded from
    /// it. Missing or empty files are treated as an empty [`State`].
    ///
    /// # Errors
    ///
    /// If the snapshot file cannot be read or has invalid contents.
    pub async fn open(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let Some(path) = conf.snapshot.clone() else {
            return Ok(Self::new());
        };

        let state = Snapshot::load(&path)
            .await
            .map_err(tracerr::wrap!())?
            .map(State::from)
            .unwrap_or_default();

        Ok(Self(NonTx::new(state, Some(path))))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Memory`] client configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the JSON snapshot file, if the data should survive restarts.
    pub snapshot: Option<PathBuf>,
}

/// In-memory database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Transaction is already committed.
    #[display("Transaction is already finished")]
    #[from(ignore)]
    FinishedTransaction,

    /// Snapshot file cannot be read or written.
    #[display("Snapshot I/O failed: {_0}")]
    SnapshotIo(io::Error),

    /// Snapshot file contents are malformed.
    #[display("Snapshot is malformed: {_0}")]
    SnapshotFormat(serde_json::Error),

    /// Snapshot file is of unknown version.
    #[display("Snapshot version `{_0}` is not supported")]
    #[from(ignore)]
    UnsupportedVersion(#[error(not(source))] u32),
}
