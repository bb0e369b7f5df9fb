//! Background [`Task`]s definitions.

mod background;
pub mod persist_snapshot;

pub use common::Handler as Task;

pub use self::{background::Background, persist_snapshot::PersistSnapshot};
