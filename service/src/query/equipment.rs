//! [`Query`] collection related to a single [`Equipment`].

use common::operations::By;

use crate::domain::{equipment, Equipment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Equipment`] by its [`equipment::Id`].
pub type ById = DatabaseQuery<By<Option<Equipment>, equipment::Id>>;
