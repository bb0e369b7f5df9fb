//! [`Query`] collection related to a single [`Operator`].

use common::operations::By;

use crate::domain::{operator, user, Operator};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries an [`Operator`] by its [`operator::Id`].
pub type ById = DatabaseQuery<By<Option<Operator>, operator::Id>>;

/// Queries an [`Operator`] profile of a [`User`].
pub type ByUserId = DatabaseQuery<By<Option<Operator>, user::Id>>;
