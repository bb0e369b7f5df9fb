//! [`Query`] collection related to a single [`Negotiation`].

use common::operations::By;

use crate::domain::{negotiation, Negotiation};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Negotiation`] by its [`negotiation::Id`].
pub type ById = DatabaseQuery<By<Option<Negotiation>, negotiation::Id>>;
