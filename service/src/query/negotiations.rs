//! [`Query`] collection related to the multiple [`Negotiation`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{negotiation, Negotiation},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Negotiation`]s by their [`negotiation::Id`]s.
pub type ByIds = DatabaseQuery<
    By<HashMap<negotiation::Id, Negotiation>, Vec<negotiation::Id>>,
>;

/// Queries a list of [`Negotiation`]s.
pub type List = DatabaseQuery<
    By<read::negotiation::list::Page, read::negotiation::list::Selector>,
>;

/// Queries total count of [`Negotiation`]s passing a filter.
pub type TotalCount = DatabaseQuery<
    By<read::negotiation::list::TotalCount, read::negotiation::list::Filter>,
>;
