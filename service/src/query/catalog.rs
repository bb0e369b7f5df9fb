//! [`Query`] collection related to the [`Equipment`] catalog.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{equipment, Equipment},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Equipment`] by their [`equipment::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<equipment::Id, Equipment>, Vec<equipment::Id>>>;

/// Queries a page of the [`Equipment`] catalog.
pub type List = DatabaseQuery<
    By<read::equipment::list::Page, read::equipment::list::Selector>,
>;

/// Queries total count of [`Equipment`] passing a filter.
pub type TotalCount = DatabaseQuery<
    By<read::equipment::list::TotalCount, read::equipment::list::Filter>,
>;
