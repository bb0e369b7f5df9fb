//! [`Query`] collection related to the multiple [`Operator`]s.

use std::collections::HashMap;

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{operator, Operator},
    read,
};

use super::DatabaseQuery;

/// Queries multiple [`Operator`]s by their [`operator::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<operator::Id, Operator>, Vec<operator::Id>>>;

/// Queries a list of [`Operator`]s.
pub type List = DatabaseQuery<
    By<read::operator::list::Page, read::operator::list::Selector>,
>;

/// Queries total count of [`Operator`]s passing a filter.
pub type TotalCount = DatabaseQuery<
    By<read::operator::list::TotalCount, read::operator::list::Filter>,
>;
