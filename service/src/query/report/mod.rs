//! Reporting [`Query`] collection.
//!
//! [`Query`]: crate::Query

pub mod overview;

pub use self::overview::Overview;
