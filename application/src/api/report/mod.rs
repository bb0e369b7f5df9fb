//! Reports definitions.

pub mod overview;

pub use self::overview::Overview;
