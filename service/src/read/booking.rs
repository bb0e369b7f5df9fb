//! [`Booking`] read model definition.
//!
//! [`Booking`]: crate::domain::Booking

use std::collections::HashMap;

use common::Money;

use crate::domain::booking;
#[cfg(doc)]
use crate::domain::Booking;

/// Aggregated figures of [`Booking`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    /// Number of [`Booking`]s in each [`booking::StatusKind`].
    pub by_status: HashMap<booking::StatusKind, list::TotalCount>,

    /// Total price of the completed [`Booking`]s.
    pub completed_value: Money,

    /// Total price of the paid [`Booking`]s.
    pub paid_value: Money,
}

impl Summary {
    /// Returns the number of [`Booking`]s in the provided
    /// [`booking::StatusKind`].
    #[must_use]
    pub fn count(&self, status: booking::StatusKind) -> list::TotalCount {
        self.by_status.get(&status).copied().unwrap_or(0.into())
    }
}

pub mod list {
    //! [`Booking`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{booking, equipment, operator, user};
    #[cfg(doc)]
    use crate::domain::Booking;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = booking::Id;

    /// Cursor pointing to a specific [`Booking`] in a list.
    pub type Cursor = booking::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the farmer whose [`Booking`]s to list.
        pub farmer_id: Option<user::Id>,

        /// ID of the owner whose [`Booking`]s to list.
        pub owner_id: Option<user::Id>,

        /// ID of the [`Operator`] whose [`Booking`]s to list.
        ///
        /// [`Operator`]: crate::domain::Operator
        pub operator_id: Option<operator::Id>,

        /// ID of the [`Equipment`] whose [`Booking`]s to list.
        ///
        /// [`Equipment`]: crate::domain::Equipment
        pub equipment_id: Option<equipment::Id>,

        /// [`booking::StatusKind`] to list.
        pub status: Option<booking::StatusKind>,
    }

    /// Total count of [`Booking`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
