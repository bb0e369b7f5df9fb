//! [`Negotiation`] read model definition.
//!
//! [`Negotiation`]: crate::domain::Negotiation

pub mod list {
    //! [`Negotiation`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{negotiation, user};
    #[cfg(doc)]
    use crate::domain::Negotiation;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = negotiation::Id;

    /// Cursor pointing to a specific [`Negotiation`] in a list.
    pub type Cursor = negotiation::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the farmer whose [`Negotiation`]s to list.
        pub farmer_id: Option<user::Id>,

        /// ID of the owner whose [`Negotiation`]s to list.
        pub owner_id: Option<user::Id>,

        /// [`negotiation::StatusKind`] to list.
        pub status: Option<negotiation::StatusKind>,
    }

    /// Total count of [`Negotiation`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
