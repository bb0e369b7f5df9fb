//! [`Equipment`] read model definition.
//!
//! [`Equipment`]: crate::domain::Equipment

pub mod list {
    //! [`Equipment`] catalog definitions.

    use common::{define_pagination, Money};
    use derive_more::{From, Into};

    use crate::domain::{equipment, user};
    #[cfg(doc)]
    use crate::domain::Equipment;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = equipment::Id;

    /// Cursor pointing to a specific [`Equipment`] in the catalog.
    pub type Cursor = equipment::Id;

    /// Filter for [`Selector`].
    ///
    /// Textual criteria match case-insensitively.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`equipment::Kind`] to list.
        pub kind: Option<equipment::Kind>,

        /// [`equipment::Status`] to list.
        pub status: Option<equipment::Status>,

        /// ID of the owner whose [`Equipment`] to list.
        pub owner_id: Option<user::Id>,

        /// State the [`Equipment`] is located in.
        pub state: Option<equipment::Place>,

        /// District the [`Equipment`] is located in.
        pub district: Option<equipment::Place>,

        /// Highest hourly rate to list.
        pub max_hourly_rate: Option<Money>,

        /// [`equipment::Name`] (or its part) to fuzzy search for.
        pub name: Option<equipment::Name>,
    }

    /// Total count of [`Equipment`] in the catalog.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
