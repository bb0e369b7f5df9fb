//! [`Operator`] read model definition.
//!
//! [`Operator`]: crate::domain::Operator

pub mod list {
    //! [`Operator`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::operator;
    #[cfg(doc)]
    use crate::domain::Operator;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = operator::Id;

    /// Cursor pointing to a specific [`Operator`] in a list.
    pub type Cursor = operator::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`operator::Specialization`] the [`Operator`]s must have.
        pub specialization: Option<operator::Specialization>,

        /// Indicator whether to list verified [`Operator`]s only.
        pub verified_only: bool,

        /// Indicator whether to list available [`Operator`]s only.
        pub available_only: bool,
    }

    /// Total count of [`Operator`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
