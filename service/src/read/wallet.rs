//! [`Wallet`] read model definition.
//!
//! [`Wallet`]: crate::domain::Wallet

pub mod transaction {
    //! [`Transaction`]s history definitions.
    //!
    //! [`Transaction`]: crate::domain::wallet::Transaction

    pub mod list {
        //! [`Transaction`]s list definitions.

        use common::define_pagination;
        use derive_more::{From, Into};

        use crate::domain::{user, wallet};
        #[cfg(doc)]
        use crate::domain::{wallet::Transaction, Wallet};

        define_pagination!(Cursor, Node, Filter);

        /// Node in a [`Connection`].
        pub type Node = wallet::TransactionId;

        /// Cursor pointing to a specific [`Transaction`] in a list.
        pub type Cursor = wallet::TransactionId;

        /// Filter for [`Selector`].
        #[derive(Clone, Copy, Debug)]
        pub struct Filter {
            /// ID of the [`User`] whose [`Wallet`] [`Transaction`]s to list.
            ///
            /// [`User`]: crate::domain::User
            pub user_id: user::Id,

            /// [`wallet::TransactionKind`] to list.
            pub kind: Option<wallet::TransactionKind>,
        }

        /// Total count of [`Transaction`]s.
        #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
        pub struct TotalCount(i32);
    }
}
