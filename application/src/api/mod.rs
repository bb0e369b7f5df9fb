//! GraphQL API definitions.

pub mod booking;
pub mod equipment;
mod mutation;
pub mod negotiation;
pub mod operator;
mod query;
pub mod report;
pub mod scalar;
mod subscription;
pub mod user;
pub mod wallet;

use service::domain::user::Role;

use crate::{define_error, Context, Error, Session};

pub use self::{
    booking::Booking, equipment::Equipment, mutation::Mutation,
    negotiation::Negotiation, operator::Operator, query::Query,
    subscription::Subscription, user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

/// Returns the current [`Session`], ensuring its `User` acts in the provided
/// [`Role`].
///
/// # Errors
///
/// Errors if the current request is not authorized, or its `User` acts in
/// another [`Role`].
pub(crate) async fn session_of(
    role: Role,
    ctx: &Context,
) -> Result<Session, Error> {
    let session = ctx.current_session().await?;
    if session.role == role {
        Ok(session)
    } else {
        Err(Error::from(PrivilegeError::from(role))).map_err(ctx.error())
    }
}

define_error! {
    enum PrivilegeError {
        #[code = "NOT_FARMER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a farmer"]
        Farmer,

        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an equipment owner"]
        Owner,

        #[code = "NOT_OPERATOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an operator"]
        Operator,

        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an admin"]
        Admin,
    }
}

impl From<Role> for PrivilegeError {
    fn from(role: Role) -> Self {
        match role {
            Role::Farmer => Self::Farmer,
            Role::Owner => Self::Owner,
            Role::Operator => Self::Operator,
            Role::Admin => Self::Admin,
        }
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
