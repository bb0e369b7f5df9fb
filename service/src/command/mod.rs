//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_booking;
pub mod create_equipment;
pub mod create_user;
pub mod create_user_session;
#[cfg(all(test, feature = "memory"))]
pub(crate) mod fixture;
pub mod pay_for_booking;
pub mod register_operator;
pub mod respond_to_negotiation;
pub mod top_up_wallet;
pub mod update_booking_status;
pub mod update_equipment_status;
pub mod update_operator;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_booking::CreateBooking, create_equipment::CreateEquipment,
    create_user::CreateUser, create_user_session::CreateUserSession,
    pay_for_booking::PayForBooking, register_operator::RegisterOperator,
    respond_to_negotiation::RespondToNegotiation, top_up_wallet::TopUpWallet,
    update_booking_status::UpdateBookingStatus,
    update_equipment_status::UpdateEquipmentStatus,
    update_operator::UpdateOperator,
};
