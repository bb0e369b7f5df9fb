//! Read entities definitions.

pub mod booking;
pub mod equipment;
pub mod negotiation;
pub mod operator;
pub mod user;
pub mod wallet;
