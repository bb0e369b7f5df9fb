//! Shared setup of [`Command`] tests.
//!
//! [`Command`]: crate::Command

use std::{num::NonZeroU32, time::Duration};

use common::DateTime;
use secrecy::SecretBox;

use crate::{
    domain::{
        booking, equipment, operator, pricing, user, Booking, Equipment, User,
    },
    infra::Memory,
    query, task, Command as _, Config, Service,
};

use super::{
    CreateBooking, CreateEquipment, CreateUser, RegisterOperator,
    UpdateBookingStatus, UpdateEquipmentStatus,
};

/// Password of every [`User`] created by [`create_user()`].
pub(crate) const PASSWORD: &str = "secret";

/// Creates a new [`Service`] over an empty [`Memory`] database.
pub(crate) fn service() -> Service<Memory> {
    service_with(Memory::new())
}

/// Creates a new [`Service`] over the provided [`Memory`] database.
pub(crate) fn service_with(database: Memory) -> Service<Memory> {
    Service {
        config: Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
            pricing: pricing::Policy::default(),
            persist_snapshot: task::persist_snapshot::Config {
                interval: Duration::from_secs(1),
            },
        },
        database,
    }
}

pub(crate) fn create_user(login: &str, role: user::Role) -> CreateUser {
    CreateUser {
        name: user::Name::new(format!("{login} Kumar")).unwrap(),
        login: user::Login::new(login).unwrap(),
        password: SecretBox::new(Box::new(
            user::Password::new(PASSWORD).unwrap(),
        )),
        role,
        email: Some(user::Email::new(format!("{login}@example.com")).unwrap()),
        phone: None,
    }
}

pub(crate) async fn user(
    svc: &Service<Memory>,
    login: &str,
    role: user::Role,
) -> User {
    svc.execute(create_user(login, role)).await.unwrap()
}

/// Lists a tractor near Pune, delivered for `500INR`.
pub(crate) fn create_equipment(
    owner_id: user::Id,
    hourly_rate: &str,
) -> CreateEquipment {
    CreateEquipment {
        owner_id,
        name: equipment::Name::new("Mahindra 575 DI").unwrap(),
        kind: equipment::Kind::Tractor,
        description: None,
        rates: equipment::Rates::new(hourly_rate.parse().unwrap(), None, None)
            .unwrap(),
        transport_charge: equipment::TransportCharge::new(
            "500INR".parse().unwrap(),
        )
        .unwrap(),
        location: equipment::Location {
            coordinates: equipment::Coordinates::new(18.5204, 73.8567)
                .unwrap(),
            village: equipment::Place::new("Wagholi").unwrap(),
            district: equipment::Place::new("Pune").unwrap(),
            state: equipment::Place::new("Maharashtra").unwrap(),
        },
        features: vec![equipment::Feature::new("4WD").unwrap()],
    }
}

/// Lists a `600INR` per hour tractor of the provided owner.
pub(crate) async fn equipment(
    svc: &Service<Memory>,
    owner_id: user::Id,
) -> Equipment {
    svc.execute(create_equipment(owner_id, "600INR"))
        .await
        .unwrap()
}

pub(crate) async fn equipment_status(
    svc: &Service<Memory>,
    id: equipment::Id,
) -> equipment::Status {
    svc.execute(query::equipment::ById::by(id))
        .await
        .unwrap()
        .unwrap()
        .status
}

pub(crate) fn update_equipment_status(
    equipment_id: equipment::Id,
    by: user::Id,
    status: equipment::Status,
) -> UpdateEquipmentStatus {
    UpdateEquipmentStatus {
        equipment_id,
        by,
        status,
    }
}

pub(crate) fn register_operator(user_id: user::Id) -> RegisterOperator {
    RegisterOperator {
        user_id,
        specializations: vec![
            operator::Specialization::new("Tractor").unwrap(),
        ],
        hourly_rate: "200INR".parse().unwrap(),
        experience_years: 7,
    }
}

/// Books the equipment for 2 hours with delivery, costing `1700INR` for the
/// [`equipment()`].
pub(crate) fn create_booking(
    farmer_id: user::Id,
    equipment_id: equipment::Id,
) -> CreateBooking {
    CreateBooking {
        farmer_id,
        equipment_id,
        operator_id: None,
        schedule: booking::Schedule {
            starts_at: (DateTime::now() + Duration::from_secs(24 * 60 * 60))
                .coerce(),
            duration: booking::Duration::Hours(NonZeroU32::new(2).unwrap()),
        },
        delivery: booking::Delivery::Delivery {
            address: booking::Address::new("Plot 12, Wagholi").unwrap(),
        },
        proposal: None,
    }
}

pub(crate) async fn booking(
    svc: &Service<Memory>,
    farmer_id: user::Id,
    equipment_id: equipment::Id,
) -> Booking {
    svc.execute(create_booking(farmer_id, equipment_id))
        .await
        .unwrap()
        .booking
}

pub(crate) fn transition(
    booking_id: booking::Id,
    by: &User,
    transition: booking::Transition,
) -> UpdateBookingStatus {
    UpdateBookingStatus {
        booking_id,
        actor: booking::Actor {
            user_id: by.id,
            role: by.role,
            operator_id: None,
        },
        transition,
    }
}
