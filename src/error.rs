use super::booking::{BookingId, BookingStatus};
use super::validator::Violations;
use std::fmt;

pub type Result<T> = std::result::Result<T, BookingError>;

#[derive(thiserror::Error, Debug)]
pub enum BookingError {
    #[error("Booking request failed validation: {0}")]
    ValidationFailed(Violations),
    #[error("Only PENDING bookings can be {}. Booking {id} is {from}", .to.as_verb())]
    IllegalTransition {
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: Entity, id: u64 },
    #[error("Repository call failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    AdSpace,
    Booking,
}

impl BookingError {
    pub fn ad_space_not_found(id: super::ad_space::AdSpaceId) -> Self {
        BookingError::NotFound {
            entity: Entity::AdSpace,
            id: id.0,
        }
    }
    pub fn booking_not_found(id: BookingId) -> Self {
        BookingError::NotFound {
            entity: Entity::Booking,
            id: id.0,
        }
    }
    /// Violations carried by a validation failure, if that is what this is.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            BookingError::ValidationFailed(violations) => Some(violations),
            _ => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::AdSpace => f.write_str("Ad space"),
            Entity::Booking => f.write_str("Booking"),
        }
    }
}

impl From<sled::Error> for BookingError {
    fn from(value: sled::Error) -> Self {
        BookingError::Transport(value.to_string())
    }
}

impl From<minicbor::decode::Error> for BookingError {
    fn from(value: minicbor::decode::Error) -> Self {
        BookingError::Transport(format!("failed to decode stored record: {value}"))
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(value: serde_json::Error) -> Self {
        BookingError::Transport(format!("malformed payload: {value}"))
    }
}
