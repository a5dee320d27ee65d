//! Error types
//!
//! Business-rule rejections are values, never panics. Every variant renders a
//! reason string suitable for showing to the caller as-is.

use crate::models::{ReservationError, ReservationStatus};
use thiserror::Error;

/// Rejections from the quote / book / cancel / time-control flows
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    #[error("Space {0} not found")]
    SpaceNotFound(String),

    #[error("Invalid duration: {duration}. Must be {min}-{max} hours.")]
    InvalidDuration { duration: f64, min: f64, max: f64 },

    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    #[error("Space {0} is occupied")]
    SpaceOccupied(String),

    #[error("Space {0} is already held")]
    SpaceHeld(String),

    #[error("Reservation {0} not found")]
    ReservationNotFound(String),

    #[error("Reservation {id} is {status}, only ACTIVE reservations can change")]
    ReservationNotActive { id: String, status: ReservationStatus },

    #[error("Invalid speed: {speed}. Valid speeds: {valid:?}")]
    InvalidSpeed { speed: f64, valid: Vec<f64> },

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
}

impl From<ReservationError> for BookingError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::NotActive { id, status } => BookingError::ReservationNotActive { id, status },
        }
    }
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Snapshot / hashing failures
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot failed validation: {0}")]
    Invalid(String),
}
