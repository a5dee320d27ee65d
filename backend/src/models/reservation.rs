//! Reservation model
//!
//! A reservation ties a space (by id) to a `[start, end)` interval of decimal
//! hours at a locked hourly price. Reservations are never removed; they only
//! move from `Active` to `Completed` or `Cancelled`, and never back.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reservation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// Errors from status transitions
#[derive(Debug, Error, PartialEq)]
pub enum ReservationError {
    #[error("reservation {id} is already {status}")]
    NotActive { id: String, status: ReservationStatus },
}

/// Who created the reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingOrigin {
    /// Generated by the auto-booking simulation
    Simulated,
    /// Booked by a user through the quote/book flow
    Manual,
}

/// A committed booking of one space
///
/// # Example
/// ```
/// use garage_pricing_core::models::{BookingOrigin, Reservation, ReservationStatus};
///
/// let mut res = Reservation::new(
///     "sim-00000001".to_string(),
///     "R0C0".to_string(),
///     14.0,
///     2.0,
///     12.5,
///     BookingOrigin::Simulated,
/// );
/// assert_eq!(res.total_cost(), 25.0);
/// assert!(res.covers(15.99));
/// assert!(!res.covers(16.0));
///
/// res.complete().unwrap();
/// assert_eq!(res.status(), ReservationStatus::Completed);
/// assert!(res.cancel().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    id: String,
    space_id: String,
    start_time: f64,
    end_time: f64,
    /// $/hr locked at booking time
    price_locked: f64,
    total_cost: f64,
    origin: BookingOrigin,
    status: ReservationStatus,
}

impl Reservation {
    /// Create an active reservation starting at `start_time` for
    /// `duration_hours`. Total cost is `price_locked × duration`, rounded to
    /// cents.
    ///
    /// # Panics
    /// Panics if the duration is not positive
    pub fn new(
        id: String,
        space_id: String,
        start_time: f64,
        duration_hours: f64,
        price_locked: f64,
        origin: BookingOrigin,
    ) -> Self {
        assert!(duration_hours > 0.0, "reservation duration must be positive");
        Self {
            id,
            space_id,
            start_time,
            end_time: start_time + duration_hours,
            price_locked,
            total_cost: ((price_locked * duration_hours) * 100.0).round() / 100.0,
            origin,
            status: ReservationStatus::Active,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration_hours(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn price_locked(&self) -> f64 {
        self.price_locked
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn origin(&self) -> BookingOrigin {
        self.origin
    }

    pub fn is_simulated(&self) -> bool {
        self.origin == BookingOrigin::Simulated
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Active and `start <= time < end`
    pub fn covers(&self, time: f64) -> bool {
        self.is_active() && self.start_time <= time && time < self.end_time
    }

    /// Active and overlapping the half-open interval `[start, end)`
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.is_active() && self.start_time < end && start < self.end_time
    }

    /// Hours left before the natural end, from `time`
    pub fn remaining_hours(&self, time: f64) -> f64 {
        (self.end_time - time).max(0.0)
    }

    /// Active → Completed
    pub fn complete(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Completed)
    }

    /// Active → Cancelled
    pub fn cancel(&mut self) -> Result<(), ReservationError> {
        self.transition(ReservationStatus::Cancelled)
    }

    fn transition(&mut self, to: ReservationStatus) -> Result<(), ReservationError> {
        if self.status != ReservationStatus::Active {
            return Err(ReservationError::NotActive {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.status = to;
        Ok(())
    }
}
