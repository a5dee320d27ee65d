//! Domain models for the garage

pub mod event;
pub mod reservation;
pub mod space;
pub mod state;

// Re-exports
pub use event::{EventKind, EventLog, EventLogEntry};
pub use reservation::{BookingOrigin, Reservation, ReservationError, ReservationStatus};
pub use space::{Space, SpotType, Zone};
pub use state::GarageState;
