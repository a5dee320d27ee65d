//! Garage Pricing Core - Rust Engine
//!
//! Dynamic pricing for an event-day parking garage, plus a deterministic
//! occupancy simulation that books and clears spaces over a simulated day.
//!
//! # Architecture
//!
//! - **core**: Interpolation and simulated-day time
//! - **config**: Settings, defaults, TOML loading and validation
//! - **models**: Domain types (Space, Reservation, EventLog, GarageState)
//! - **layout**: Grid generation (zones, spot types, distances)
//! - **forecast**: Hourly demand and target-occupancy curves
//! - **pricing**: Three-layer pricing engine with elasticity adjustment
//! - **arrivals**: Gap-driven auto-booking
//! - **departures**: Expiry and stochastic departures
//! - **orchestrator**: Session owner, tick loop, manual booking, snapshots
//! - **stats**: Read-only statistics and dashboard metrics
//! - **rng**: Deterministic random number generation
//! - **telemetry**: Tracing subscriber setup
//!
//! # Critical Invariants
//!
//! 1. `floor <= final_price <= ceiling` for every quote
//! 2. At most one active reservation covers a space at any instant
//! 3. Reservation status only moves away from ACTIVE, never back
//! 4. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod arrivals;
pub mod config;
pub mod core;
pub mod departures;
pub mod error;
pub mod forecast;
pub mod layout;
pub mod models;
pub mod orchestrator;
pub mod pricing;
pub mod rng;
pub mod stats;
pub mod telemetry;

// Re-exports for convenience
pub use config::Settings;
pub use crate::core::interpolate::interpolate;
pub use error::{BookingError, ConfigError, SnapshotError};
pub use models::{
    BookingOrigin, EventKind, EventLog, EventLogEntry, GarageState, Reservation, ReservationStatus,
    Space, SpotType, Zone,
};
pub use orchestrator::{initialize_garage, run_simulation_tick, GarageSimulator, GarageSnapshot, TickResult};
pub use pricing::{calculate_price, PriceResult};
pub use rng::{RandomSource, RngManager};
pub use stats::{compute_stats, DashboardMetrics, SimulationStats};
