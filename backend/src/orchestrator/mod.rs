//! Orchestrator - the garage session owner
//!
//! Runs the tick loop, the manual booking flow and playback control.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{initialize_garage, run_simulation_tick, GarageSimulator, TickResult};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, GarageSnapshot};
