//! Garage simulator engine
//!
//! Owns one garage session and drives it tick by tick:
//!
//! ```text
//! For each logical tick:
//! 1. Advance the clock by one tick (clamped to end of day)
//! 2. Auto-clearing: expiry, then stochastic departures
//! 3. Auto-booking: gap-driven arrivals at inverse-price weighted spaces
//!    (steps 2-3 only when the simulation is enabled, otherwise expiry only)
//! 4. Handle end of day: stop playback, log the day summary
//! ```
//!
//! Manual quotes, bookings and cancellations go through the same owner, so a
//! single writer serialises every mutation. Holds are owned by the caller and
//! passed in as a set of space ids on every call that needs them.
//!
//! # Example
//!
//! ```rust
//! use garage_pricing_core::config::Settings;
//! use garage_pricing_core::orchestrator::GarageSimulator;
//! use std::collections::HashSet;
//!
//! let mut sim = GarageSimulator::new(Settings::default()).unwrap();
//! sim.set_simulation_enabled(true);
//!
//! let held = HashSet::new();
//! sim.advance_to(19.0, &held).unwrap();
//!
//! assert!(sim.current_time() >= 19.0);
//! assert!(sim.stats().total_bookings > 0);
//! ```

use crate::arrivals::run_auto_booking;
use crate::config::Settings;
use crate::core::time::SimClock;
use crate::departures::{expire_reservations, run_auto_clearing};
use crate::error::{BookingError, ConfigError, SnapshotError};
use crate::layout::generate_spaces;
use crate::models::{BookingOrigin, EventKind, GarageState, Reservation};
use crate::orchestrator::checkpoint::{compute_config_hash, validate_snapshot, GarageSnapshot};
use crate::pricing::{booking_lead_time, calculate_price, PriceResult};
use crate::rng::{RandomSource, RngManager};
use crate::stats::{compute_stats, dashboard_metrics, DashboardMetrics, SimulationStats};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

// ============================================================================
// Tick
// ============================================================================

/// What changed during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Simulated time the tick ran at
    pub time: f64,

    /// Reservations created by auto-booking
    pub new_bookings: Vec<Reservation>,

    /// Space ids freed by expiry or departure
    pub cleared_spaces: Vec<String>,

    /// This tick reached the end of the simulated day
    pub day_complete: bool,
}

/// A fresh garage at the start of the day: generated grid, no reservations,
/// empty log
pub fn initialize_garage(settings: &Settings) -> GarageState {
    GarageState::new(
        generate_spaces(&settings.garage),
        settings.garage.day_start_hour,
        settings.simulation.max_event_log,
    )
}

/// One simulation tick at the state's current time
///
/// Clearing runs first so freed spaces are bookable in the same tick. Spaces
/// in `held` are never auto-booked.
pub fn run_simulation_tick<R: RandomSource>(
    state: &mut GarageState,
    held: &HashSet<String>,
    settings: &Settings,
    rng: &mut R,
) -> TickResult {
    let cleared_spaces = run_auto_clearing(state, settings, rng);
    let new_bookings = run_auto_booking(state, held, settings, rng);

    trace!(
        time = state.current_time,
        booked = new_bookings.len(),
        cleared = cleared_spaces.len(),
        occupancy = state.occupancy_rate(state.current_time),
        "tick"
    );

    TickResult {
        time: state.current_time,
        new_bookings,
        cleared_spaces,
        day_complete: false,
    }
}

// ============================================================================
// GarageSimulator
// ============================================================================

/// Single-writer owner of a garage session
///
/// # Determinism
///
/// All randomness is via `rng` with seeded xorshift64*.
/// Same seed + same settings + same calls = identical day.
#[derive(Debug)]
pub struct GarageSimulator {
    settings: Settings,
    clock: SimClock,
    state: GarageState,
    rng: RngManager,
}

impl GarageSimulator {
    /// Create a simulator at the start of the day
    ///
    /// # Returns
    ///
    /// * `Ok(GarageSimulator)` - fresh garage, paused, simulation disabled
    /// * `Err(ConfigError)` - settings failed validation
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let rng = RngManager::new(settings.simulation.rng_seed);
        Self::with_rng(settings, rng)
    }

    /// Create a simulator drawing from a caller-supplied generator
    pub fn with_rng(settings: Settings, rng: RngManager) -> Result<Self, ConfigError> {
        settings.validate()?;

        let state = initialize_garage(&settings);
        info!(
            spaces = state.total_spaces(),
            seed = settings.simulation.rng_seed,
            start = state.current_time,
            "garage initialized"
        );

        Ok(Self {
            clock: settings.clock(),
            settings,
            state,
            rng,
        })
    }

    /// Resume from a snapshot taken under the same settings
    pub fn restore(settings: Settings, snapshot: GarageSnapshot) -> Result<Self, SnapshotError> {
        let hash = compute_config_hash(&settings)?;
        if hash != snapshot.config_hash {
            return Err(SnapshotError::Invalid(
                "settings do not match the snapshot's config hash".to_string(),
            ));
        }
        validate_snapshot(&snapshot)?;

        let mut state = snapshot.state;
        state.reindex();
        info!(time = state.current_time, "garage restored from snapshot");

        Ok(Self {
            clock: settings.clock(),
            settings,
            state,
            rng: RngManager::new(snapshot.rng_state),
        })
    }

    pub fn state(&self) -> &GarageState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn is_end_of_day(&self) -> bool {
        self.clock.is_end_of_day(self.state.current_time)
    }

    /// Current RNG position, for checkpointing
    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    // ------------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------------

    /// Run one simulation tick at the current time without moving the clock
    pub fn tick(&mut self, held: &HashSet<String>) -> TickResult {
        self.state.sync_holds(held.iter());
        run_simulation_tick(&mut self.state, held, &self.settings, &mut self.rng)
    }

    /// Advance one logical tick
    ///
    /// With the simulation disabled only natural expiry runs. Once the end of
    /// day is reached further steps are no-ops.
    pub fn step(&mut self, held: &HashSet<String>) -> TickResult {
        if self.is_end_of_day() {
            return TickResult {
                time: self.state.current_time,
                ..TickResult::default()
            };
        }

        self.state.current_time = self.clock.advance(self.state.current_time);

        let mut result = if self.state.simulation_enabled {
            self.tick(held)
        } else {
            self.state.sync_holds(held.iter());
            TickResult {
                time: self.state.current_time,
                cleared_spaces: expire_reservations(&mut self.state),
                ..TickResult::default()
            }
        };

        if self.is_end_of_day() {
            self.finish_day();
            result.day_complete = true;
        }

        result
    }

    /// Run up to `n` logical ticks, stopping early at end of day
    pub fn advance_logical_ticks(&mut self, n: usize, held: &HashSet<String>) -> Vec<TickResult> {
        let mut results = Vec::with_capacity(n);
        for _ in 0..n {
            if self.is_end_of_day() {
                break;
            }
            results.push(self.step(held));
        }
        results
    }

    /// One playback frame: as many logical ticks as the playback speed
    ///
    /// Tick size never changes with speed, so a day plays out the same at
    /// every speed.
    pub fn advance_frame(&mut self, held: &HashSet<String>) -> Vec<TickResult> {
        let ticks = (self.state.playback_speed as usize).max(1);
        self.advance_logical_ticks(ticks, held)
    }

    /// Step until the clock reaches `target` (clamped into the day)
    pub fn advance_to(&mut self, target: f64, held: &HashSet<String>) -> Result<Vec<TickResult>, BookingError> {
        if !target.is_finite() {
            return Err(BookingError::InvalidTime(target));
        }
        let target = self.clock.clamp(target);

        let mut results = Vec::new();
        while self.state.current_time < target && !self.is_end_of_day() {
            results.push(self.step(held));
        }
        debug!(time = self.state.current_time, ticks = results.len(), "advanced");
        Ok(results)
    }

    fn finish_day(&mut self) {
        self.state.is_playing = false;
        let stats = compute_stats(&self.state);

        info!(
            revenue = stats.total_revenue,
            bookings = stats.total_bookings,
            occupancy = stats.occupancy_rate,
            "day complete"
        );

        if self.state.simulation_enabled {
            self.state.log_event(
                EventKind::DayComplete,
                format!(
                    "Day complete! Revenue: ${:.2}, Bookings: {}, Final occupancy: {:.0}%",
                    stats.total_revenue,
                    stats.total_bookings,
                    stats.occupancy_rate * 100.0
                ),
            );
        }
    }

    // ------------------------------------------------------------------------
    // Playback control
    // ------------------------------------------------------------------------

    /// Scrub to `time`, clamped into the day. Pauses playback.
    ///
    /// Scrubbing moves the clock only; no ticks run in between.
    pub fn set_time(&mut self, time: f64) -> Result<f64, BookingError> {
        if !time.is_finite() {
            return Err(BookingError::InvalidTime(time));
        }
        self.state.is_playing = false;
        self.state.current_time = self.clock.clamp(time);
        info!(time = self.state.current_time, "time scrubbed");
        Ok(self.state.current_time)
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.is_playing = playing;
    }

    /// Set playback speed; only the configured speeds are accepted
    pub fn set_speed(&mut self, speed: f64) -> Result<(), BookingError> {
        let valid = &self.settings.simulation.valid_speeds;
        if !valid.contains(&speed) {
            return Err(BookingError::InvalidSpeed {
                speed,
                valid: valid.clone(),
            });
        }
        self.state.playback_speed = speed;
        Ok(())
    }

    pub fn set_simulation_enabled(&mut self, enabled: bool) {
        self.state.simulation_enabled = enabled;
    }

    /// Back to the start of the day with a fresh garage and a reseeded RNG
    pub fn reset(&mut self, simulation_enabled: bool) {
        self.state = initialize_garage(&self.settings);
        self.state.simulation_enabled = simulation_enabled;
        self.rng = RngManager::new(self.settings.simulation.rng_seed);
        info!(simulation_enabled, "garage reset");
    }

    // ------------------------------------------------------------------------
    // Manual flow
    // ------------------------------------------------------------------------

    /// Price a space for a user about to book it
    ///
    /// The space must be free for at least the shortest bookable stay.
    /// `held` holds the spaces other users currently hold.
    pub fn quote(&self, space_id: &str, held: &HashSet<String>) -> Result<PriceResult, BookingError> {
        let now = self.state.current_time;
        let space = self
            .state
            .get_space(space_id)
            .ok_or_else(|| BookingError::SpaceNotFound(space_id.to_string()))?;

        let shortest = now + self.settings.garage.min_duration_hours;
        if self.state.has_conflict(space_id, now, shortest) {
            return Err(BookingError::SpaceOccupied(space_id.to_string()));
        }
        if held.contains(space_id) {
            return Err(BookingError::SpaceHeld(space_id.to_string()));
        }

        let lead_time = booking_lead_time(now, &self.settings);
        Ok(calculate_price(space, now, &self.state, Some(lead_time), &self.settings))
    }

    /// Book a space from now for `duration_hours` at a previously quoted price
    ///
    /// Everything is validated before the state is touched.
    pub fn book(
        &mut self,
        space_id: &str,
        duration_hours: f64,
        price_locked: f64,
        held: &HashSet<String>,
    ) -> Result<Reservation, BookingError> {
        let result = self.try_book(space_id, duration_hours, price_locked, held);
        if let Err(err) = &result {
            warn!(space_id, duration_hours, reason = %err, "booking rejected");
        }
        result
    }

    fn try_book(
        &mut self,
        space_id: &str,
        duration_hours: f64,
        price_locked: f64,
        held: &HashSet<String>,
    ) -> Result<Reservation, BookingError> {
        let garage = &self.settings.garage;
        if !duration_hours.is_finite()
            || duration_hours < garage.min_duration_hours
            || duration_hours > garage.max_duration_hours
        {
            return Err(BookingError::InvalidDuration {
                duration: duration_hours,
                min: garage.min_duration_hours,
                max: garage.max_duration_hours,
            });
        }
        if !price_locked.is_finite() || price_locked <= 0.0 {
            return Err(BookingError::InvalidPrice(price_locked));
        }
        if self.state.get_space(space_id).is_none() {
            return Err(BookingError::SpaceNotFound(space_id.to_string()));
        }
        if held.contains(space_id) {
            return Err(BookingError::SpaceHeld(space_id.to_string()));
        }

        let start = self.state.current_time;
        let end = start + duration_hours;
        if self.state.has_conflict(space_id, start, end) {
            return Err(BookingError::SpaceOccupied(space_id.to_string()));
        }

        let reservation = Reservation::new(
            Uuid::new_v4().to_string(),
            space_id.to_string(),
            start,
            duration_hours,
            price_locked,
            BookingOrigin::Manual,
        );

        info!(
            reservation_id = reservation.id(),
            space_id,
            duration_hours,
            price = price_locked,
            "manual booking"
        );
        self.state.log_event(
            EventKind::Booking,
            format!(
                "Manual booking: {} for {}hr at ${:.2}/hr (Total: ${:.2})",
                space_id,
                duration_hours,
                price_locked,
                reservation.total_cost()
            ),
        );
        self.state.add_reservation(reservation.clone());

        Ok(reservation)
    }

    /// Cancel an active reservation
    pub fn cancel(&mut self, reservation_id: &str) -> Result<Reservation, BookingError> {
        let reservation = self
            .state
            .get_reservation_mut(reservation_id)
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.to_string()))?;

        reservation.cancel()?;
        let cancelled = reservation.clone();

        info!(reservation_id, space_id = cancelled.space_id(), "reservation cancelled");
        self.state.log_event(
            EventKind::Cancellation,
            format!("Cancelled {} on {}", cancelled.id(), cancelled.space_id()),
        );

        Ok(cancelled)
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn stats(&self) -> SimulationStats {
        compute_stats(&self.state)
    }

    pub fn metrics(&self) -> DashboardMetrics {
        dashboard_metrics(&self.state)
    }

    /// Immutable post-tick view for fan-out to viewers
    pub fn snapshot(&self) -> Result<GarageSnapshot, SnapshotError> {
        GarageSnapshot::capture(
            &self.state,
            &self.settings,
            self.settings.simulation.rng_seed,
            self.rng.get_state(),
        )
    }
}
