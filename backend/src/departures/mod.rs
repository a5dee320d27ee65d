//! Auto-clearing: cars leaving the garage
//!
//! Runs at the start of every tick, before auto-booking, so a space freed
//! here can be rebooked in the same tick.
//!
//! Two passes, in order:
//!
//! 1. **Expiry**: every active reservation with `end_time <= now` completes.
//!    Applies to every reservation regardless of origin.
//! 2. **Stochastic departure**: every remaining active *simulated*
//!    reservation rolls once against the rate for the current event phase.
//!    Manual bookings never leave early.
//!
//! Completed and cancelled reservations are skipped, so clearing twice at
//! the same time is a no-op.

use crate::config::{Settings, SimulationConfig};
use crate::core::time::EventPhase;
use crate::models::{EventKind, GarageState};
use crate::rng::RandomSource;
use tracing::debug;

/// Per-tick early departure probability for a phase
pub fn departure_rate(phase: EventPhase, config: &SimulationConfig) -> f64 {
    match phase {
        EventPhase::PreEvent => config.early_departure_rate,
        EventPhase::DuringEvent => config.event_departure_rate,
        EventPhase::PostEvent => config.post_event_departure_rate,
    }
}

/// Log tag for a stochastic departure in a phase
pub fn departure_kind(phase: EventPhase) -> EventKind {
    match phase {
        EventPhase::PreEvent | EventPhase::DuringEvent => EventKind::EarlyDeparture,
        EventPhase::PostEvent => EventKind::PostGameDeparture,
    }
}

/// Complete every active reservation that has reached its end
///
/// Returns the freed space ids in reservation order.
pub fn expire_reservations(state: &mut GarageState) -> Vec<String> {
    let now = state.current_time;
    let mut freed = Vec::new();

    for reservation in state.reservations_mut() {
        if reservation.is_active() && reservation.end_time() <= now && reservation.complete().is_ok() {
            freed.push(reservation.space_id().to_string());
        }
    }

    for space_id in &freed {
        debug!(space_id = %space_id, time = now, "reservation expired");
        state.log_event(EventKind::Departure, format!("{} departed (time expired)", space_id));
    }

    freed
}

/// Full auto-clearing pass: expiry, then stochastic departures
///
/// Returns every space id freed this call.
pub fn run_auto_clearing<R: RandomSource>(
    state: &mut GarageState,
    settings: &Settings,
    rng: &mut R,
) -> Vec<String> {
    let mut freed = expire_reservations(state);

    let now = state.current_time;
    let phase = settings.event_window().phase(now);
    let rate = departure_rate(phase, &settings.simulation);
    let kind = departure_kind(phase);

    let mut departed: Vec<(String, f64)> = Vec::new();
    for reservation in state.reservations_mut() {
        if !(reservation.is_simulated() && reservation.covers(now)) {
            continue;
        }
        if rng.chance(rate) && reservation.complete().is_ok() {
            departed.push((
                reservation.space_id().to_string(),
                reservation.remaining_hours(now),
            ));
        }
    }

    for (space_id, remaining) in departed {
        debug!(
            space_id = %space_id,
            remaining_hours = remaining,
            kind = kind.as_str(),
            "simulated car left early"
        );
        let details = match kind {
            EventKind::PostGameDeparture => {
                format!("{} left after the game ({:.1}hr remaining)", space_id, remaining)
            }
            _ => format!("{} left early ({:.1}hr remaining)", space_id, remaining),
        };
        state.log_event(kind, details);
        freed.push(space_id);
    }

    freed
}
