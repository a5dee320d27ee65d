//! Auto-booking: synthetic arrivals steering occupancy toward the target curve.
//!
//! Each tick the generator compares current occupancy with the planned
//! occupancy for the time of day. The **occupancy gap** (target − current)
//! decides both how many booking attempts are made this tick and how likely
//! each one is to succeed:
//!
//! ```text
//! p = base_rate × demand(t) × gap_modifier        (capped below 1.0)
//! gap_modifier = 1 + gap × gain      when behind target
//!              = damping             when ahead of target
//! attempts     = 1 + ⌊gap / step⌋    (capped) when behind, else 1
//! ```
//!
//! While the event is running and the garage is behind target, `p` never
//! drops below the event-window floor.
//!
//! A successful attempt draws a duration from the configured weights, then
//! picks a space free for that whole stay by inverse-price weighting (cheaper
//! is proportionally more likely) and locks the quoted price into a
//! simulated reservation. Availability and
//! the gap are re-derived after every booking.
//!
//! All randomness goes through the injected [`RandomSource`]; same seed and
//! same state → same bookings.

use crate::config::Settings;
use crate::models::{BookingOrigin, EventKind, GarageState, Reservation, Space};
use crate::pricing::{calculate_price, PriceResult};
use crate::rng::RandomSource;
use std::collections::HashSet;
use tracing::debug;

/// How aggressively to book during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingPlan {
    pub current_occupancy: f64,
    pub target_occupancy: f64,
    /// target − current
    pub gap: f64,
    pub demand: f64,
    pub attempts: usize,
    pub probability: f64,
}

/// Derive this tick's booking plan from the state at its current time
pub fn booking_plan(state: &GarageState, settings: &Settings) -> BookingPlan {
    let time = state.current_time;
    let current_occupancy = state.occupancy_rate(time);
    let target_occupancy = settings.forecast.target_occupancy(time);
    let gap = target_occupancy - current_occupancy;
    let demand = settings.forecast.demand_factor(time);
    let in_event = settings.event_window().contains(time);

    BookingPlan {
        current_occupancy,
        target_occupancy,
        gap,
        demand,
        attempts: burst_attempts(gap, settings),
        probability: booking_probability(demand, gap, in_event, settings),
    }
}

/// Per-attempt success probability
pub fn booking_probability(demand: f64, gap: f64, in_event_window: bool, settings: &Settings) -> f64 {
    let sim = &settings.simulation;
    let mut probability = sim.base_booking_rate * demand;

    if gap > 0.0 {
        probability *= 1.0 + gap * sim.gap_gain;
        if in_event_window {
            probability = probability.max(sim.event_window_floor);
        }
    } else if gap < 0.0 {
        probability *= sim.ahead_of_target_damping;
    }

    probability.clamp(0.0, sim.max_booking_probability)
}

/// Attempts allowed this tick: one, plus one per `burst_gap_step` of gap
pub fn burst_attempts(gap: f64, settings: &Settings) -> usize {
    let sim = &settings.simulation;
    if gap <= 0.0 {
        return 1;
    }
    let extra = (gap / sim.burst_gap_step).floor() as usize;
    (1 + extra).min(sim.max_burst_attempts)
}

/// Pick a space with weight `1 / (price + epsilon)`
///
/// Returns the chosen space together with the price it was weighted by, so
/// the caller can lock exactly that quote.
pub fn select_weighted_space<'a, R: RandomSource>(
    available: &[&'a Space],
    state: &GarageState,
    settings: &Settings,
    rng: &mut R,
) -> Option<(&'a Space, PriceResult)> {
    if available.is_empty() {
        return None;
    }

    let mut quotes: Vec<PriceResult> = available
        .iter()
        .map(|space| calculate_price(space, state.current_time, state, None, settings))
        .collect();

    let weights: Vec<f64> = quotes
        .iter()
        .map(|q| 1.0 / (q.final_price + settings.simulation.price_epsilon))
        .collect();

    let index = rng.weighted_index(&weights)?;
    Some((available[index], quotes.swap_remove(index)))
}

/// Pick a stay length in whole hours
///
/// Durations that would run past the end of day are never offered. Near or
/// during the event, durations lasting through the event's end are weighted
/// up. Returns `None` when not even the shortest duration fits.
pub fn select_duration<R: RandomSource>(time: f64, settings: &Settings, rng: &mut R) -> Option<u32> {
    let sim = &settings.simulation;
    let remaining = settings.clock().remaining_hours(time);
    let window = settings.event_window();
    let near_event = time >= window.start_hour - sim.event_lookahead_hours && time < window.end_hour;

    let candidates: Vec<(u32, f64)> = sim
        .duration_weights
        .iter()
        .filter(|(hours, _)| f64::from(*hours) <= remaining)
        .map(|&(hours, weight)| {
            if near_event && time + f64::from(hours) >= window.end_hour {
                (hours, weight * sim.event_duration_boost)
            } else {
                (hours, weight)
            }
        })
        .collect();

    let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
    let index = rng.weighted_index(&weights)?;
    Some(candidates[index].0)
}

/// Run the auto-booking step for the state's current time
///
/// Returns the reservations created this tick.
pub fn run_auto_booking<R: RandomSource>(
    state: &mut GarageState,
    held: &HashSet<String>,
    settings: &Settings,
    rng: &mut R,
) -> Vec<Reservation> {
    let mut new_reservations = Vec::new();
    let mut plan = booking_plan(state, settings);
    let mut attempt = 0;

    while attempt < plan.attempts {
        attempt += 1;

        let start = state.current_time;
        let shortest = start + settings.garage.min_duration_hours;
        if state.available_spaces(start, shortest, held).is_empty() {
            break;
        }
        if !rng.chance(plan.probability) {
            continue;
        }

        let Some(duration) = select_duration(start, settings, rng) else {
            break;
        };

        let selection = {
            let available = state.available_spaces(start, start + f64::from(duration), held);
            select_weighted_space(&available, state, settings, rng)
                .map(|(space, quote)| (space.clone(), quote))
        };

        // nothing free for the whole stay; a shorter draw may still fit
        let Some((space, quote)) = selection else {
            continue;
        };

        let id = state.next_sim_reservation_id();
        let reservation = Reservation::new(
            id,
            space.id().to_string(),
            start,
            f64::from(duration),
            quote.final_price,
            BookingOrigin::Simulated,
        );

        debug!(
            reservation_id = reservation.id(),
            space_id = space.id(),
            duration_hours = duration,
            price = quote.final_price,
            gap = plan.gap,
            "auto-booked space"
        );

        state.log_event(
            EventKind::SimBooking,
            format!(
                "Auto-booked {} ({}) for {}hr at ${:.2}/hr",
                space.id(),
                space.spot_type(),
                duration,
                quote.final_price
            ),
        );
        state.add_reservation(reservation.clone());
        new_reservations.push(reservation);

        plan = booking_plan(state, settings);
    }

    new_reservations
}
