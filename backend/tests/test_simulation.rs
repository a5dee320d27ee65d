//! Simulation Driver Tests
//!
//! Auto-clearing and auto-booking through `run_simulation_tick` and the
//! `GarageSimulator` tick loop.
//!
//! Critical invariants tested:
//! - Clearing runs before booking within a tick
//! - Held spaces are never auto-booked
//! - Manual reservations only ever expire naturally
//! - Auto-bookings never run past end of day
//! - Repeated clearing of a completed reservation is a no-op
//! - Replaying hours after a backwards scrub never double-books a space

use garage_pricing_core::config::Settings;
use garage_pricing_core::departures::run_auto_clearing;
use garage_pricing_core::orchestrator::{
    initialize_garage, run_simulation_tick, validate_snapshot, GarageSimulator,
};
use garage_pricing_core::rng::{RandomSource, RngManager};
use garage_pricing_core::{BookingOrigin, EventKind, GarageState, Reservation, ReservationStatus};
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

/// Replays a fixed draw forever
struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

fn no_holds() -> HashSet<String> {
    HashSet::new()
}

fn book_all(state: &mut GarageState, start: f64, hours: f64, origin: BookingOrigin) {
    let ids: Vec<String> = state.spaces().iter().map(|s| s.id().to_string()).collect();
    for (i, space_id) in ids.into_iter().enumerate() {
        state.add_reservation(Reservation::new(format!("r{}", i), space_id, start, hours, 10.0, origin));
    }
}

/// Pairs of active reservations on the same space whose intervals intersect
fn overlapping_pairs(state: &GarageState) -> Vec<(String, String)> {
    let active: Vec<&Reservation> = state.reservations().iter().filter(|r| r.is_active()).collect();
    let mut pairs = Vec::new();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.space_id() == b.space_id() && b.overlaps(a.start_time(), a.end_time()) {
                pairs.push((a.id().to_string(), b.id().to_string()));
            }
        }
    }
    pairs
}

fn enabled_sim(seed: u64) -> GarageSimulator {
    let mut settings = Settings::default();
    settings.simulation.rng_seed = seed;
    let mut sim = GarageSimulator::new(settings).unwrap();
    sim.set_simulation_enabled(true);
    sim
}

// ============================================================================
// Single tick
// ============================================================================

#[test]
fn test_tick_with_no_available_spaces_books_nothing() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 15.0;
    book_all(&mut state, 14.0, 4.0, BookingOrigin::Manual);

    let result = run_simulation_tick(&mut state, &no_holds(), &settings, &mut Fixed(0.0));

    assert!(result.new_bookings.is_empty());
    assert!(result.cleared_spaces.is_empty());
    assert_eq!(state.reservations().len(), 100);
}

#[test]
fn test_all_held_spaces_book_nothing() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 18.0;
    let held: HashSet<String> = state.spaces().iter().map(|s| s.id().to_string()).collect();

    let result = run_simulation_tick(&mut state, &held, &settings, &mut Fixed(0.0));
    assert!(result.new_bookings.is_empty());
}

#[test]
fn test_held_space_is_never_auto_booked() {
    let mut sim = enabled_sim(7);
    let held: HashSet<String> = ["R0C5".to_string()].into_iter().collect();

    sim.advance_to(20.0, &held).unwrap();

    assert!(sim.stats().total_bookings > 0);
    assert!(sim.state().reservations().iter().all(|r| r.space_id() != "R0C5"));
    assert!(sim.state().held_space_ids().contains("R0C5"));
}

#[test]
fn test_space_cleared_and_rebooked_in_same_tick() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 18.0;
    book_all(&mut state, 16.0, 2.0, BookingOrigin::Simulated);

    // zero draw: every booking attempt succeeds
    let result = run_simulation_tick(&mut state, &no_holds(), &settings, &mut Fixed(0.0));

    assert_eq!(result.cleared_spaces.len(), 100);
    assert!(!result.new_bookings.is_empty());
    for booking in &result.new_bookings {
        assert!(result.cleared_spaces.iter().any(|id| id == booking.space_id()));
        assert!(booking.is_simulated());
        assert_eq!(booking.start_time(), 18.0);
    }
}

#[test]
fn test_burst_books_multiple_when_far_behind() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 18.0;

    // target 0.90 against an empty garage: maximum burst
    let result = run_simulation_tick(&mut state, &no_holds(), &settings, &mut Fixed(0.0));
    assert_eq!(result.new_bookings.len(), settings.simulation.max_burst_attempts);
    assert_eq!(
        state.event_log().events_of_type(EventKind::SimBooking).len(),
        settings.simulation.max_burst_attempts
    );
}

#[test]
fn test_booking_locks_quoted_price() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 14.0;

    let result = run_simulation_tick(&mut state, &no_holds(), &settings, &mut Fixed(0.0));
    let booking = &result.new_bookings[0];

    assert!(booking.price_locked() >= settings.pricing.price_floor);
    assert!(booking.price_locked() <= settings.pricing.price_ceiling);
    assert_eq!(
        booking.total_cost(),
        (booking.price_locked() * booking.duration_hours() * 100.0).round() / 100.0
    );
    let entry = state.event_log().events_of_type(EventKind::SimBooking)[0];
    assert!(entry.details.starts_with("Auto-booked"));
}

// ============================================================================
// Clearing
// ============================================================================

#[test]
fn test_clearing_completed_reservation_twice_is_noop() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.add_reservation(Reservation::new(
        "done".to_string(),
        "R1C1".to_string(),
        10.0,
        1.0,
        12.0,
        BookingOrigin::Simulated,
    ));
    state.current_time = 11.0;

    let mut rng = RngManager::new(1);
    assert_eq!(run_auto_clearing(&mut state, &settings, &mut rng), vec!["R1C1".to_string()]);
    let snapshot = state.reservations().to_vec();
    let log_len = state.event_log().len();

    assert!(run_auto_clearing(&mut state, &settings, &mut rng).is_empty());
    assert!(run_auto_clearing(&mut state, &settings, &mut rng).is_empty());
    assert_eq!(state.reservations(), snapshot.as_slice());
    assert_eq!(state.event_log().len(), log_len);
}

#[test]
fn test_manual_bookings_survive_post_event_exodus() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 22.0;
    book_all(&mut state, 21.5, 2.0, BookingOrigin::Manual);

    let cleared = run_auto_clearing(&mut state, &settings, &mut Fixed(0.0));
    assert!(cleared.is_empty());
    assert!(state.reservations().iter().all(|r| r.status() == ReservationStatus::Active));
}

#[test]
fn test_post_event_exodus_clears_simulated() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 22.0;
    book_all(&mut state, 21.5, 2.0, BookingOrigin::Simulated);

    let cleared = run_auto_clearing(&mut state, &settings, &mut Fixed(0.0));
    assert_eq!(cleared.len(), 100);
    assert_eq!(
        state.event_log().events_of_type(EventKind::PostGameDeparture).len(),
        settings.simulation.max_event_log.min(100)
    );
}

#[test]
fn test_tick_skips_spaces_booked_later_in_the_stay() {
    let settings = Settings::default();
    let mut state = initialize_garage(&settings);
    state.current_time = 18.0;
    // nothing covers 18.0, but every space is taken from 18.5
    book_all(&mut state, 18.5, 1.0, BookingOrigin::Simulated);

    let result = run_simulation_tick(&mut state, &no_holds(), &settings, &mut Fixed(0.0));

    assert!(result.new_bookings.is_empty());
    assert!(overlapping_pairs(&state).is_empty());
}

#[test]
fn test_replay_after_scrub_back_never_double_books() {
    let mut sim = enabled_sim(42);
    let held = no_holds();

    sim.advance_to(19.0, &held).unwrap();
    sim.set_time(16.0).unwrap();
    sim.advance_to(17.0, &held).unwrap();

    assert!(sim.stats().total_bookings > 0);
    assert_eq!(overlapping_pairs(sim.state()), Vec::new());
    assert!(validate_snapshot(&sim.snapshot().unwrap()).is_ok());
}

// ============================================================================
// Whole day
// ============================================================================

#[test]
fn test_full_day_tracks_target_and_respects_day_end() {
    let mut sim = enabled_sim(42);
    let held = no_holds();

    sim.advance_to(19.5, &held).unwrap();
    let peak = sim.state().occupancy_rate(sim.current_time());
    assert!(peak > 0.5, "occupancy at the event was {}", peak);

    sim.advance_to(24.0, &held).unwrap();
    assert!(sim.is_end_of_day());

    let day_end = sim.settings().garage.day_end_hour;
    for r in sim.state().reservations() {
        assert!(r.end_time() <= day_end + 1e-9, "{} ends at {}", r.id(), r.end_time());
        assert!(r.duration_hours() >= 1.0 && r.duration_hours() <= 4.0);
    }
}

#[test]
fn test_event_log_stays_bounded_over_a_day() {
    let mut sim = enabled_sim(3);
    sim.advance_to(24.0, &no_holds()).unwrap();

    let log = sim.state().event_log();
    assert!(log.len() <= sim.settings().simulation.max_event_log);
    assert_eq!(log.last().unwrap().event_type, EventKind::DayComplete);
}

#[test]
fn test_playback_speed_does_not_change_outcome() {
    let held = no_holds();

    let mut slow = enabled_sim(11);
    while !slow.is_end_of_day() {
        slow.advance_frame(&held);
    }

    let mut fast = enabled_sim(11);
    fast.set_speed(10.0).unwrap();
    while !fast.is_end_of_day() {
        fast.advance_frame(&held);
    }

    assert_eq!(slow.state().reservations(), fast.state().reservations());
    assert_eq!(slow.stats(), fast.stats());
}
