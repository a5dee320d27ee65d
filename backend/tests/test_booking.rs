//! Manual Booking Tests
//!
//! Quote, book and cancel through `GarageSimulator`, plus playback control.
//!
//! Critical invariants tested:
//! - Every rejection carries a readable reason and leaves state untouched
//! - Occupied and held spaces are distinguished
//! - The quoted price is the price locked into the reservation
//! - Status transitions are one-way

use garage_pricing_core::config::Settings;
use garage_pricing_core::orchestrator::GarageSimulator;
use garage_pricing_core::{BookingError, EventKind, ReservationStatus};
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

fn sim_at(time: f64) -> GarageSimulator {
    let mut sim = GarageSimulator::new(Settings::default()).unwrap();
    sim.set_time(time).unwrap();
    sim
}

fn no_holds() -> HashSet<String> {
    HashSet::new()
}

fn holds(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Quote
// ============================================================================

#[test]
fn test_quote_uses_booking_lead_time() {
    let sim = sim_at(11.0);
    let quote = sim.quote("R5C5", &no_holds()).unwrap();

    // 8 hours ahead of the event: advance-booking elasticity
    assert_eq!(quote.elasticity, 1.2);
    assert!(quote.optimization_note.contains("elastic segment"));
}

#[test]
fn test_quote_unknown_space() {
    let sim = sim_at(11.0);
    let err = sim.quote("R99C99", &no_holds()).unwrap_err();
    assert_eq!(err, BookingError::SpaceNotFound("R99C99".to_string()));
    assert_eq!(err.to_string(), "Space R99C99 not found");
}

#[test]
fn test_quote_held_vs_occupied() {
    let mut sim = sim_at(12.0);
    let price = sim.quote("R4C4", &no_holds()).unwrap().final_price;
    sim.book("R4C4", 2.0, price, &no_holds()).unwrap();

    assert_eq!(
        sim.quote("R4C4", &no_holds()).unwrap_err(),
        BookingError::SpaceOccupied("R4C4".to_string())
    );
    assert_eq!(
        sim.quote("R4C5", &holds(&["R4C5"])).unwrap_err(),
        BookingError::SpaceHeld("R4C5".to_string())
    );
}

#[test]
fn test_quote_rejects_space_booked_later_in_shortest_stay() {
    let mut sim = sim_at(14.0);
    sim.book("R4C4", 1.0, 10.0, &no_holds()).unwrap();
    sim.book("R4C5", 1.0, 10.0, &no_holds()).unwrap();

    // from 13.0 a 1h stay ends exactly when the booking starts
    sim.set_time(13.0).unwrap();
    assert!(sim.quote("R4C5", &no_holds()).is_ok());

    // from 13.5 it would run into it
    sim.set_time(13.5).unwrap();
    assert_eq!(
        sim.quote("R4C4", &no_holds()).unwrap_err(),
        BookingError::SpaceOccupied("R4C4".to_string())
    );
}

// ============================================================================
// Book
// ============================================================================

#[test]
fn test_book_locks_quoted_price_and_logs() {
    let mut sim = sim_at(14.0);
    let quote = sim.quote("R6C2", &no_holds()).unwrap();

    let reservation = sim.book("R6C2", 3.0, quote.final_price, &no_holds()).unwrap();

    assert_eq!(reservation.price_locked(), quote.final_price);
    assert_eq!(reservation.start_time(), 14.0);
    assert_eq!(reservation.end_time(), 17.0);
    assert!(!reservation.is_simulated());
    assert_eq!(sim.stats().manual_bookings, 1);

    let entry = sim.state().event_log().last().unwrap();
    assert_eq!(entry.event_type, EventKind::Booking);
    assert!(entry.details.starts_with("Manual booking: R6C2 for 3hr"));
}

#[test]
fn test_book_rejects_bad_duration_without_mutation() {
    let mut sim = sim_at(14.0);

    for duration in [0.5, 4.5, 0.0, f64::INFINITY] {
        let err = sim.book("R6C2", duration, 10.0, &no_holds()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDuration { .. }));
    }
    let err = sim.book("R6C2", 5.0, 10.0, &no_holds()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid duration: 5. Must be 1-4 hours.");

    assert!(sim.state().reservations().is_empty());
    assert!(sim.state().event_log().is_empty());
}

#[test]
fn test_book_rejects_bad_price() {
    let mut sim = sim_at(14.0);
    assert!(matches!(
        sim.book("R6C2", 2.0, -1.0, &no_holds()),
        Err(BookingError::InvalidPrice(_))
    ));
    assert!(matches!(
        sim.book("R6C2", 2.0, f64::NAN, &no_holds()),
        Err(BookingError::InvalidPrice(_))
    ));
}

#[test]
fn test_book_rejects_held_space() {
    let mut sim = sim_at(14.0);
    let err = sim.book("R6C2", 2.0, 10.0, &holds(&["R6C2"])).unwrap_err();
    assert_eq!(err.to_string(), "Space R6C2 is already held");
}

#[test]
fn test_book_never_double_books() {
    let mut sim = sim_at(14.0);
    sim.book("R6C2", 2.0, 10.0, &no_holds()).unwrap();

    let err = sim.book("R6C2", 1.0, 10.0, &no_holds()).unwrap_err();
    assert_eq!(err, BookingError::SpaceOccupied("R6C2".to_string()));
    assert_eq!(sim.state().reservations().len(), 1);
}

#[test]
fn test_book_rejects_overlap_with_future_reservation() {
    let mut sim = sim_at(14.0);
    sim.book("R6C2", 1.0, 10.0, &no_holds()).unwrap();
    sim.set_time(13.5).unwrap();

    // [13.5, 15.5) overlaps the booking at [14, 15)
    let err = sim.book("R6C2", 2.0, 10.0, &no_holds()).unwrap_err();
    assert_eq!(err, BookingError::SpaceOccupied("R6C2".to_string()));
}

#[test]
fn test_space_rebookable_after_expiry() {
    let mut sim = sim_at(14.0);
    sim.book("R6C2", 1.0, 10.0, &no_holds()).unwrap();

    sim.advance_to(15.0, &no_holds()).unwrap();
    assert_eq!(sim.state().reservations()[0].status(), ReservationStatus::Completed);
    assert!(sim.book("R6C2", 1.0, 10.0, &no_holds()).is_ok());
}

// ============================================================================
// Cancel
// ============================================================================

#[test]
fn test_cancel_is_one_way() {
    let mut sim = sim_at(14.0);
    let id = sim.book("R6C2", 2.0, 10.0, &no_holds()).unwrap().id().to_string();

    let cancelled = sim.cancel(&id).unwrap();
    assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
    assert_eq!(sim.state().event_log().last().unwrap().event_type, EventKind::Cancellation);

    let err = sim.cancel(&id).unwrap_err();
    assert_eq!(
        err,
        BookingError::ReservationNotActive {
            id: id.clone(),
            status: ReservationStatus::Cancelled
        }
    );

    // cancelled space is free again, revenue is kept
    assert!(sim.quote("R6C2", &no_holds()).is_ok());
    assert_eq!(sim.stats().total_revenue, 20.0);
}

#[test]
fn test_cancel_unknown_reservation() {
    let mut sim = sim_at(14.0);
    assert_eq!(
        sim.cancel("nope").unwrap_err(),
        BookingError::ReservationNotFound("nope".to_string())
    );
}

#[test]
fn test_completed_cannot_be_cancelled() {
    let mut sim = sim_at(14.0);
    let id = sim.book("R6C2", 1.0, 10.0, &no_holds()).unwrap().id().to_string();
    sim.advance_to(15.5, &no_holds()).unwrap();

    assert!(matches!(
        sim.cancel(&id),
        Err(BookingError::ReservationNotActive {
            status: ReservationStatus::Completed,
            ..
        })
    ));
}

// ============================================================================
// Playback control
// ============================================================================

#[test]
fn test_reset_restores_start_of_day() {
    let mut sim = sim_at(14.0);
    sim.book("R6C2", 1.0, 10.0, &no_holds()).unwrap();
    sim.set_playing(true);

    sim.reset(true);

    assert_eq!(sim.current_time(), 6.0);
    assert!(sim.state().reservations().is_empty());
    assert!(sim.state().simulation_enabled);
    assert!(!sim.state().is_playing);
}

#[test]
fn test_scrub_past_day_end_clamps() {
    let mut sim = sim_at(14.0);
    let end = sim.settings().garage.day_end_hour;
    assert_eq!(sim.set_time(30.0).unwrap(), end);
    assert!(sim.is_end_of_day());
}
