//! Pricing engine
//!
//! Three layers, applied in order:
//!
//! 1. **Base price** by spot type
//! 2. **Context multipliers**: occupancy, time to event, demand forecast,
//!    location (zone) and the flat event premium
//! 3. **Elasticity adjustment** by segment, see [`elasticity`]
//!
//! The result is clamped to the configured floor and ceiling. Pricing never
//! mutates state; it reads the live reservation list only to measure
//! occupancy at the queried time.

pub mod elasticity;

use crate::config::Settings;
use crate::core::interpolate::{interpolate, round_to};
use crate::models::{GarageState, Space};
use serde::{Deserialize, Serialize};

/// Every factor behind a quoted price
///
/// Multipliers are rounded to 4 decimals and prices to cents for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    pub final_price: f64,
    pub base_price: f64,
    pub context_price: f64,
    pub occupancy_multiplier: f64,
    pub time_multiplier: f64,
    pub demand_multiplier: f64,
    pub location_multiplier: f64,
    pub event_multiplier: f64,
    pub elasticity: f64,
    pub elasticity_adjustment: f64,
    /// One-line explanation of the elasticity decision
    pub optimization_note: String,
}

/// Price a space at `time`
///
/// `lead_time` is the number of hours between booking and the event, or
/// `None` when no booking timing applies (simulated demand, display).
///
/// # Example
/// ```
/// use garage_pricing_core::config::Settings;
/// use garage_pricing_core::models::{GarageState, Space, SpotType, Zone};
/// use garage_pricing_core::pricing::calculate_price;
///
/// let settings = Settings::default();
/// let space = Space::new(5, 5, SpotType::Standard, Zone::B, 5.0);
/// let state = GarageState::new(vec![space.clone()], 6.0, 100);
///
/// let quote = calculate_price(&space, 11.0, &state, None, &settings);
/// assert_eq!(quote.time_multiplier, 0.7);
/// assert_eq!(quote.elasticity_adjustment, 1.0);
/// assert!(quote.optimization_note.contains("unit"));
/// ```
pub fn calculate_price(
    space: &Space,
    time: f64,
    state: &GarageState,
    lead_time: Option<f64>,
    settings: &Settings,
) -> PriceResult {
    let config = &settings.pricing;

    // Layer 1
    let base_price = config.base_prices.get(space.spot_type());

    // Layer 2
    let occupancy_multiplier = occupancy_multiplier(state, time, settings);
    let time_multiplier = time_multiplier(time, settings);
    let demand_multiplier = settings.forecast.demand_factor(time);
    let location_multiplier = config.location_multipliers.get(space.zone());
    let event_multiplier = config.event_multiplier;

    let context_price = base_price
        * occupancy_multiplier
        * time_multiplier
        * demand_multiplier
        * location_multiplier
        * event_multiplier;

    // Layer 3
    let decision = elasticity::decide(elasticity::effective_elasticity(space, lead_time, config));
    let raw_price = context_price * decision.adjustment;

    // Guardrails
    let final_price = raw_price.clamp(config.price_floor, config.price_ceiling);

    PriceResult {
        final_price: round_to(final_price, 2),
        base_price,
        context_price: round_to(context_price, 2),
        occupancy_multiplier: round_to(occupancy_multiplier, 4),
        time_multiplier: round_to(time_multiplier, 4),
        demand_multiplier: round_to(demand_multiplier, 4),
        location_multiplier,
        event_multiplier,
        elasticity: round_to(decision.elasticity, 4),
        elasticity_adjustment: round_to(decision.adjustment, 4),
        optimization_note: decision.note,
    }
}

/// Occupancy → multiplier through the occupancy curve
pub fn occupancy_multiplier(state: &GarageState, time: f64, settings: &Settings) -> f64 {
    interpolate(state.occupancy_rate(time), &settings.pricing.occupancy_multipliers)
}

/// Signed hours before the event → multiplier through the time curve
pub fn time_multiplier(time: f64, settings: &Settings) -> f64 {
    let hours_before_event = settings.event_window().hours_before_start(time);
    interpolate(hours_before_event, &settings.pricing.time_multipliers)
}

/// Lead time for a booking made at `time`
pub fn booking_lead_time(time: f64, settings: &Settings) -> f64 {
    settings.event_window().hours_before_start(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingOrigin, Reservation, SpotType, Zone};

    fn grid(n: usize) -> GarageState {
        let spaces = (0..n)
            .map(|i| Space::new(i / 10, i % 10, SpotType::Standard, Zone::B, 1.0))
            .collect();
        GarageState::new(spaces, 6.0, 100)
    }

    fn fill(state: &mut GarageState, count: usize, start: f64, hours: f64) {
        for i in 0..count {
            let space_id = Space::id_for(i / 10, i % 10);
            state.add_reservation(Reservation::new(
                format!("fill-{}", i),
                space_id,
                start,
                hours,
                10.0,
                BookingOrigin::Simulated,
            ));
        }
    }

    #[test]
    fn test_time_multiplier_curve() {
        let settings = Settings::default();
        assert_eq!(time_multiplier(11.0, &settings), 0.7);
        assert_eq!(time_multiplier(19.0, &settings), 2.5);
        assert_eq!(time_multiplier(20.0, &settings), 1.5);
        assert_eq!(time_multiplier(2.0, &settings), 0.5);
        assert_eq!(time_multiplier(23.5, &settings), 0.8);
    }

    #[test]
    fn test_occupancy_multiplier_breakpoint() {
        let settings = Settings::default();
        let mut state = grid(100);
        fill(&mut state, 70, 10.0, 4.0);
        assert_eq!(occupancy_multiplier(&state, 11.0, &settings), 1.5);
        // flat below half full
        let mut half = grid(100);
        fill(&mut half, 40, 10.0, 4.0);
        assert_eq!(occupancy_multiplier(&half, 11.0, &settings), 1.0);
    }

    #[test]
    fn test_context_price_composition() {
        let settings = Settings::default();
        let state = grid(10);
        let space = Space::new(0, 0, SpotType::Standard, Zone::B, 1.0);

        // 10 × 1.0 × 0.7 × 0.20 × 1.0 × 2.0 = 2.8 → floored to 5.0
        let quote = calculate_price(&space, 11.0, &state, None, &settings);
        assert_eq!(quote.context_price, 2.8);
        assert_eq!(quote.final_price, 5.0);
    }

    #[test]
    fn test_lead_time() {
        let settings = Settings::default();
        assert_eq!(booking_lead_time(18.5, &settings), 0.5);
        assert_eq!(booking_lead_time(20.0, &settings), -1.0);
    }
}
