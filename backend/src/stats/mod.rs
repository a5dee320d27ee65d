//! Read-only statistics over a garage state
//!
//! Nothing here mutates state. Revenue counts every reservation ever made,
//! whatever its status: a car that left early still paid for its booking.

use crate::core::interpolate::round_to;
use crate::models::GarageState;
use serde::{Deserialize, Serialize};

/// Whole-day summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub total_spaces: usize,
    /// Spaces covered by an active reservation at the current time
    pub occupied_count: usize,
    pub occupancy_rate: f64,
    pub sim_bookings: usize,
    pub manual_bookings: usize,
    pub total_bookings: usize,
    pub total_revenue: f64,
    /// Mean locked $/hr over all reservations (0 when there are none)
    pub avg_price: f64,
}

/// Live dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_revenue: f64,
    pub occupancy_rate: f64,
    pub occupancy_count: usize,
    pub total_spaces: usize,
    /// Mean locked $/hr of bookings starting in the current clock hour
    pub avg_price_this_hour: f64,
    pub bookings_this_hour: usize,
}

/// Summarise bookings, revenue and occupancy
///
/// # Example
/// ```
/// use garage_pricing_core::models::{GarageState, Space, SpotType, Zone};
/// use garage_pricing_core::stats::compute_stats;
///
/// let state = GarageState::new(vec![Space::new(0, 0, SpotType::Standard, Zone::B, 1.0)], 6.0, 10);
/// let stats = compute_stats(&state);
/// assert_eq!(stats.total_bookings, 0);
/// assert_eq!(stats.avg_price, 0.0);
/// ```
pub fn compute_stats(state: &GarageState) -> SimulationStats {
    let now = state.current_time;
    let reservations = state.reservations();

    let sim_bookings = reservations.iter().filter(|r| r.is_simulated()).count();
    let total_bookings = reservations.len();
    let total_revenue: f64 = reservations.iter().map(|r| r.total_cost()).sum();
    let avg_price = mean(reservations.iter().map(|r| r.price_locked()));

    SimulationStats {
        total_spaces: state.total_spaces(),
        occupied_count: state.occupied_count(now),
        occupancy_rate: round_to(state.occupancy_rate(now), 4),
        sim_bookings,
        manual_bookings: total_bookings - sim_bookings,
        total_bookings,
        total_revenue: round_to(total_revenue, 2),
        avg_price: round_to(avg_price, 2),
    }
}

/// Dashboard figures at the state's current time
pub fn dashboard_metrics(state: &GarageState) -> DashboardMetrics {
    let now = state.current_time;
    let hour_start = now.floor();
    let hour_end = hour_start + 1.0;

    let this_hour: Vec<f64> = state
        .reservations()
        .iter()
        .filter(|r| r.start_time() >= hour_start && r.start_time() < hour_end)
        .map(|r| r.price_locked())
        .collect();

    let total_revenue: f64 = state.reservations().iter().map(|r| r.total_cost()).sum();

    DashboardMetrics {
        total_revenue: round_to(total_revenue, 2),
        occupancy_rate: round_to(state.occupancy_rate(now), 4),
        occupancy_count: state.occupied_count(now),
        total_spaces: state.total_spaces(),
        avg_price_this_hour: round_to(mean(this_hour.iter().copied()), 2),
        bookings_this_hour: this_hour.len(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
