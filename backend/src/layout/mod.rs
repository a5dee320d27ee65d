//! Garage layout generation
//!
//! Deterministically turns grid dimensions into one [`Space`] per cell.
//!
//! # Axis convention
//!
//! The entrance sits at row 0, centre column (`cols / 2`). Zones are bands of
//! **rows**: the first `near_fraction` of rows is zone A, the next
//! `middle_fraction` is zone B, the remainder zone C. Specialty bays are
//! carved out of zone A: the leftmost `ev_columns` columns are EV, the
//! rightmost `motorcycle_columns` columns are motorcycle. Everything else is
//! standard.
//!
//! With the default 10×10 grid this gives 30 / 40 / 30 spaces in A / B / C,
//! 6 EV, 6 motorcycle and 88 standard bays.

use crate::config::GarageConfig;
use crate::core::interpolate::round_to;
use crate::models::{Space, SpotType, Zone};

/// Decimal places kept for distance-to-entrance
pub const DISTANCE_DECIMALS: i32 = 2;

/// Entrance coordinate `(row, col)` for a grid
pub fn entrance(config: &GarageConfig) -> (f64, f64) {
    (0.0, config.cols as f64 / 2.0)
}

/// Zone of a row
pub fn zone_for_row(row: usize, config: &GarageConfig) -> Zone {
    let rows = config.rows as f64;
    let r = row as f64;
    if r < rows * config.near_fraction {
        Zone::A
    } else if r < rows * (config.near_fraction + config.middle_fraction) {
        Zone::B
    } else {
        Zone::C
    }
}

/// Spot type of a cell given its zone
pub fn spot_type_for(col: usize, zone: Zone, config: &GarageConfig) -> SpotType {
    if zone != Zone::A {
        return SpotType::Standard;
    }
    if col < config.ev_columns {
        SpotType::Ev
    } else if col + config.motorcycle_columns >= config.cols {
        SpotType::Motorcycle
    } else {
        SpotType::Standard
    }
}

/// Euclidean distance from a cell to the entrance, rounded for display
pub fn distance_to_entrance(row: usize, col: usize, config: &GarageConfig) -> f64 {
    let (entrance_row, entrance_col) = entrance(config);
    let dr = row as f64 - entrance_row;
    let dc = col as f64 - entrance_col;
    round_to((dr * dr + dc * dc).sqrt(), DISTANCE_DECIMALS)
}

/// Generate every space of the grid in row-major order
///
/// # Example
/// ```
/// use garage_pricing_core::config::GarageConfig;
/// use garage_pricing_core::layout::generate_spaces;
///
/// let spaces = generate_spaces(&GarageConfig::default());
/// assert_eq!(spaces.len(), 100);
/// assert_eq!(spaces[0].id(), "R0C0");
/// ```
pub fn generate_spaces(config: &GarageConfig) -> Vec<Space> {
    let mut spaces = Vec::with_capacity(config.rows * config.cols);
    for row in 0..config.rows {
        let zone = zone_for_row(row, config);
        for col in 0..config.cols {
            spaces.push(Space::new(
                row,
                col,
                spot_type_for(col, zone, config),
                zone,
                distance_to_entrance(row, col, config),
            ));
        }
    }
    spaces
}
