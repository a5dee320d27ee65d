//! Parking space model
//!
//! A space is created once by the layout generator and never changes
//! afterwards. Spot type and zone are closed enums so every pricing table
//! keyed by them is exhaustive by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of vehicle bay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotType {
    Standard,
    Ev,
    Motorcycle,
}

impl SpotType {
    pub const ALL: [SpotType; 3] = [SpotType::Standard, SpotType::Ev, SpotType::Motorcycle];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotType::Standard => "STANDARD",
            SpotType::Ev => "EV",
            SpotType::Motorcycle => "MOTORCYCLE",
        }
    }
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance band from the entrance: A (near), B (middle), C (far)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::A, Zone::B, Zone::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::A => "A",
            Zone::B => "B",
            Zone::C => "C",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bay in the garage grid
///
/// # Example
/// ```
/// use garage_pricing_core::models::{Space, SpotType, Zone};
///
/// let space = Space::new(0, 1, SpotType::Ev, Zone::A, 4.0);
/// assert_eq!(space.id(), "R0C1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    id: String,
    spot_type: SpotType,
    zone: Zone,
    row: usize,
    col: usize,
    distance_to_entrance: f64,
}

impl Space {
    /// Create a space; the id is derived from its grid cell as `R{row}C{col}`
    pub fn new(row: usize, col: usize, spot_type: SpotType, zone: Zone, distance_to_entrance: f64) -> Self {
        Self {
            id: Self::id_for(row, col),
            spot_type,
            zone,
            row,
            col,
            distance_to_entrance,
        }
    }

    pub fn id_for(row: usize, col: usize) -> String {
        format!("R{}C{}", row, col)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn spot_type(&self) -> SpotType {
        self.spot_type
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn distance_to_entrance(&self) -> f64 {
        self.distance_to_entrance
    }
}
