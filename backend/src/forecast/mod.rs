//! Occupancy and demand forecast curves
//!
//! Two static hour-of-day tables drive both engines:
//!
//! - **Demand forecast** (0.0–1.0, peaks at the event hour): a pricing
//!   multiplier and the base intensity of auto-booking.
//! - **Target occupancy**: the planned fill curve the simulation steers
//!   toward.
//!
//! Demand is read between the two bracketing whole hours; hours missing from
//! the table read as the curve's fallback value. Target occupancy is
//! evaluated through the breakpoint interpolator and clamps at both ends.

use crate::core::interpolate::interpolate_sorted;
use serde::{Deserialize, Serialize};

/// Fallback demand for hours outside the forecast table
pub const DEFAULT_DEMAND_FALLBACK: f64 = 0.1;

/// A value per whole hour of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyCurve {
    /// `(hour, value)` pairs
    pub points: Vec<(u32, f64)>,

    /// Value for hours not present in `points`
    #[serde(default = "default_fallback")]
    pub fallback: f64,
}

fn default_fallback() -> f64 {
    DEFAULT_DEMAND_FALLBACK
}

impl HourlyCurve {
    pub fn new(points: Vec<(u32, f64)>, fallback: f64) -> Self {
        Self { points, fallback }
    }

    /// Table value for a whole hour, or the fallback
    pub fn at_hour(&self, hour: u32) -> f64 {
        self.points
            .iter()
            .find(|(h, _)| *h == hour)
            .map(|(_, v)| *v)
            .unwrap_or(self.fallback)
    }

    /// Linear blend between `floor(time)` and `floor(time) + 1`
    ///
    /// # Example
    /// ```
    /// use garage_pricing_core::forecast::HourlyCurve;
    ///
    /// let curve = HourlyCurve::new(vec![(14, 0.4), (15, 0.5)], 0.1);
    /// assert!((curve.blended(14.5) - 0.45).abs() < 1e-12);
    /// assert!((curve.blended(15.5) - 0.3).abs() < 1e-12);
    /// ```
    pub fn blended(&self, time: f64) -> f64 {
        if !time.is_finite() || time < 0.0 {
            return self.fallback;
        }
        let hour = time.floor();
        let fraction = time - hour;
        let now = self.at_hour(hour as u32);
        let next = self.at_hour(hour as u32 + 1);
        now + fraction * (next - now)
    }

    /// The table as interpolator breakpoints, ascending by hour
    pub fn breakpoints(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|&(h, v)| (h as f64, v))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    /// Interpolated through the breakpoints, clamped outside the table
    pub fn interpolated(&self, time: f64) -> f64 {
        interpolate_sorted(time, &self.breakpoints())
    }
}

/// Both forecast tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub demand: HourlyCurve,
    pub target_occupancy: HourlyCurve,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            demand: default_demand_curve(),
            target_occupancy: default_target_occupancy_curve(),
        }
    }
}

impl ForecastConfig {
    /// Demand factor at a decimal hour
    pub fn demand_factor(&self, time: f64) -> f64 {
        self.demand.blended(time)
    }

    /// Planned occupancy fraction at a decimal hour
    pub fn target_occupancy(&self, time: f64) -> f64 {
        self.target_occupancy.interpolated(time)
    }
}

/// Hourly demand, peaking at the 7 PM event
pub fn default_demand_curve() -> HourlyCurve {
    HourlyCurve::new(
        vec![
            (6, 0.05),
            (7, 0.08),
            (8, 0.10),
            (9, 0.12),
            (10, 0.15),
            (11, 0.20),
            (12, 0.25),
            (13, 0.30),
            (14, 0.40),
            (15, 0.50),
            (16, 0.60),
            (17, 0.75),
            (18, 0.90),
            (19, 1.00),
            (20, 0.70),
            (21, 0.40),
            (22, 0.20),
            (23, 0.10),
        ],
        DEFAULT_DEMAND_FALLBACK,
    )
}

/// Planned fill: near-empty at opening, 95% through the event, emptying after
pub fn default_target_occupancy_curve() -> HourlyCurve {
    HourlyCurve::new(
        vec![
            (6, 0.02),
            (7, 0.05),
            (8, 0.08),
            (9, 0.12),
            (10, 0.18),
            (11, 0.25),
            (12, 0.32),
            (13, 0.40),
            (14, 0.50),
            (15, 0.60),
            (16, 0.70),
            (17, 0.80),
            (18, 0.90),
            (19, 0.95),
            (20, 0.95),
            (21, 0.92),
            (22, 0.60),
            (23, 0.25),
        ],
        0.0,
    )
}
