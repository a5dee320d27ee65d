//! Settings for the pricing and simulation engines
//!
//! All values have defaults and every field can be overridden from TOML:
//!
//! ```toml
//! [garage]
//! rows = 12
//! event_hour = 20.0
//!
//! [pricing]
//! price_ceiling = 60.0
//!
//! [pricing.base_prices]
//! STANDARD = 12.0
//! EV = 18.0
//! MOTORCYCLE = 6.0
//!
//! [simulation]
//! rng_seed = 7
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Tables keyed by spot type or zone are structs with one field per variant,
//! so a TOML table that omits a variant fails to parse instead of producing
//! a lookup miss at pricing time.

use crate::core::time::{EventWindow, SimClock};
use crate::error::ConfigError;
use crate::forecast::{ForecastConfig, HourlyCurve};
use crate::models::{SpotType, Zone};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/garage.toml";

/// One value per spot type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotTypeTable {
    #[serde(rename = "STANDARD")]
    pub standard: f64,
    #[serde(rename = "EV")]
    pub ev: f64,
    #[serde(rename = "MOTORCYCLE")]
    pub motorcycle: f64,
}

impl SpotTypeTable {
    pub fn get(&self, spot_type: SpotType) -> f64 {
        match spot_type {
            SpotType::Standard => self.standard,
            SpotType::Ev => self.ev,
            SpotType::Motorcycle => self.motorcycle,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.standard, self.ev, self.motorcycle]
    }
}

/// One value per zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneTable {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

impl ZoneTable {
    pub fn get(&self, zone: Zone) -> f64 {
        match zone {
            Zone::A => self.a,
            Zone::B => self.b,
            Zone::C => self.c,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// Grid geometry, event schedule and day bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarageConfig {
    pub rows: usize,
    pub cols: usize,

    /// Fraction of rows in the near band (zone A)
    pub near_fraction: f64,
    /// Fraction of rows in the middle band (zone B); the rest is zone C
    pub middle_fraction: f64,

    /// Leftmost columns of zone A that are EV bays
    pub ev_columns: usize,
    /// Rightmost columns of zone A that are motorcycle bays
    pub motorcycle_columns: usize,

    /// Event start (decimal hour)
    pub event_hour: f64,
    pub event_duration_hours: f64,

    pub day_start_hour: f64,
    pub day_end_hour: f64,

    pub min_duration_hours: f64,
    pub max_duration_hours: f64,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            near_fraction: 0.3,
            middle_fraction: 0.4,
            ev_columns: 2,
            motorcycle_columns: 2,
            event_hour: 19.0,
            event_duration_hours: 3.0,
            day_start_hour: 6.0,
            day_end_hour: 23.0 + 59.0 / 60.0,
            min_duration_hours: 1.0,
            max_duration_hours: 4.0,
        }
    }
}

impl GarageConfig {
    pub fn event_window(&self) -> EventWindow {
        EventWindow::new(self.event_hour, self.event_duration_hours)
    }
}

/// Three-layer pricing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// $/hr baseline by spot type
    pub base_prices: SpotTypeTable,

    pub elasticity_by_type: SpotTypeTable,
    pub elasticity_by_zone: ZoneTable,

    /// Applied when booking less than an hour before the event
    pub last_minute_elasticity_modifier: f64,
    /// Applied when booking more than four hours before the event
    pub advance_elasticity_modifier: f64,
    pub last_minute_threshold_hours: f64,
    pub advance_threshold_hours: f64,

    pub event_multiplier: f64,

    pub price_floor: f64,
    pub price_ceiling: f64,

    /// occupancy fraction → multiplier
    pub occupancy_multipliers: Vec<(f64, f64)>,

    pub location_multipliers: ZoneTable,

    /// hours before event start (negative after) → multiplier
    pub time_multipliers: Vec<(f64, f64)>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_prices: SpotTypeTable {
                standard: 10.0,
                ev: 15.0,
                motorcycle: 5.0,
            },
            elasticity_by_type: SpotTypeTable {
                standard: 1.0,
                ev: 0.7,
                motorcycle: 1.1,
            },
            elasticity_by_zone: ZoneTable {
                a: 0.9,
                b: 1.0,
                c: 1.3,
            },
            last_minute_elasticity_modifier: 0.7,
            advance_elasticity_modifier: 1.2,
            last_minute_threshold_hours: 1.0,
            advance_threshold_hours: 4.0,
            event_multiplier: 2.0,
            price_floor: 5.0,
            price_ceiling: 50.0,
            occupancy_multipliers: vec![
                (0.0, 1.0),
                (0.50, 1.0),
                (0.70, 1.5),
                (0.85, 2.5),
                (0.95, 3.5),
                (1.0, 4.0),
            ],
            location_multipliers: ZoneTable {
                a: 1.3,
                b: 1.0,
                c: 0.8,
            },
            time_multipliers: vec![
                (13.0, 0.5),
                (8.0, 0.7),
                (4.0, 1.0),
                (2.0, 1.5),
                (1.0, 2.0),
                (0.0, 2.5),
                (-1.0, 1.5),
                (-4.0, 0.8),
            ],
        }
    }
}

/// Auto-booking and auto-clearing tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rng_seed: u64,

    /// Simulated hours per logical tick
    pub tick_hours: f64,

    /// Booking probability per attempt at demand 1.0 and no gap
    pub base_booking_rate: f64,
    /// Probability boost per unit of positive occupancy gap: `1 + gap × gain`
    pub gap_gain: f64,
    /// Gap (fraction of the garage) that earns one extra attempt per tick
    pub burst_gap_step: f64,
    pub max_burst_attempts: usize,
    /// Probability factor once occupancy is ahead of target
    pub ahead_of_target_damping: f64,
    /// Minimum probability while behind target during the event window
    pub event_window_floor: f64,
    pub max_booking_probability: f64,

    /// Inverse-price weighting epsilon: `1 / (price + epsilon)`
    pub price_epsilon: f64,

    /// Per-tick departure chance for simulated cars before the event
    pub early_departure_rate: f64,
    /// Per-tick departure chance during the event
    pub event_departure_rate: f64,
    /// Per-tick departure chance after the event ends
    pub post_event_departure_rate: f64,

    /// `(hours, weight)` for booking durations
    pub duration_weights: Vec<(u32, f64)>,
    /// Hours before the event start at which durations lean longer
    pub event_lookahead_hours: f64,
    /// Weight factor for durations lasting through the event's end
    pub event_duration_boost: f64,

    pub max_event_log: usize,

    pub valid_speeds: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            tick_hours: 0.05,
            base_booking_rate: 0.35,
            gap_gain: 10.0,
            burst_gap_step: 0.1,
            max_burst_attempts: 4,
            ahead_of_target_damping: 0.1,
            event_window_floor: 0.5,
            max_booking_probability: 0.95,
            price_epsilon: 0.01,
            early_departure_rate: 0.02,
            event_departure_rate: 0.005,
            post_event_departure_rate: 0.25,
            duration_weights: vec![(1, 0.15), (2, 0.35), (3, 0.30), (4, 0.20)],
            event_lookahead_hours: 3.0,
            event_duration_boost: 2.5,
            max_event_log: 100,
            valid_speeds: vec![1.0, 2.0, 5.0, 10.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete settings, one section per concern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub garage: GarageConfig,
    pub pricing: PricingConfig,
    pub forecast: ForecastConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

/// Load [`DEFAULT_CONFIG_PATH`], relative to the working directory
pub fn load_default() -> Result<Settings, ConfigError> {
    Settings::load_from_path(DEFAULT_CONFIG_PATH)
}

impl Settings {
    /// Read, parse and validate a TOML file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn clock(&self) -> SimClock {
        SimClock::new(
            self.garage.day_start_hour,
            self.garage.day_end_hour,
            self.simulation.tick_hours,
        )
    }

    pub fn event_window(&self) -> EventWindow {
        self.garage.event_window()
    }

    /// Reject settings the engines cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.garage;
        let p = &self.pricing;
        let s = &self.simulation;

        ensure(g.rows > 0 && g.cols > 0, "grid must have at least one row and column")?;
        ensure(
            finite_in(g.near_fraction, 0.0, 1.0)
                && finite_in(g.middle_fraction, 0.0, 1.0)
                && g.near_fraction + g.middle_fraction <= 1.0,
            "zone fractions must be within [0, 1] and sum to at most 1",
        )?;
        ensure(
            g.day_start_hour.is_finite()
                && g.day_end_hour.is_finite()
                && g.day_start_hour < g.day_end_hour,
            "day_start_hour must be before day_end_hour",
        )?;
        ensure(
            g.event_hour.is_finite() && g.event_duration_hours.is_finite() && g.event_duration_hours > 0.0,
            "event_hour must be finite and event_duration_hours positive",
        )?;
        ensure(
            g.min_duration_hours > 0.0 && g.min_duration_hours <= g.max_duration_hours,
            "booking duration bounds must satisfy 0 < min <= max",
        )?;

        ensure(
            p.base_prices.values().iter().all(|v| v.is_finite() && *v > 0.0),
            "base prices must be positive",
        )?;
        ensure(
            p.elasticity_by_type.values().iter().all(|v| v.is_finite() && *v > 0.0)
                && p.elasticity_by_zone.values().iter().all(|v| v.is_finite() && *v > 0.0),
            "elasticities must be positive",
        )?;
        ensure(
            p.location_multipliers.values().iter().all(|v| v.is_finite() && *v > 0.0),
            "location multipliers must be positive",
        )?;
        ensure(
            p.last_minute_elasticity_modifier > 0.0 && p.advance_elasticity_modifier > 0.0,
            "elasticity modifiers must be positive",
        )?;
        ensure(
            p.event_multiplier.is_finite() && p.event_multiplier > 0.0,
            "event multiplier must be positive",
        )?;
        ensure(
            p.price_floor.is_finite()
                && p.price_ceiling.is_finite()
                && p.price_floor >= 0.0
                && p.price_floor <= p.price_ceiling,
            "price floor must not exceed price ceiling",
        )?;
        validate_curve("occupancy_multipliers", &p.occupancy_multipliers)?;
        validate_curve("time_multipliers", &p.time_multipliers)?;

        validate_hourly("forecast.demand", &self.forecast.demand)?;
        validate_hourly("forecast.target_occupancy", &self.forecast.target_occupancy)?;

        ensure(
            s.tick_hours.is_finite() && s.tick_hours > 0.0,
            "tick_hours must be positive",
        )?;
        ensure(s.max_burst_attempts > 0, "max_burst_attempts must be positive")?;
        ensure(s.burst_gap_step > 0.0, "burst_gap_step must be positive")?;
        ensure(
            finite_in(s.max_booking_probability, 0.0, 1.0) && s.max_booking_probability < 1.0,
            "max_booking_probability must be below 1.0",
        )?;
        ensure(
            [
                s.base_booking_rate,
                s.ahead_of_target_damping,
                s.event_window_floor,
                s.early_departure_rate,
                s.event_departure_rate,
                s.post_event_departure_rate,
            ]
            .iter()
            .all(|v| finite_in(*v, 0.0, 1.0)),
            "rates must be within [0, 1]",
        )?;
        ensure(s.price_epsilon > 0.0, "price_epsilon must be positive")?;
        ensure(
            !s.duration_weights.is_empty()
                && s.duration_weights.iter().all(|(h, w)| *h > 0 && w.is_finite() && *w >= 0.0)
                && s.duration_weights.iter().any(|(_, w)| *w > 0.0),
            "duration_weights must be non-empty with non-negative weights",
        )?;
        ensure(
            s.duration_weights.iter().all(|(h, _)| {
                (*h as f64) >= g.min_duration_hours && (*h as f64) <= g.max_duration_hours
            }),
            "duration_weights must lie within the booking duration bounds",
        )?;
        ensure(s.event_duration_boost > 0.0, "event_duration_boost must be positive")?;
        ensure(s.max_event_log > 0, "max_event_log must be positive")?;
        ensure(
            !s.valid_speeds.is_empty() && s.valid_speeds.iter().all(|v| *v >= 1.0),
            "valid_speeds must be non-empty and at least 1",
        )?;
        ensure(
            self.logging.level.parse::<tracing::Level>().is_ok(),
            "logging.level must be one of trace, debug, info, warn, error",
        )?;

        Ok(())
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}

fn finite_in(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn validate_curve(name: &str, curve: &[(f64, f64)]) -> Result<(), ConfigError> {
    if curve.is_empty() {
        return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
    }
    if curve.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(ConfigError::Invalid(format!("{} must be finite", name)));
    }
    Ok(())
}

fn validate_hourly(name: &str, curve: &HourlyCurve) -> Result<(), ConfigError> {
    if curve.points.is_empty() {
        return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
    }
    if !curve.fallback.is_finite() || curve.points.iter().any(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(ConfigError::Invalid(format!("{} values must be finite and non-negative", name)));
    }
    Ok(())
}
