//! Simulated time for the garage day
//!
//! Time is a decimal hour on a single simulated day (14.5 = 2:30 PM). The day
//! has fixed bounds and advances in fixed logical ticks, so outcomes do not
//! depend on how fast the caller drives playback.

use serde::{Deserialize, Serialize};

/// Day bounds and tick size for the simulated clock
///
/// # Example
/// ```
/// use garage_pricing_core::core::time::SimClock;
///
/// let clock = SimClock::new(6.0, 23.0 + 59.0 / 60.0, 0.05);
/// assert_eq!(clock.advance(6.0), 6.05);
/// assert_eq!(clock.clamp(2.0), 6.0);
/// assert!(clock.is_end_of_day(clock.advance(23.97)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    day_start: f64,
    day_end: f64,
    tick_hours: f64,
}

impl SimClock {
    /// # Panics
    /// Panics if the bounds are inverted or the tick is not positive
    pub fn new(day_start: f64, day_end: f64, tick_hours: f64) -> Self {
        assert!(day_start < day_end, "day_start must be before day_end");
        assert!(tick_hours > 0.0, "tick_hours must be positive");
        Self {
            day_start,
            day_end,
            tick_hours,
        }
    }

    pub fn day_start(&self) -> f64 {
        self.day_start
    }

    pub fn day_end(&self) -> f64 {
        self.day_end
    }

    pub fn tick_hours(&self) -> f64 {
        self.tick_hours
    }

    /// Time after one logical tick, never past the end of day
    pub fn advance(&self, current: f64) -> f64 {
        (current + self.tick_hours).min(self.day_end)
    }

    /// Clamp an arbitrary time into the day bounds
    pub fn clamp(&self, time: f64) -> f64 {
        time.clamp(self.day_start, self.day_end)
    }

    pub fn is_end_of_day(&self, time: f64) -> bool {
        time >= self.day_end
    }

    /// Hours left before the end of day (0 once it is reached)
    pub fn remaining_hours(&self, time: f64) -> f64 {
        (self.day_end - time).max(0.0)
    }
}

/// Where a time sits relative to the scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPhase {
    PreEvent,
    DuringEvent,
    PostEvent,
}

/// The scheduled event as a `[start, end)` window of hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl EventWindow {
    pub fn new(start_hour: f64, duration_hours: f64) -> Self {
        Self {
            start_hour,
            end_hour: start_hour + duration_hours,
        }
    }

    pub fn phase(&self, time: f64) -> EventPhase {
        if time < self.start_hour {
            EventPhase::PreEvent
        } else if time < self.end_hour {
            EventPhase::DuringEvent
        } else {
            EventPhase::PostEvent
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.phase(time) == EventPhase::DuringEvent
    }

    /// Signed hours until the event starts (negative once it has started)
    pub fn hours_before_start(&self, time: f64) -> f64 {
        self.start_hour - time
    }
}
