//! Activity log for the garage session
//!
//! Every booking, departure and day-end summary is appended as an
//! [`EventLogEntry`]. The log is a rolling window: once it holds
//! `max_len` entries the oldest ones are dropped, so the retained entries
//! are always the most recent `max_len` in their original order.
//!
//! # Event Types
//!
//! - **sim_booking**: auto-booking created a reservation
//! - **booking**: a user booked a space
//! - **cancellation**: a user cancelled an active reservation
//! - **departure**: a reservation reached its end time
//! - **early_departure**: a simulated car left before its end time (pre/during event)
//! - **post_game_departure**: a simulated car left after the event ended
//! - **day_complete**: end-of-day summary

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Event type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SimBooking,
    Booking,
    Cancellation,
    Departure,
    EarlyDeparture,
    PostGameDeparture,
    DayComplete,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SimBooking => "sim_booking",
            EventKind::Booking => "booking",
            EventKind::Cancellation => "cancellation",
            EventKind::Departure => "departure",
            EventKind::EarlyDeparture => "early_departure",
            EventKind::PostGameDeparture => "post_game_departure",
            EventKind::DayComplete => "day_complete",
        }
    }

    /// Any kind of car leaving
    pub fn is_departure(&self) -> bool {
        matches!(
            self,
            EventKind::Departure | EventKind::EarlyDeparture | EventKind::PostGameDeparture
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Simulated time (decimal hour)
    pub timestamp: f64,
    pub event_type: EventKind,
    pub details: String,
}

/// FIFO-trimmed event log bounded at `max_len` entries
///
/// # Example
///
/// ```rust
/// use garage_pricing_core::models::{EventKind, EventLog};
///
/// let mut log = EventLog::new(2);
/// log.push(6.0, EventKind::SimBooking, "first");
/// log.push(6.5, EventKind::SimBooking, "second");
/// log.push(7.0, EventKind::Departure, "third");
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.entries().next().unwrap().details, "second");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    max_len: usize,
    entries: VecDeque<EventLogEntry>,
}

impl EventLog {
    /// # Panics
    /// Panics if `max_len` is zero
    pub fn new(max_len: usize) -> Self {
        assert!(max_len > 0, "event log size must be positive");
        Self {
            max_len,
            entries: VecDeque::with_capacity(max_len),
        }
    }

    /// Append an entry, dropping the oldest ones beyond the bound
    pub fn push(&mut self, timestamp: f64, event_type: EventKind, details: impl Into<String>) {
        self.entries.push_back(EventLogEntry {
            timestamp,
            event_type,
            details: details.into(),
        });
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Oldest to newest
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &EventLogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&EventLogEntry> {
        self.entries.back()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, kind: EventKind) -> Vec<&EventLogEntry> {
        self.entries.iter().filter(|e| e.event_type == kind).collect()
    }

    /// The newest `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<EventLogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fields() {
        let mut log = EventLog::new(10);
        log.push(14.5, EventKind::Booking, "Manual booking: R0C0");

        let entry = log.last().unwrap();
        assert_eq!(entry.timestamp, 14.5);
        assert_eq!(entry.event_type, EventKind::Booking);
        assert_eq!(entry.details, "Manual booking: R0C0");
    }

    #[test]
    fn test_trims_to_most_recent_in_order() {
        let mut log = EventLog::new(5);
        for i in 0..14 {
            log.push(i as f64, EventKind::SimBooking, format!("event_{}", i));
        }

        assert_eq!(log.len(), 5);
        let details: Vec<&str> = log.entries().map(|e| e.details.as_str()).collect();
        assert_eq!(details, vec!["event_9", "event_10", "event_11", "event_12", "event_13"]);
    }

    #[test]
    fn test_events_of_type() {
        let mut log = EventLog::new(10);
        log.push(7.0, EventKind::Departure, "a");
        log.push(7.0, EventKind::SimBooking, "b");
        log.push(7.1, EventKind::Departure, "c");

        assert_eq!(log.events_of_type(EventKind::Departure).len(), 2);
        assert!(EventKind::PostGameDeparture.is_departure());
        assert!(!EventKind::SimBooking.is_departure());
    }

    #[test]
    fn test_recent() {
        let mut log = EventLog::new(10);
        for i in 0..4 {
            log.push(i as f64, EventKind::SimBooking, i.to_string());
        }
        let recent = log.recent(2);
        assert_eq!(recent[0].details, "2");
        assert_eq!(recent[1].details, "3");
        assert_eq!(log.recent(100).len(), 4);
    }

    #[test]
    fn test_serializes_tag_as_snake_case() {
        let json = serde_json::to_string(&EventKind::PostGameDeparture).unwrap();
        assert_eq!(json, "\"post_game_departure\"");
    }
}
