//! Garage State
//!
//! The aggregate root of a running session: simulated clock, playback flags,
//! the space grid, every reservation ever made, the currently held space ids
//! and the bounded activity log.
//!
//! # Critical Invariants
//!
//! 1. **One space per cell**: space ids are unique
//! 2. **No orphan reservations**: every reservation references a known space
//! 3. **No double-booking**: at any instant a space has at most one active
//!    reservation covering it
//! 4. **Append-only history**: reservations are never removed
//!
//! The state provides no locking; a single writer drives it tick by tick.

use crate::models::event::{EventKind, EventLog};
use crate::models::reservation::Reservation;
use crate::models::space::Space;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Complete garage state
///
/// # Example
///
/// ```rust
/// use garage_pricing_core::models::{GarageState, Space, SpotType, Zone};
///
/// let spaces = vec![
///     Space::new(0, 0, SpotType::Ev, Zone::A, 5.0),
///     Space::new(0, 1, SpotType::Standard, Zone::A, 4.0),
/// ];
/// let state = GarageState::new(spaces, 6.0, 100);
///
/// assert_eq!(state.total_spaces(), 2);
/// assert_eq!(state.occupancy_rate(6.0), 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarageState {
    /// Current simulated time (decimal hour)
    pub current_time: f64,
    pub is_playing: bool,
    pub playback_speed: f64,
    pub simulation_enabled: bool,

    spaces: Vec<Space>,

    #[serde(skip)]
    space_index: HashMap<String, usize>,

    reservations: Vec<Reservation>,

    /// Mirror of the externally managed holds, kept for snapshots
    held_space_ids: BTreeSet<String>,

    event_log: EventLog,

    /// Counter behind deterministic simulated reservation ids
    next_sim_seq: u64,
}

impl GarageState {
    /// # Panics
    ///
    /// Panics if two spaces share an id
    pub fn new(spaces: Vec<Space>, start_time: f64, max_event_log: usize) -> Self {
        let space_index = Self::build_index(&spaces);
        Self {
            current_time: start_time,
            is_playing: false,
            playback_speed: 1.0,
            simulation_enabled: false,
            spaces,
            space_index,
            reservations: Vec::new(),
            held_space_ids: BTreeSet::new(),
            event_log: EventLog::new(max_event_log),
            next_sim_seq: 0,
        }
    }

    fn build_index(spaces: &[Space]) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(spaces.len());
        for (i, space) in spaces.iter().enumerate() {
            let previous = index.insert(space.id().to_string(), i);
            assert!(previous.is_none(), "Space ID {} already exists", space.id());
        }
        index
    }

    /// Rebuild the id index after deserialisation
    pub fn reindex(&mut self) {
        self.space_index = Self::build_index(&self.spaces);
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn total_spaces(&self) -> usize {
        self.spaces.len()
    }

    pub fn get_space(&self, id: &str) -> Option<&Space> {
        self.space_index.get(id).map(|&i| &self.spaces[i])
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn reservations_mut(&mut self) -> &mut [Reservation] {
        &mut self.reservations
    }

    pub fn get_reservation(&self, id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id() == id)
    }

    pub fn get_reservation_mut(&mut self, id: &str) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.id() == id)
    }

    /// Append a reservation
    ///
    /// # Panics
    ///
    /// Panics if the reservation references a space that does not exist
    pub fn add_reservation(&mut self, reservation: Reservation) {
        assert!(
            self.space_index.contains_key(reservation.space_id()),
            "Reservation {} references unknown space {}",
            reservation.id(),
            reservation.space_id()
        );
        self.reservations.push(reservation);
    }

    /// Next deterministic id for a simulated reservation
    pub fn next_sim_reservation_id(&mut self) -> String {
        self.next_sim_seq += 1;
        format!("sim-{:08}", self.next_sim_seq)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Append to the activity log, stamped with the current time
    pub fn log_event(&mut self, kind: EventKind, details: impl Into<String>) {
        self.event_log.push(self.current_time, kind, details);
    }

    pub fn held_space_ids(&self) -> &BTreeSet<String> {
        &self.held_space_ids
    }

    /// Replace the mirrored hold set with the caller's current holds
    pub fn sync_holds<'a>(&mut self, held: impl IntoIterator<Item = &'a String>) {
        self.held_space_ids = held.into_iter().cloned().collect();
    }

    /// Active reservations covering `time`
    pub fn active_at(&self, time: f64) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter().filter(move |r| r.covers(time))
    }

    pub fn occupied_count(&self, time: f64) -> usize {
        self.active_at(time).count()
    }

    /// Fraction of spaces with an active reservation covering `time`
    /// (0 for an empty garage)
    pub fn occupancy_rate(&self, time: f64) -> f64 {
        if self.spaces.is_empty() {
            return 0.0;
        }
        self.occupied_count(time) as f64 / self.spaces.len() as f64
    }

    /// True if an active reservation on the space intersects `[start, end)`
    pub fn has_conflict(&self, space_id: &str, start: f64, end: f64) -> bool {
        self.reservations
            .iter()
            .any(|r| r.space_id() == space_id && r.overlaps(start, end))
    }

    /// Spaces that can take a booking over `[start, end)`: no active
    /// reservation intersects the interval and the space is not in `held`
    ///
    /// Reservations starting later than `start` count, so a scrubbed-back
    /// clock cannot book over bookings made earlier in the day.
    pub fn available_spaces(&self, start: f64, end: f64, held: &HashSet<String>) -> Vec<&Space> {
        let blocked: HashSet<&str> = self
            .reservations
            .iter()
            .filter(|r| r.overlaps(start, end))
            .map(|r| r.space_id())
            .collect();

        self.spaces
            .iter()
            .filter(|s| !blocked.contains(s.id()) && !held.contains(s.id()))
            .collect()
    }
}
