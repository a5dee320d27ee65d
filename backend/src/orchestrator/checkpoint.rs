//! Snapshots of a running garage
//!
//! A [`GarageSnapshot`] is an owned, immutable copy of everything a viewer
//! needs after a tick: the full state, the current price of every space and
//! the dashboard metrics. It also carries the RNG position and a hash of the
//! settings so a simulator can be resumed from it.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restoring and ticking replays the same day as the
//!   original run
//! - **Config Matching**: a snapshot only restores under identical settings
//! - **Referential Integrity**: no reservation references an unknown space
//! - **No double-booking**: no two active reservations on one space overlap

use crate::config::Settings;
use crate::error::SnapshotError;
use crate::models::GarageState;
use crate::pricing::{booking_lead_time, calculate_price, PriceResult};
use crate::stats::{dashboard_metrics, DashboardMetrics};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

/// Post-tick view of the garage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarageSnapshot {
    pub state: GarageState,

    /// Current quote per space id, priced with the booking lead time
    pub prices: BTreeMap<String, PriceResult>,

    pub metrics: DashboardMetrics,

    /// Seed the simulator was created with
    pub rng_seed: u64,

    /// RNG position at capture (CRITICAL for determinism)
    pub rng_state: u64,

    /// SHA-256 of the canonical settings JSON
    pub config_hash: String,
}

impl GarageSnapshot {
    /// Capture the state and price every space at the current time
    pub fn capture(
        state: &GarageState,
        settings: &Settings,
        rng_seed: u64,
        rng_state: u64,
    ) -> Result<Self, SnapshotError> {
        let now = state.current_time;
        let lead_time = booking_lead_time(now, settings);

        let prices = state
            .spaces()
            .iter()
            .map(|space| {
                (
                    space.id().to_string(),
                    calculate_price(space, now, state, Some(lead_time), settings),
                )
            })
            .collect();

        Ok(Self {
            state: state.clone(),
            prices,
            metrics: dashboard_metrics(state),
            rng_seed,
            rng_state,
            config_hash: compute_config_hash(settings)?,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: GarageSnapshot = serde_json::from_str(json)?;
        validate_snapshot(&snapshot)?;
        snapshot.state.reindex();
        Ok(snapshot)
    }
}

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SnapshotError> {
    use serde_json::Value;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let canonical = canonicalize(serde_json::to_value(config)?);
    let json = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check snapshot integrity before it is trusted
///
/// - Space ids are unique
/// - Every reservation references a known space
/// - No space has two overlapping active reservations
/// - The event log is within its bound
pub fn validate_snapshot(snapshot: &GarageSnapshot) -> Result<(), SnapshotError> {
    let state = &snapshot.state;

    let mut space_ids = HashSet::new();
    for space in state.spaces() {
        if !space_ids.insert(space.id()) {
            return Err(SnapshotError::Invalid(format!("duplicate space {}", space.id())));
        }
    }

    let reservations = state.reservations();
    for (i, reservation) in reservations.iter().enumerate() {
        if !space_ids.contains(reservation.space_id()) {
            return Err(SnapshotError::Invalid(format!(
                "reservation {} references unknown space {}",
                reservation.id(),
                reservation.space_id()
            )));
        }
        if !reservation.is_active() {
            continue;
        }
        let clash = reservations[i + 1..].iter().find(|other| {
            other.space_id() == reservation.space_id()
                && other.overlaps(reservation.start_time(), reservation.end_time())
        });
        if let Some(other) = clash {
            return Err(SnapshotError::Invalid(format!(
                "reservations {} and {} overlap on space {}",
                reservation.id(),
                other.id(),
                reservation.space_id()
            )));
        }
    }

    let log = state.event_log();
    if log.len() > log.max_len() {
        return Err(SnapshotError::Invalid(format!(
            "event log holds {} entries, bound is {}",
            log.len(),
            log.max_len()
        )));
    }

    Ok(())
}
