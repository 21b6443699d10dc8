// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Position fix ingestion.
//!
//! Handles the per-fix workflow:
//! 1. Validate the coordinate ranges
//! 2. Check the run exists and is in progress
//! 3. Derive cumulative distance and instantaneous speed from the
//!    previous fix
//! 4. Persist the fix
//! 5. Run item proximity detection as a side effect

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::geodesy;
use crate::models::{Position, RunStatus};
use crate::services::ProximityDetector;
use crate::store::Store;

/// Validates and records GPS fixes for in-progress runs.
#[derive(Clone)]
pub struct PositionIngestor {
    store: Store,
    proximity: ProximityDetector,
}

impl PositionIngestor {
    pub fn new(store: Store, proximity: ProximityDetector) -> Self {
        Self { store, proximity }
    }

    /// Record one fix for a run.
    ///
    /// Fixes for one run are appended under the run's advisory lock, so the
    /// previous-fix lookup and the insert form a linear sequence per run;
    /// fixes for different runs proceed in parallel.
    pub async fn ingest(
        &self,
        run_id: u64,
        latitude: f64,
        longitude: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Position> {
        validate_coordinates(latitude, longitude)?;

        let lock = self.store.run_lock(run_id);
        let _guard = lock.lock().await;

        let run = self
            .store
            .get_run(run_id)
            .ok_or_else(|| AppError::NotFound(format!("run {run_id}")))?;
        if run.status != RunStatus::InProgress {
            return Err(AppError::InvalidState {
                run_id,
                required: RunStatus::InProgress,
                current: run.status,
            });
        }

        let (distance, speed) = match self.store.last_position_for_run(run_id) {
            Some(prev) => derive_from_previous(&prev, latitude, longitude, timestamp),
            None => (0.0, 0.0),
        };

        let position = self.store.create_position(
            run_id,
            latitude,
            longitude,
            timestamp,
            Some(distance),
            Some(speed),
        );

        tracing::debug!(
            run_id,
            position_id = position.id,
            distance,
            speed,
            "Position recorded"
        );

        // Side effect only; the stored fix is already complete.
        self.proximity.detect(latitude, longitude, run.athlete_id);

        Ok(position)
    }
}

/// Cumulative kilometers and instantaneous speed relative to the previous fix.
///
/// The meter delta is rounded to 2 decimal places before both derivations.
/// Speed needs timestamps on both fixes and a positive elapsed interval;
/// anything else yields 0.
fn derive_from_previous(
    prev: &Position,
    latitude: f64,
    longitude: f64,
    timestamp: Option<DateTime<Utc>>,
) -> (f64, f64) {
    let delta_meters = geodesy::round2(geodesy::distance_meters(
        (prev.latitude, prev.longitude),
        (latitude, longitude),
    ));
    let distance = prev.distance.unwrap_or(0.0) + delta_meters / 1000.0;

    let speed = match (prev.timestamp, timestamp) {
        (Some(earlier), Some(later)) => {
            let elapsed = (later - earlier).num_milliseconds() as f64 / 1000.0;
            if elapsed > 0.0 {
                geodesy::round2(delta_meters / elapsed)
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    (distance, speed)
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !geodesy::in_latitude_range(latitude) {
        return Err(AppError::Validation(format!(
            "latitude must be in the [-90; 90] range, got {latitude}"
        )));
    }
    if !geodesy::in_longitude_range(longitude) {
        return Err(AppError::Validation(format!(
            "longitude must be in the [-180; 180] range, got {longitude}"
        )));
    }
    Ok(())
}
