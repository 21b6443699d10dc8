// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run lifecycle state machine.
//!
//! States move in one direction: `Init` → `InProgress` → `Finished`. The
//! finish transition derives the run's totals from its recorded fixes and
//! then hands the run to the achievement engine.

use crate::error::{AppError, Result};
use crate::geodesy;
use crate::models::{Position, Run, RunStatus};
use crate::services::AchievementEngine;
use crate::store::Store;

/// Guarded transitions for a run, plus finish-time aggregation.
#[derive(Clone)]
pub struct RunLifecycle {
    store: Store,
    achievements: AchievementEngine,
}

impl RunLifecycle {
    pub fn new(store: Store, achievements: AchievementEngine) -> Self {
        Self {
            store,
            achievements,
        }
    }

    /// Move a run from `Init` to `InProgress`. No other field changes.
    pub async fn start(&self, run_id: u64) -> Result<Run> {
        let lock = self.store.run_lock(run_id);
        let _guard = lock.lock().await;

        let mut run = self.get_run(run_id)?;
        if run.status != RunStatus::Init {
            return Err(AppError::InvalidState {
                run_id,
                required: RunStatus::Init,
                current: run.status,
            });
        }

        run.status = RunStatus::InProgress;
        self.store.set_run(&run);
        tracing::info!(run_id, athlete_id = run.athlete_id, "Run started");
        Ok(run)
    }

    /// Move a run from `InProgress` to `Finished`, deriving its totals.
    ///
    /// The totals and the status flip land in one store write under the
    /// run's advisory lock, so a reader never observes a finished run
    /// without its totals. The achievement sweep follows inside the same
    /// lock scope.
    pub async fn finish(&self, run_id: u64) -> Result<Run> {
        let lock = self.store.run_lock(run_id);
        let _guard = lock.lock().await;

        let mut run = self.get_run(run_id)?;
        if run.status != RunStatus::InProgress {
            return Err(AppError::InvalidState {
                run_id,
                required: RunStatus::InProgress,
                current: run.status,
            });
        }

        let positions = self.store.positions_for_run(run_id);
        run.distance = Some(total_distance_km(&positions));
        run.run_time_seconds = elapsed_seconds(&positions);
        run.speed = average_speed(&positions);
        run.status = RunStatus::Finished;
        self.store.set_run(&run);

        tracing::info!(
            run_id,
            athlete_id = run.athlete_id,
            distance = run.distance,
            run_time_seconds = run.run_time_seconds,
            speed = run.speed,
            "Run finished"
        );

        let awarded = self.achievements.evaluate_after_finish(&run)?;
        if !awarded.is_empty() {
            tracing::info!(
                run_id,
                athlete_id = run.athlete_id,
                awards = awarded.len(),
                "Challenges awarded at finish"
            );
        }

        Ok(run)
    }

    fn get_run(&self, run_id: u64) -> Result<Run> {
        self.store
            .get_run(run_id)
            .ok_or_else(|| AppError::NotFound(format!("run {run_id}")))
    }
}

/// Authoritative total: full-precision geodesic sum over consecutive fixes
/// in arrival order, independent of the rounded per-fix increments.
fn total_distance_km(positions: &[Position]) -> f64 {
    positions
        .windows(2)
        .map(|pair| {
            geodesy::distance_km(
                (pair[0].latitude, pair[0].longitude),
                (pair[1].latitude, pair[1].longitude),
            )
        })
        .sum()
}

/// Whole seconds between the earliest and latest timestamped fix, or `None`
/// when no fix carries a timestamp. Arrival order is irrelevant here.
fn elapsed_seconds(positions: &[Position]) -> Option<u64> {
    let timestamps: Vec<_> = positions.iter().filter_map(|p| p.timestamp).collect();
    let earliest = timestamps.iter().min()?;
    let latest = timestamps.iter().max()?;
    Some((*latest - *earliest).num_seconds().max(0) as u64)
}

/// Mean of the stored per-fix speeds to 2 decimal places, skipping fixes
/// without one; `None` when no fix carries a speed.
fn average_speed(positions: &[Position]) -> Option<f64> {
    let speeds: Vec<f64> = positions.iter().filter_map(|p| p.speed).collect();
    if speeds.is_empty() {
        return None;
    }
    Some(geodesy::round2(speeds.iter().sum::<f64>() / speeds.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::{TimeZone, Utc};

    fn lifecycle() -> (RunLifecycle, Store, u64) {
        let store = Store::new();
        let athlete = store.create_user("runner", "Test", "Runner", UserRole::Athlete);
        let lifecycle = RunLifecycle::new(store.clone(), AchievementEngine::new(store.clone()));
        (lifecycle, store, athlete.id)
    }

    fn fix_at(store: &Store, run_id: u64, lat: f64, lon: f64, hms: (u32, u32, u32)) {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 10, 12, hms.0, hms.1, hms.2)
            .unwrap();
        store.create_position(run_id, lat, lon, Some(timestamp), None, None);
    }

    #[tokio::test]
    async fn start_requires_init() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");

        let started = lifecycle.start(run.id).await.unwrap();
        assert_eq!(started.status, RunStatus::InProgress);

        let err = lifecycle.start(run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
        assert_eq!(store.get_run(run.id).unwrap().status, RunStatus::InProgress);
    }

    #[tokio::test]
    async fn finish_requires_in_progress() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");

        // Straight from Init is rejected.
        let err = lifecycle.finish(run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));
        assert_eq!(store.get_run(run.id).unwrap().status, RunStatus::Init);
    }

    #[tokio::test]
    async fn finishing_twice_leaves_totals_untouched() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");
        lifecycle.start(run.id).await.unwrap();
        fix_at(&store, run.id, 50.4501, 30.5234, (14, 30, 15));
        fix_at(&store, run.id, 50.4512, 30.5240, (14, 31, 15));

        let finished = lifecycle.finish(run.id).await.unwrap();
        let err = lifecycle.finish(run.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState { .. }));

        let stored = store.get_run(run.id).unwrap();
        assert_eq!(stored.distance, finished.distance);
        assert_eq!(stored.run_time_seconds, finished.run_time_seconds);
        assert_eq!(stored.speed, finished.speed);
    }

    #[tokio::test]
    async fn finish_recomputes_distance_at_full_precision() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");
        lifecycle.start(run.id).await.unwrap();
        store.create_position(run.id, 41.49008, -71.312796, None, None, None);
        store.create_position(run.id, 41.499498, -81.695391, None, None, None);

        let finished = lifecycle.finish(run.id).await.unwrap();
        let total = finished.distance.unwrap();
        assert!((total - 866.4554329098687).abs() < 1e-6, "got {total}");
    }

    #[tokio::test]
    async fn run_time_spans_min_to_max_timestamp() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");
        lifecycle.start(run.id).await.unwrap();

        // Deliberately out of chronological order.
        fix_at(&store, run.id, 11.0, 22.0, (14, 30, 15));
        fix_at(&store, run.id, 11.1, 22.1, (14, 31, 15));
        fix_at(&store, run.id, 11.2, 22.2, (14, 42, 15));
        fix_at(&store, run.id, 11.1, 22.1, (14, 35, 15));

        let finished = lifecycle.finish(run.id).await.unwrap();
        assert_eq!(finished.run_time_seconds, Some(720));
    }

    #[tokio::test]
    async fn totals_for_a_run_without_fixes() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");
        lifecycle.start(run.id).await.unwrap();

        let finished = lifecycle.finish(run.id).await.unwrap();
        assert_eq!(finished.distance, Some(0.0));
        assert_eq!(finished.run_time_seconds, None);
        assert_eq!(finished.speed, None);
    }

    #[tokio::test]
    async fn average_speed_is_the_mean_of_stored_speeds() {
        let (lifecycle, store, athlete_id) = lifecycle();
        let run = store.create_run(athlete_id, "");
        lifecycle.start(run.id).await.unwrap();
        store.create_position(run.id, 50.0, 30.0, None, Some(0.0), Some(0.0));
        store.create_position(run.id, 50.001, 30.0, None, Some(0.11), Some(2.5));
        store.create_position(run.id, 50.002, 30.0, None, Some(0.22), Some(3.0));

        let finished = lifecycle.finish(run.id).await.unwrap();
        assert_eq!(finished.speed, Some(1.83));
    }

    #[tokio::test]
    async fn finish_triggers_the_achievement_sweep() {
        let (lifecycle, store, athlete_id) = lifecycle();

        for _ in 0..9 {
            let run = store.create_run(athlete_id, "");
            lifecycle.start(run.id).await.unwrap();
            lifecycle.finish(run.id).await.unwrap();
        }
        assert!(store.list_challenges(Some(athlete_id)).is_empty());

        let tenth = store.create_run(athlete_id, "");
        lifecycle.start(tenth.id).await.unwrap();
        lifecycle.finish(tenth.id).await.unwrap();

        let challenges = store.list_challenges(Some(athlete_id));
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].kind, crate::models::ChallengeKind::TenRuns);
    }
}
