// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Run model and lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a run.
///
/// Transitions are linear: `Init` → `InProgress` → `Finished`. There is no
/// transition out of `Finished` and no shortcut from `Init` to `Finished`;
/// the transitions themselves live in [`crate::services::RunLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Init,
    InProgress,
    Finished,
}

impl RunStatus {
    /// Wire/status-message form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Init => "init",
            RunStatus::InProgress => "in_progress",
            RunStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked athletic session.
///
/// The derived fields (`distance`, `run_time_seconds`, `speed`) stay `None`
/// until the run is finished; only the finish transition writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    /// Owning athlete (external identity, non-owning reference).
    pub athlete_id: u64,
    /// Free-text comment supplied at creation.
    pub comment: String,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    /// Total distance in kilometers, recomputed authoritatively at finish.
    pub distance: Option<f64>,
    /// Seconds between the earliest and latest timestamped fix.
    pub run_time_seconds: Option<u64>,
    /// Average speed in meters/second (mean of the per-fix speeds).
    pub speed: Option<f64>,
}
