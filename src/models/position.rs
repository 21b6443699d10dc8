// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Position (GPS fix) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded GPS fix belonging to a run.
///
/// The store-assigned `id` is the authoritative insertion order within a run;
/// `timestamp` may arrive out of order and is used only for elapsed-time
/// math, never for sequencing. A position is immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: u64,
    pub run_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Device-reported sample time; optional.
    pub timestamp: Option<DateTime<Utc>>,
    /// Cumulative kilometers from the run's first fix through this fix.
    /// 0 for the first fix. Monotone non-decreasing in insertion order.
    pub distance: Option<f64>,
    /// Instantaneous speed in meters/second since the previous fix.
    /// 0 for the first fix or when no positive elapsed time is known.
    pub speed: Option<f64>,
}
