// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod achievements;
pub mod ingest;
pub mod lifecycle;
pub mod proximity;

pub use achievements::AchievementEngine;
pub use ingest::PositionIngestor;
pub use lifecycle::RunLifecycle;
pub use proximity::ProximityDetector;
