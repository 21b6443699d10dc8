// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stride-Tracker: run telemetry with achievements
//!
//! This crate provides the backend API for recording run telemetry fixes,
//! deriving per-run totals and awarding challenges when milestones are met.

pub mod config;
pub mod error;
pub mod geodesy;
pub mod models;
pub mod roster;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use services::{PositionIngestor, RunLifecycle};
use store::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub ingestor: PositionIngestor,
    pub lifecycle: RunLifecycle,
}
