// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod challenge;
pub mod item;
pub mod position;
pub mod run;
pub mod user;

pub use challenge::{Challenge, ChallengeKind};
pub use item::CollectibleItem;
pub use position::Position;
pub use run::{Run, RunStatus};
pub use user::{AthleteInfo, User, UserRole};
