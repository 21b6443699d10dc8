//! User model: athletes and coaches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a user trains or coaches.
///
/// Resolved once when a detail response is built; there is no per-row
/// dispatch on a staff flag anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Athlete,
    Coach,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Athlete => "athlete",
            UserRole::Coach => "coach",
        }
    }
}

/// A registered user. Identity management itself is external; this record
/// is what the surrounding system hands us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
    pub role: UserRole,
}

impl User {
    /// "First Last", trimmed when either part is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Per-athlete training profile (weight in kilograms, free-text goals).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub athlete_id: u64,
    pub weight: Option<u16>,
    pub goals: Option<String>,
}

impl AthleteInfo {
    /// Empty profile, created on first read.
    pub fn empty(athlete_id: u64) -> Self {
        Self {
            athlete_id,
            weight: None,
            goals: None,
        }
    }
}
