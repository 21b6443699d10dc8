// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roster loading: seed users from a JSON file at startup.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::UserRole;
use crate::store::Store;

/// One roster file entry.
#[derive(Debug, Deserialize)]
pub struct RosterEntry {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: UserRole,
}

/// Seed users from a JSON roster file.
pub fn seed_from_file<P: AsRef<Path>>(store: &Store, path: P) -> Result<usize, RosterError> {
    let json_data =
        fs::read_to_string(path.as_ref()).map_err(|e| RosterError::IoError(e.to_string()))?;
    seed_from_json(store, &json_data)
}

/// Seed users from a JSON roster string. Returns the number of users created.
pub fn seed_from_json(store: &Store, json_data: &str) -> Result<usize, RosterError> {
    let entries: Vec<RosterEntry> =
        serde_json::from_str(json_data).map_err(|e| RosterError::ParseError(e.to_string()))?;

    let mut seeded = 0;
    for entry in entries {
        // Skip entries with no username
        if entry.username.is_empty() {
            tracing::warn!("Skipping roster entry with empty username");
            continue;
        }
        store.create_user(
            &entry.username,
            &entry.first_name,
            &entry.last_name,
            entry.role,
        );
        seeded += 1;
    }

    tracing::info!(count = seeded, "Roster loaded");
    Ok(seeded)
}

/// Errors from roster loading.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse roster: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    const ROSTER: &str = r#"[
        {"username": "jsmith", "first_name": "Jane", "last_name": "Smith", "role": "athlete"},
        {"username": "coach_k", "role": "coach"},
        {"username": "", "role": "athlete"}
    ]"#;

    #[test]
    fn seeds_entries_and_skips_empty_usernames() {
        let store = Store::new();
        let seeded = seed_from_json(&store, ROSTER).unwrap();
        assert_eq!(seeded, 2);

        let users = store.list_users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "jsmith");
        assert_eq!(users[0].full_name(), "Jane Smith");
        assert_eq!(users[1].username, "coach_k");
        assert_eq!(users[1].role, UserRole::Coach);
        // Omitted name fields default to empty
        assert_eq!(users[1].full_name(), "");
    }

    #[test]
    fn malformed_roster_is_a_parse_error() {
        let store = Store::new();
        let err = seed_from_json(&store, "{not json").unwrap_err();
        assert!(matches!(err, RosterError::ParseError(_)));
        assert!(store.list_users().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let store = Store::new();
        let err = seed_from_file(&store, "no/such/roster.json").unwrap_err();
        assert!(matches!(err, RosterError::IoError(_)));
    }
}
