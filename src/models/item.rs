// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Collectible map item model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A collectible item placed on the map.
///
/// Ownership is monotone: once an athlete is in `owners` they are never
/// removed by this service. Membership is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleItem {
    pub id: u64,
    pub name: String,
    /// External identifier string from the item catalogue.
    pub uid: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Picture URL.
    pub picture: String,
    pub value: i64,
    /// Athletes who have collected this item.
    #[serde(default)]
    pub owners: HashSet<u64>,
}

impl CollectibleItem {
    /// Owner ids in a stable order for API responses.
    pub fn owner_ids_sorted(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.owners.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
