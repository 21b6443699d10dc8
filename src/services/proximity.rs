// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collectible item proximity detection.

use crate::geodesy;
use crate::models::CollectibleItem;
use crate::store::Store;

/// Radius around a fix within which an item counts as collected, in meters.
const COLLECT_RADIUS_METERS: f64 = 100.0;

/// Attaches nearby collectible items to a moving athlete.
#[derive(Clone)]
pub struct ProximityDetector {
    store: Store,
}

impl ProximityDetector {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Attach every unowned item within [`COLLECT_RADIUS_METERS`] of the fix.
    ///
    /// Items the athlete already holds are excluded before the distance
    /// check, so re-detection cannot happen. An item with unusable
    /// coordinates is skipped, never fatal to the sweep. Returns the newly
    /// attached items.
    pub fn detect(&self, latitude: f64, longitude: f64, athlete_id: u64) -> Vec<CollectibleItem> {
        let mut collected = Vec::new();

        for mut item in self.store.items_not_owned_by(athlete_id) {
            if !geodesy::in_latitude_range(item.latitude)
                || !geodesy::in_longitude_range(item.longitude)
            {
                tracing::warn!(
                    item_id = item.id,
                    latitude = item.latitude,
                    longitude = item.longitude,
                    "Skipping item with out-of-range coordinates"
                );
                continue;
            }

            let meters =
                geodesy::distance_meters((latitude, longitude), (item.latitude, item.longitude));
            if !meters.is_finite() {
                tracing::warn!(item_id = item.id, "Skipping item with unusable distance");
                continue;
            }

            if meters <= COLLECT_RADIUS_METERS && self.store.attach_item_owner(item.id, athlete_id)
            {
                tracing::info!(item_id = item.id, athlete_id, meters, "Collectible item attached");
                // The snapshot predates the attach; reflect it before returning
                item.owners.insert(athlete_id);
                collected.push(item);
            }
        }

        collected
    }
}
