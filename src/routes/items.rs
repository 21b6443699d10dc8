// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collectible item routes.

use crate::error::Result;
use crate::models::CollectibleItem;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Collectible item routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/collectible_items", get(list_items))
        .route("/api/collectible_items/import", post(import_items))
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: u64,
    pub name: String,
    pub uid: String,
    pub latitude: f64,
    pub longitude: f64,
    pub picture: String,
    pub value: i64,
    /// Owner ids in ascending order.
    pub owners: Vec<u64>,
}

impl From<CollectibleItem> for ItemResponse {
    fn from(item: CollectibleItem) -> Self {
        let owners = item.owner_ids_sorted();
        Self {
            id: item.id,
            name: item.name,
            uid: item.uid,
            latitude: item.latitude,
            longitude: item.longitude,
            picture: item.picture,
            value: item.value,
            owners,
        }
    }
}

async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ItemResponse>>> {
    let items = state
        .store
        .list_items()
        .into_iter()
        .map(ItemResponse::from)
        .collect();
    Ok(Json(items))
}

// ─── Catalogue Import ────────────────────────────────────────

/// One pre-parsed catalogue row.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ItemRow {
    #[validate(length(min = 1, max = 140))]
    pub name: String,
    #[validate(length(min = 1, max = 140))]
    pub uid: String,
    pub value: i64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Picture URL.
    #[validate(url)]
    pub picture: String,
}

#[derive(Serialize)]
pub struct RejectedRow {
    #[serde(flatten)]
    pub row: ItemRow,
    pub errors: Vec<String>,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub created: usize,
    pub rejected: Vec<RejectedRow>,
}

/// Bulk-import collectible items from pre-parsed catalogue rows.
///
/// Valid rows are created; invalid rows come back with their field
/// errors. The response is 200 either way.
async fn import_items(
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<ItemRow>>,
) -> Result<Json<ImportResponse>> {
    let mut created = 0;
    let mut rejected = Vec::new();

    for row in rows {
        match row.validate() {
            Ok(()) => {
                state.store.create_item(
                    &row.name,
                    &row.uid,
                    row.latitude,
                    row.longitude,
                    &row.picture,
                    row.value,
                );
                created += 1;
            }
            Err(invalid) => {
                let errors = invalid.to_string().lines().map(str::to_string).collect();
                rejected.push(RejectedRow { row, errors });
            }
        }
    }

    tracing::info!(
        created,
        rejected = rejected.len(),
        "Collectible item import finished"
    );
    Ok(Json(ImportResponse { created, rejected }))
}
