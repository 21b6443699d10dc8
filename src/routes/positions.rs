// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Position (GPS fix) routes.

use crate::error::{AppError, Result};
use crate::models::Position;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Position routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/positions", get(list_positions).post(create_position))
        .route("/api/positions/{id}", get(get_position).delete(delete_position))
}

#[derive(Deserialize)]
pub struct CreatePositionRequest {
    pub run_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Device-reported sample time; optional.
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct PositionsQuery {
    /// Filter by run.
    run: Option<u64>,
}

async fn list_positions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PositionsQuery>,
) -> Result<Json<Vec<Position>>> {
    Ok(Json(state.store.list_positions(query.run)))
}

/// Record one fix. The stored record carries the derived cumulative
/// distance and instantaneous speed.
async fn create_position(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePositionRequest>,
) -> Result<(StatusCode, Json<Position>)> {
    let position = state
        .ingestor
        .ingest(
            payload.run_id,
            payload.latitude,
            payload.longitude,
            payload.timestamp,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(position)))
}

async fn get_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Position>> {
    let position = state
        .store
        .get_position(id)
        .ok_or_else(|| AppError::NotFound(format!("position {id}")))?;
    Ok(Json(position))
}

async fn delete_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state
        .store
        .delete_position(id)
        .ok_or_else(|| AppError::NotFound(format!("position {id}")))?;
    Ok(StatusCode::NO_CONTENT)
}
