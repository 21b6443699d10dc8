// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run CRUD and lifecycle routes.

use crate::error::{AppError, Result};
use crate::models::{Run, RunStatus, User};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::MessageResponse;

/// Run routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/runs", get(list_runs).post(create_run))
        .route("/api/runs/{id}", get(get_run).delete(delete_run))
        .route("/api/runs/{id}/start", post(start_run))
        .route("/api/runs/{id}/stop", post(stop_run))
}

// ─── Run CRUD ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRunRequest {
    pub athlete_id: u64,
    #[serde(default)]
    pub comment: String,
}

/// Owning athlete, embedded in every run response.
#[derive(Serialize)]
pub struct AthleteSummary {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize)]
pub struct RunResponse {
    #[serde(flatten)]
    pub run: Run,
    pub athlete_data: AthleteSummary,
}

fn run_response(run: Run, athlete: &User) -> RunResponse {
    RunResponse {
        run,
        athlete_data: AthleteSummary {
            id: athlete.id,
            username: athlete.username.clone(),
            first_name: athlete.first_name.clone(),
            last_name: athlete.last_name.clone(),
        },
    }
}

#[derive(Deserialize)]
struct RunsQuery {
    /// Filter by lifecycle status.
    status: Option<RunStatus>,
    /// Filter by owning athlete.
    athlete: Option<u64>,
}

async fn list_runs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunsQuery>,
) -> Result<Json<Vec<RunResponse>>> {
    let runs = state.store.list_runs(query.status, query.athlete);

    let mut responses = Vec::with_capacity(runs.len());
    for run in runs {
        let Some(athlete) = state.store.get_user(run.athlete_id) else {
            tracing::warn!(
                run_id = run.id,
                athlete_id = run.athlete_id,
                "Run references an unknown athlete; skipping"
            );
            continue;
        };
        responses.push(run_response(run, &athlete));
    }

    Ok(Json(responses))
}

async fn create_run(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRunRequest>,
) -> Result<(StatusCode, Json<RunResponse>)> {
    let athlete = state
        .store
        .get_user(payload.athlete_id)
        .ok_or_else(|| AppError::NotFound(format!("athlete {}", payload.athlete_id)))?;

    let run = state.store.create_run(athlete.id, &payload.comment);
    tracing::info!(run_id = run.id, athlete_id = athlete.id, "Run created");

    Ok((StatusCode::CREATED, Json(run_response(run, &athlete))))
}

async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<RunResponse>> {
    let run = state
        .store
        .get_run(id)
        .ok_or_else(|| AppError::NotFound(format!("run {id}")))?;

    let athlete = state.store.get_user(run.athlete_id).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "run {} references unknown athlete {}",
            run.id,
            run.athlete_id
        ))
    })?;

    Ok(Json(run_response(run, &athlete)))
}

async fn delete_run(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Result<StatusCode> {
    state
        .store
        .delete_run(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("run {id}")))?;

    tracing::info!(run_id = id, "Run deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Lifecycle Transitions ───────────────────────────────────

async fn start_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>> {
    state.lifecycle.start(id).await?;
    Ok(Json(MessageResponse {
        message: "Run has started".to_string(),
    }))
}

async fn stop_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>> {
    state.lifecycle.finish(id).await?;
    Ok(Json(MessageResponse {
        message: "Run has finished".to_string(),
    }))
}
