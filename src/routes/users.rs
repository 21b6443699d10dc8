// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User roster and athlete profile routes.

use crate::error::{AppError, Result};
use crate::models::{AthleteInfo, UserRole};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::items::ItemResponse;
use super::MessageResponse;

/// User routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user))
        .route(
            "/api/athlete_info/{id}",
            get(get_athlete_info).put(put_athlete_info),
        )
}

// ─── Roster ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct UsersQuery {
    /// Filter by role ("athlete" or "coach").
    #[serde(rename = "type")]
    role: Option<UserRole>,
}

/// One roster row.
#[derive(Serialize)]
pub struct UserSummary {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub runs_finished: usize,
}

/// Detail response; athletes additionally carry their collected items.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserDetailResponse {
    Coach {
        id: u64,
        username: String,
        first_name: String,
        last_name: String,
        joined_at: DateTime<Utc>,
        runs_finished: usize,
    },
    Athlete {
        id: u64,
        username: String,
        first_name: String,
        last_name: String,
        joined_at: DateTime<Utc>,
        runs_finished: usize,
        items: Vec<ItemResponse>,
    },
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<UserSummary>>> {
    let users = state
        .store
        .list_users()
        .into_iter()
        .filter(|user| query.role.is_none_or(|role| user.role == role))
        .map(|user| UserSummary {
            runs_finished: state.store.finished_run_count(user.id),
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            joined_at: user.joined_at,
            role: user.role,
        })
        .collect();

    Ok(Json(users))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<UserDetailResponse>> {
    let user = state
        .store
        .get_user(id)
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    let runs_finished = state.store.finished_run_count(user.id);

    let detail = match user.role {
        UserRole::Coach => UserDetailResponse::Coach {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            joined_at: user.joined_at,
            runs_finished,
        },
        UserRole::Athlete => UserDetailResponse::Athlete {
            items: state
                .store
                .items_owned_by(user.id)
                .into_iter()
                .map(ItemResponse::from)
                .collect(),
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            joined_at: user.joined_at,
            runs_finished,
        },
    };

    Ok(Json(detail))
}

// ─── Athlete Profile ─────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct AthleteInfoUpdate {
    /// Weight in kilograms.
    #[validate(range(min = 1, max = 899))]
    pub weight: Option<u16>,
    /// Free-text training goals.
    #[validate(length(max = 140))]
    pub goals: Option<String>,
}

async fn get_athlete_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<AthleteInfo>> {
    state
        .store
        .get_user(id)
        .ok_or_else(|| AppError::NotFound(format!("athlete {id}")))?;

    let info = match state.store.get_athlete_info(id) {
        Some(info) => info,
        None => {
            // First read creates and persists the empty profile.
            let info = AthleteInfo::empty(id);
            state.store.set_athlete_info(&info);
            info
        }
    };

    Ok(Json(info))
}

/// Create or replace a profile. Both fields are written, so an omitted
/// field clears the stored value.
async fn put_athlete_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<AthleteInfoUpdate>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state
        .store
        .get_user(id)
        .ok_or_else(|| AppError::NotFound(format!("athlete {id}")))?;

    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let info = AthleteInfo {
        athlete_id: id,
        weight: payload.weight,
        goals: payload.goals,
    };
    state.store.set_athlete_info(&info);
    tracing::info!(athlete_id = id, "Athlete info saved");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Athlete Info has created or updated".to_string(),
        }),
    ))
}
