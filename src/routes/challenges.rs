// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge award routes.

use crate::error::Result;
use crate::models::ChallengeKind;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Challenge routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenges", get(list_challenges))
        .route("/api/challenges/summary", get(challenge_summary))
}

// ─── Award Listing ───────────────────────────────────────────

#[derive(Deserialize)]
struct ChallengesQuery {
    /// Filter by athlete.
    athlete: Option<u64>,
}

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub id: u64,
    pub athlete_id: u64,
    pub kind: ChallengeKind,
    pub full_name: &'static str,
}

async fn list_challenges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChallengesQuery>,
) -> Result<Json<Vec<ChallengeResponse>>> {
    let challenges = state
        .store
        .list_challenges(query.athlete)
        .into_iter()
        .map(|challenge| ChallengeResponse {
            id: challenge.id,
            athlete_id: challenge.athlete_id,
            kind: challenge.kind,
            full_name: challenge.kind.display_name(),
        })
        .collect();

    Ok(Json(challenges))
}

// ─── Summary ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SummaryAthlete {
    pub id: u64,
    pub username: String,
    pub full_name: String,
}

#[derive(Serialize)]
pub struct ChallengeSummaryEntry {
    pub name_to_display: &'static str,
    pub athletes: Vec<SummaryAthlete>,
}

/// Awards grouped by kind, in the order each kind was first granted.
/// An athlete appears once per award, so repeatable kinds can list the
/// same athlete more than once.
async fn challenge_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChallengeSummaryEntry>>> {
    let mut groups: Vec<(ChallengeKind, Vec<SummaryAthlete>)> = Vec::new();

    for challenge in state.store.list_challenges(None) {
        let Some(user) = state.store.get_user(challenge.athlete_id) else {
            tracing::warn!(
                challenge_id = challenge.id,
                athlete_id = challenge.athlete_id,
                "Challenge references an unknown athlete; skipping"
            );
            continue;
        };

        let full_name = user.full_name();
        let athlete = SummaryAthlete {
            id: user.id,
            username: user.username,
            full_name,
        };

        match groups.iter_mut().find(|(kind, _)| *kind == challenge.kind) {
            Some((_, athletes)) => athletes.push(athlete),
            None => groups.push((challenge.kind, vec![athlete])),
        }
    }

    let summary = groups
        .into_iter()
        .map(|(kind, athletes)| ChallengeSummaryEntry {
            name_to_display: kind.display_name(),
            athletes,
        })
        .collect();

    Ok(Json(summary))
}
