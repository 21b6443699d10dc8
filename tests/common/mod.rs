// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use stride_tracker::config::Config;
use stride_tracker::models::{User, UserRole};
use stride_tracker::routes::create_router;
use stride_tracker::services::{
    AchievementEngine, PositionIngestor, ProximityDetector, RunLifecycle,
};
use stride_tracker::store::Store;
use stride_tracker::AppState;
use tower::ServiceExt;

/// Create a test app over a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let store = Store::new();

    let proximity = ProximityDetector::new(store.clone());
    let achievements = AchievementEngine::new(store.clone());
    let ingestor = PositionIngestor::new(store.clone(), proximity);
    let lifecycle = RunLifecycle::new(store.clone(), achievements);

    let state = Arc::new(AppState {
        config,
        store,
        ingestor,
        lifecycle,
    });

    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn seed_athlete(state: &AppState, username: &str) -> User {
    state
        .store
        .create_user(username, "Test", "Athlete", UserRole::Athlete)
}

#[allow(dead_code)]
pub fn seed_coach(state: &AppState, username: &str) -> User {
    state
        .store
        .create_user(username, "Test", "Coach", UserRole::Coach)
}

/// One-shot a request against a clone of the router and parse the JSON body.
/// Empty bodies come back as `Value::Null`.
#[allow(dead_code)]
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    // Axum's own rejections are plain text; surface those as strings
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}
