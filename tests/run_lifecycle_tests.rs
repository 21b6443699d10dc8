// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run CRUD and lifecycle transition tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_create_run_embeds_athlete_data() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/api/runs",
        Some(json!({ "athlete_id": athlete.id, "comment": "morning loop" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "init");
    assert_eq!(body["comment"], "morning loop");
    assert_eq!(body["athlete_id"], athlete.id);
    assert_eq!(body["athlete_data"]["username"], "jsmith");
    assert_eq!(body["athlete_data"]["first_name"], "Test");
    assert!(body["distance"].is_null());
    assert!(body["run_time_seconds"].is_null());
    assert!(body["speed"].is_null());
}

#[tokio::test]
async fn test_create_run_comment_is_optional() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/api/runs",
        Some(json!({ "athlete_id": athlete.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"], "");
}

#[tokio::test]
async fn test_create_run_for_unknown_athlete() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send_json(
        &app,
        "POST",
        "/api/runs",
        Some(json!({ "athlete_id": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_start_and_stop_report_messages() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");
    let run = state.store.create_run(athlete.id, "");

    let uri = format!("/api/runs/{}/start", run.id);
    let (status, body) = common::send_json(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Run has started");

    let (_, body) = common::send_json(&app, "GET", &format!("/api/runs/{}", run.id), None).await;
    assert_eq!(body["status"], "in_progress");

    let uri = format!("/api/runs/{}/stop", run.id);
    let (status, body) = common::send_json(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Run has finished");

    // A run finished without fixes still gets its totals derived
    let (_, body) = common::send_json(&app, "GET", &format!("/api/runs/{}", run.id), None).await;
    assert_eq!(body["status"], "finished");
    assert_eq!(body["distance"], 0.0);
    assert!(body["run_time_seconds"].is_null());
    assert!(body["speed"].is_null());
}

#[tokio::test]
async fn test_start_rejects_runs_not_in_init() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");
    let run = state.store.create_run(athlete.id, "");

    let uri = format!("/api/runs/{}/start", run.id);
    let (status, _) = common::send_json(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send_json(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("must be in status \"init\""));
    assert!(details.contains("current status: \"in_progress\""));
}

#[tokio::test]
async fn test_stop_rejects_runs_not_in_progress() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");
    let run = state.store.create_run(athlete.id, "");

    let uri = format!("/api/runs/{}/stop", run.id);
    let (status, body) = common::send_json(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");
}

#[tokio::test]
async fn test_transitions_on_unknown_run() {
    let (app, _state) = common::create_test_app();

    let (status, _) = common::send_json(&app, "POST", "/api/runs/99/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send_json(&app, "POST", "/api/runs/99/stop", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send_json(&app, "GET", "/api/runs/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_run_removes_positions() {
    let (app, state) = common::create_test_app();
    let athlete = common::seed_athlete(&state, "jsmith");
    let run = state.store.create_run(athlete.id, "");
    state.lifecycle.start(run.id).await.unwrap();
    state
        .ingestor
        .ingest(run.id, 50.4501, 30.5234, None)
        .await
        .unwrap();

    let (status, body) =
        common::send_json(&app, "DELETE", &format!("/api/runs/{}", run.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = common::send_json(&app, "GET", &format!("/api/runs/{}", run.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/positions?run={}", run.id);
    let (_, body) = common::send_json(&app, "GET", &uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_runs_filters_by_status_and_athlete() {
    let (app, state) = common::create_test_app();
    let jane = common::seed_athlete(&state, "jane");
    let erik = common::seed_athlete(&state, "erik");

    let first = state.store.create_run(jane.id, "");
    state.store.create_run(jane.id, "");
    let third = state.store.create_run(erik.id, "");

    state.lifecycle.start(first.id).await.unwrap();
    state.lifecycle.finish(first.id).await.unwrap();
    state.lifecycle.start(third.id).await.unwrap();

    let (_, body) = common::send_json(&app, "GET", "/api/runs", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = common::send_json(&app, "GET", "/api/runs?status=finished", None).await;
    let finished = body.as_array().unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0]["id"], first.id);

    let uri = format!("/api/runs?athlete={}", jane.id);
    let (_, body) = common::send_json(&app, "GET", &uri, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let uri = format!("/api/runs?status=in_progress&athlete={}", erik.id);
    let (_, body) = common::send_json(&app, "GET", &uri, None).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], third.id);
    assert_eq!(rows[0]["athlete_data"]["username"], "erik");
}
