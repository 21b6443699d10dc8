// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health and about endpoint tests.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_health_reports_ok() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["build_id"].is_string());
}

#[tokio::test]
async fn test_about_echoes_service_metadata() {
    let (app, state) = common::create_test_app();

    let (status, body) = common::send_json(&app, "GET", "/api/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service_name"], state.config.service_name);
    assert_eq!(body["slogan"], state.config.slogan);
    assert_eq!(body["contacts"], state.config.contacts);
}
