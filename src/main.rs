// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stride-Tracker API Server
//!
//! Records run telemetry fixes, derives per-run totals at finish and awards
//! challenges when athletes hit their milestones.

use std::sync::Arc;

use stride_tracker::{
    config::Config,
    roster,
    services::{AchievementEngine, PositionIngestor, ProximityDetector, RunLifecycle},
    store::Store,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Stride-Tracker API");

    let store = Store::new();

    // Seed the roster when a file is configured
    if let Some(path) = &config.roster_path {
        tracing::info!(path = %path, "Loading roster");
        let seeded = roster::seed_from_file(&store, path).expect("Failed to load roster");
        tracing::info!(count = seeded, "Roster ready");
    }

    // Wire the services around the shared store
    let proximity = ProximityDetector::new(store.clone());
    let achievements = AchievementEngine::new(store.clone());
    let ingestor = PositionIngestor::new(store.clone(), proximity);
    let lifecycle = RunLifecycle::new(store.clone(), achievements);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        ingestor,
        lifecycle,
    });

    // Build router
    let app = stride_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
