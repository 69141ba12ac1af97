// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Exporter service
//!
//! Extracts recent Strava activities on an external schedule and persists
//! them as newline-delimited JSON in Cloud Storage for analytics ingestion.

use std::sync::Arc;
use strava_exporter::{
    config::Config,
    secrets::MountedSecretSource,
    services::{GcsSink, StravaClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Strava-Exporter");

    // Initialize the GCS sink (application-default credentials)
    let sink = GcsSink::new().await.expect("Failed to initialize GCS sink");
    tracing::info!(bucket = %config.gcs_bucket, "GCS sink initialized");

    // Strava API client; secrets are resolved per run from their mounts
    let strava = StravaClient::new(config.strava_client_id.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
        secrets: Arc::new(MountedSecretSource),
        sink: Arc::new(sink),
    });

    // Build router
    let app = strava_exporter::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_exporter=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
