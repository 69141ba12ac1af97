// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extraction trigger route.
//!
//! Called on a schedule by Cloud Scheduler, not directly by users. The
//! request body is the trigger's payload and carries no meaning; it is
//! accepted and ignored. A non-2xx response tells the scheduler to retry
//! the whole run.

use crate::error::Result;
use crate::services::{ExtractionPipeline, ExtractionReport};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Trigger routes (called by the scheduler).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/extract-activities", post(extract_activities))
}

/// Run one extraction (called by Cloud Scheduler).
async fn extract_activities(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ExtractionReport>> {
    tracing::info!(
        trigger_payload_bytes = body.len(),
        "Extraction triggered"
    );

    let pipeline = ExtractionPipeline::new(
        state.strava.clone(),
        state.secrets.clone(),
        state.sink.clone(),
    );

    let report = pipeline.run(&state.config).await?;

    tracing::info!(
        activities = report.activities,
        bytes = report.bytes,
        object = %report.object,
        "Extraction run succeeded"
    );

    Ok(Json(report))
}
