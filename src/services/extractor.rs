// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity extraction pipeline.
//!
//! Handles the core workflow:
//! 1. Resolve credentials and refresh the access token
//! 2. Compute the lookback window
//! 3. List activity ids in the window (paginated)
//! 4. Fetch the detail record for each id
//! 5. Serialize the batch as newline-delimited JSON
//! 6. Upload the batch to the object sink
//!
//! The run is fail-fast: any error before the upload step aborts the run and
//! nothing is written, so the sink only ever holds complete batches.

use crate::config::Config;
use crate::error::AppError;
use crate::secrets::SecretSource;
use crate::services::gcs::ObjectSink;
use crate::services::strava::StravaClient;
use crate::time_utils::TimeWindow;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Bounded concurrency for detail fetches. Strava's per-app rate limits are
/// tight, so this stays far below what the runtime could sustain.
const MAX_CONCURRENT_DETAIL_FETCHES: usize = 8;

/// Content type of the uploaded batch.
const BATCH_CONTENT_TYPE: &str = "application/json";

/// Summary of one completed extraction run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractionReport {
    /// Number of activities in the batch.
    pub activities: usize,
    /// Size of the uploaded payload in bytes.
    pub bytes: usize,
    /// Object name the batch was written to.
    pub object: String,
}

/// Orchestrates one extraction run end to end.
pub struct ExtractionPipeline {
    strava: StravaClient,
    secrets: Arc<dyn SecretSource>,
    sink: Arc<dyn ObjectSink>,
}

impl ExtractionPipeline {
    pub fn new(
        strava: StravaClient,
        secrets: Arc<dyn SecretSource>,
        sink: Arc<dyn ObjectSink>,
    ) -> Self {
        Self {
            strava,
            secrets,
            sink,
        }
    }

    /// Run one extraction and upload the resulting batch.
    pub async fn run(&self, config: &Config) -> Result<ExtractionReport, AppError> {
        // 1. Resolve secrets and refresh the access token. Each run performs
        //    a fresh refresh; tokens are never cached across runs.
        let client_secret = self.secrets.read(&config.client_secret_ref)?;
        let refresh_token = self.secrets.read(&config.refresh_token_ref)?;

        let access_token = self
            .strava
            .refresh_token(&client_secret, &refresh_token)
            .await?;
        tracing::info!(expires_at = access_token.expires_at, "Access token refreshed");

        // 2. Compute the lookback window for this run.
        let window = TimeWindow::lookback(
            chrono::Utc::now(),
            config.window_offset_secs,
            config.window_secs,
        );

        // 3. List activity ids created within the window.
        let ids = self
            .strava
            .list_activity_ids(&access_token.token, window)
            .await?;
        tracing::info!(
            after = window.after,
            before = window.before,
            count = ids.len(),
            "Listed activities in window"
        );

        // 4. Fetch details concurrently. `buffered` yields results in
        //    submission order, so the batch preserves list order regardless
        //    of completion order.
        let token = access_token.token.as_str();
        let batch: Vec<serde_json::Value> = stream::iter(ids.iter().copied())
            .map(|id| self.strava.get_activity(token, id))
            .buffered(MAX_CONCURRENT_DETAIL_FETCHES)
            .try_collect()
            .await?;

        // 5. Serialize as one JSON object per line (BigQuery load format).
        //    An empty window still produces a valid (zero-byte) object.
        let payload = to_ndjson(&batch)?;

        // 6. Upload, overwriting the previous batch under the same name.
        let bytes = payload.len();
        self.sink
            .upload(
                &config.gcs_bucket,
                &config.gcs_object,
                BATCH_CONTENT_TYPE,
                payload.into_bytes(),
            )
            .await?;

        tracing::info!(
            activities = batch.len(),
            bytes,
            bucket = %config.gcs_bucket,
            object = %config.gcs_object,
            "Extraction run complete"
        );

        Ok(ExtractionReport {
            activities: batch.len(),
            bytes,
            object: config.gcs_object.clone(),
        })
    }
}

/// Serialize the batch as newline-delimited JSON, no trailing newline.
fn to_ndjson(batch: &[serde_json::Value]) -> Result<String, AppError> {
    let mut lines = Vec::with_capacity(batch.len());
    for record in batch {
        lines.push(
            serde_json::to_string(record).map_err(|e| AppError::Serialization(e.to_string()))?,
        );
    }
    Ok(lines.join("\n"))
}
