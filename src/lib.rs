// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Exporter: periodic Strava activity extraction to Cloud Storage
//!
//! This crate pulls an athlete's recent activities from the Strava API on an
//! external schedule and writes the batch as newline-delimited JSON to GCS
//! for downstream BigQuery ingestion.

pub mod config;
pub mod error;
pub mod routes;
pub mod secrets;
pub mod services;
pub mod time_utils;

use config::Config;
use secrets::SecretSource;
use services::{ObjectSink, StravaClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub secrets: Arc<dyn SecretSource>,
    pub sink: Arc<dyn ObjectSink>,
}
