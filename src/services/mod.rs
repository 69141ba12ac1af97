// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod extractor;
pub mod gcs;
pub mod strava;

pub use extractor::{ExtractionPipeline, ExtractionReport};
pub use gcs::{GcsSink, MemorySink, ObjectSink};
pub use strava::StravaClient;
