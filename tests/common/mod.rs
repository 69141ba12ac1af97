// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde_json::json;
use std::sync::Arc;
use strava_exporter::config::Config;
use strava_exporter::secrets::MemorySecretSource;
use strava_exporter::services::{ExtractionPipeline, MemorySink, StravaClient};
use strava_exporter::AppState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Secret values behind the references in `Config::test_default()`.
#[allow(dead_code)]
pub const CLIENT_SECRET: &str = "test-client-secret";
#[allow(dead_code)]
pub const REFRESH_TOKEN: &str = "test-refresh-token";

/// Access token the mocked OAuth endpoint hands out.
#[allow(dead_code)]
pub const ACCESS_TOKEN: &str = "mock-access-token";

/// Memory secret source matching the references in `Config::test_default()`.
#[allow(dead_code)]
pub fn test_secrets() -> Arc<MemorySecretSource> {
    Arc::new(MemorySecretSource::new([
        ("client_secret", CLIENT_SECRET),
        ("refresh_token", REFRESH_TOKEN),
    ]))
}

/// A Strava client pointed at the mock server.
#[allow(dead_code)]
pub fn test_strava_client(server: &MockServer, page_size: u32) -> StravaClient {
    StravaClient::new("test_client_id".to_string())
        .with_base_url(server.uri())
        .with_page_size(page_size)
}

/// Pipeline wired to the mock server, memory secrets, and a memory sink.
#[allow(dead_code)]
pub fn test_pipeline(server: &MockServer, page_size: u32) -> (ExtractionPipeline, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let pipeline = ExtractionPipeline::new(
        test_strava_client(server, page_size),
        test_secrets(),
        sink.clone(),
    );
    (pipeline, sink)
}

/// Test app wired like `test_pipeline`, for router-level tests.
/// Returns the router and the sink for upload assertions.
#[allow(dead_code)]
pub fn create_test_app(server: &MockServer) -> (axum::Router, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let state = Arc::new(AppState {
        config: Config::test_default(),
        strava: test_strava_client(server, 200),
        secrets: test_secrets(),
        sink: sink.clone(),
    });
    (strava_exporter::routes::create_router(state), sink)
}

/// Mount a successful refresh-token exchange on the mock server.
#[allow(dead_code)]
pub async fn mount_token_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": ACCESS_TOKEN,
            "expires_at": 1_900_000_000i64,
            "expires_in": 21600,
            "refresh_token": "rotated-refresh-token"
        })))
        .mount(server)
        .await;
}
