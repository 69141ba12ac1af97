// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the extraction pipeline.
//!
//! Handles:
//! - Refresh-token exchange for a short-lived access token
//! - Time-windowed activity listing with size-based pagination
//! - Per-activity detail fetch (opaque JSON, all efforts included)
//! - Rate limit / auth error detection per response status

use crate::error::AppError;
use crate::time_utils::TimeWindow;
use serde::Deserialize;

/// Strava's maximum (and our fixed) page size for activity listing.
const DEFAULT_PAGE_SIZE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    page_size: u32,
}

impl StravaClient {
    /// Create a new Strava client for the given OAuth application.
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            client_id,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Point the client at a different API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the listing page size (tests; production uses 200).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The provider may rotate the refresh token in its response; the rotated
    /// value is not persisted here — the mounted secret stays the source of
    /// truth for subsequent runs.
    pub async fn refresh_token(
        &self,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<AccessToken, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", client_secret),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Request(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Token refresh rejected: HTTP {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Request(format!("Malformed token response: {}", e)))?;

        let token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Auth("Token response missing access_token".to_string()))?;

        Ok(AccessToken {
            token: token.to_string(),
            expires_at: body.get("expires_at").and_then(|v| v.as_i64()),
        })
    }

    /// List every activity id created within the window, in page order then
    /// within-page order.
    ///
    /// Strava's pagination contract is size-based: a page shorter than
    /// `per_page` (including empty) is the last one. When the final real page
    /// is exactly full this costs one extra request that returns empty.
    pub async fn list_activity_ids(
        &self,
        access_token: &str,
        window: TimeWindow,
    ) -> Result<Vec<u64>, AppError> {
        let mut ids = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch = self.list_activities(access_token, window, page).await?;
            let count = batch.len();
            ids.extend(batch.into_iter().map(|summary| summary.id));

            if count < self.page_size as usize {
                break;
            }
            page += 1;
        }

        Ok(ids)
    }

    /// Fetch one page of activity summaries within the window.
    async fn list_activities(
        &self,
        access_token: &str,
        window: TimeWindow,
        page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", window.after.to_string()),
                ("before", window.before.to_string()),
                ("per_page", self.page_size.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Request(format!("Activity list request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Get the full record for one activity, including all sub-efforts.
    ///
    /// The schema is owned by Strava; the record is passed through as opaque
    /// JSON and nothing beyond the id used to fetch it is assumed.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!(
            "{}/activities/{}?include_all_efforts=true",
            self.base_url, activity_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Request(format!("Activity detail request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(AppError::RateLimit(format!("HTTP 429: {}", body)));
            }

            if status.as_u16() == 401 {
                return Err(AppError::Auth(format!("HTTP 401: {}", body)));
            }

            return Err(AppError::Request(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Request(format!("JSON parse error: {}", e)))
    }
}

/// Access token produced by one refresh, valid for one pipeline run.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// Unix expiry reported by Strava; logged, never checked (the token
    /// outlives any single run by hours).
    pub expires_at: Option<i64>,
}

/// Summary activity from the list endpoint. Only the id is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_ignores_provider_fields_beyond_id() {
        let json = r#"{"id": 987654, "name": "Morning Ride", "distance": 24301.5, "sport_type": "Ride"}"#;

        let summary: ActivitySummary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.id, 987654);
    }

    #[test]
    fn summary_without_id_fails_to_parse() {
        let json = r#"{"name": "Morning Ride"}"#;

        assert!(serde_json::from_str::<ActivitySummary>(json).is_err());
    }
}
