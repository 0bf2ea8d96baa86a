// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching and updating activities.
//!
//! Handles:
//! - Activity fetching
//! - Partial activity updates (name and description only)
//! - The refresh-token grant used by the token manager
//!
//! Every call is a single attempt. Failures go back to the caller unchanged.

use crate::error::AppError;
use crate::models::{ActivityRecord, ActivityUpdate, StravaActivity};
use crate::services::TokenManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a new Strava client for `base_url` (e.g. `https://www.strava.com/api/v3`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("GET {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status == 429 {
                tracing::warn!(activity_id, "Strava rate limit hit (429)");
            }
            return Err(AppError::NotFound { status, body });
        }

        decode_json(response).await
    }

    /// Update an activity's name and description.
    ///
    /// The body carries exactly those two fields so nothing else on the
    /// activity is overwritten.
    pub async fn update_activity(
        &self,
        access_token: &str,
        activity_id: u64,
        update: &ActivityUpdate,
    ) -> Result<(), AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);

        let response = self
            .http
            .put(&url)
            .bearer_auth(access_token)
            .json(update)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("PUT {}: {}", url, e)))?;

        check_response(response).await
    }

    /// Exchange a refresh token for a new token triple.
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let url = format!("{}/oauth/token", self.base_url);

        let body = TokenRefreshRequest {
            client_id,
            client_secret,
            grant_type: "refresh_token",
            refresh_token,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::TokenRefresh(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenRefresh(format!("HTTP {}: {}", status, body)));
        }

        let tokens: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenRefresh(format!("invalid token response: {}", e)))?;

        if tokens.access_token.is_empty() {
            return Err(AppError::TokenRefresh(
                "token response without access_token".to_string(),
            ));
        }

        Ok(tokens)
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    if status == 429 {
        tracing::warn!("Strava rate limit hit (429)");
    }

    Err(AppError::Remote { status, body })
}

/// Read the body and parse it, keeping the raw text for diagnostics.
async fn decode_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Transport(format!("Failed to read body: {}", e)))?;

    serde_json::from_str(&text).map_err(|e| AppError::Decode(format!("{}: {}", e, text)))
}

/// Refresh-token grant body.
#[derive(Serialize)]
struct TokenRefreshRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    refresh_token: &'a str,
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - Activity gateway with token management
// ─────────────────────────────────────────────────────────────────────────────

/// Authenticated activity operations.
///
/// Each call asks the [`TokenManager`] for a valid token first, so a stale
/// token never reaches Strava.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: Arc<TokenManager>,
}

impl StravaService {
    pub fn new(client: StravaClient, tokens: Arc<TokenManager>) -> Self {
        Self { client, tokens }
    }

    /// Fetch an activity's metadata.
    pub async fn fetch(&self, activity_id: u64) -> Result<ActivityRecord, AppError> {
        let access_token = self.tokens.get_valid_access_token().await?;
        let activity = self.client.get_activity(&access_token, activity_id).await?;

        tracing::debug!(activity_id, "Fetched Strava activity");
        Ok(activity.into_record(activity_id))
    }

    /// Push a new name and description.
    pub async fn update(
        &self,
        activity_id: u64,
        name: &str,
        description: &str,
    ) -> Result<(), AppError> {
        let access_token = self.tokens.get_valid_access_token().await?;
        let update = ActivityUpdate {
            name: name.to_string(),
            description: description.to_string(),
        };
        self.client
            .update_activity(&access_token, activity_id, &update)
            .await
    }
}
