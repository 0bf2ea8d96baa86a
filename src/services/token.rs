// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle.
//!
//! A credential set is either valid (expiry in the future) or expired. The
//! only transition is expired -> valid through a successful refresh. A revoked
//! refresh token just makes the refresh fail; there is no retry.

use crate::db::CredentialStore;
use crate::error::AppError;
use crate::models::Credentials;
use crate::services::strava::StravaClient;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Outcome of [`resolve_access_token`].
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    pub access_token: String,
    pub credentials: Credentials,
    pub refreshed: bool,
}

/// Return a usable access token for `credentials` as of `now`.
///
/// A valid token comes back untouched without any network call. An expired one
/// is exchanged through the refresh-token grant and the new triple replaces the
/// old one in the returned credentials.
pub async fn resolve_access_token(
    client: &StravaClient,
    credentials: Credentials,
    now: DateTime<Utc>,
) -> Result<ResolvedToken, AppError> {
    if credentials.is_valid_at(now) {
        tracing::debug!(
            expires_at = %credentials.expires_at_rfc3339(),
            "Token is still valid"
        );
        return Ok(ResolvedToken {
            access_token: credentials.access_token.clone(),
            credentials,
            refreshed: false,
        });
    }

    tracing::info!(
        expired_at = %credentials.expires_at_rfc3339(),
        "Access token expired, refreshing"
    );

    let response = client
        .refresh_token(
            &credentials.client_id,
            &credentials.client_secret,
            &credentials.refresh_token,
        )
        .await?;

    let updated = credentials.with_tokens(
        response.access_token,
        response.refresh_token,
        response.expires_at,
    );

    Ok(ResolvedToken {
        access_token: updated.access_token.clone(),
        credentials: updated,
        refreshed: true,
    })
}

/// Owns the live credential set and serializes refreshes.
///
/// The whole check -> refresh -> persist sequence runs under one lock, so
/// concurrent enrichments never race two refresh exchanges.
pub struct TokenManager {
    client: StravaClient,
    store: CredentialStore,
    credentials: Mutex<Credentials>,
}

impl TokenManager {
    pub fn new(client: StravaClient, store: CredentialStore, credentials: Credentials) -> Self {
        Self {
            client,
            store,
            credentials: Mutex::new(credentials),
        }
    }

    /// Build a manager from whatever the store currently holds.
    pub async fn from_store(client: StravaClient, store: CredentialStore) -> Result<Self, AppError> {
        let credentials = store
            .load()
            .await?
            .ok_or_else(|| AppError::Credentials("No stored credentials".to_string()))?;
        Ok(Self::new(client, store, credentials))
    }

    /// Get a valid (non-expired) access token, refreshing if needed.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut guard = self.credentials.lock().await;

        let resolved = resolve_access_token(&self.client, guard.clone(), Utc::now()).await?;
        if !resolved.refreshed {
            return Ok(resolved.access_token);
        }

        // The new triple is live even if persisting it fails; the old refresh
        // token may already be invalid on Strava's side.
        *guard = resolved.credentials.clone();

        if let Err(e) = self.store.save(&resolved.credentials).await {
            tracing::error!(error = %e, "Failed to persist refreshed credentials");
        } else {
            tracing::info!(
                expires_at = %resolved.credentials.expires_at_rfc3339(),
                "Token refreshed and persisted"
            );
        }

        Ok(resolved.access_token)
    }

    /// Snapshot of the current credentials.
    pub async fn credentials(&self) -> Credentials {
        self.credentials.lock().await.clone()
    }
}
