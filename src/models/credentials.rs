// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth client credentials plus the cached token triple.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Strava OAuth client ID
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived renewal token
    pub refresh_token: String,
    /// When the access token expires (Unix seconds)
    pub expires_at: i64,
}

impl Credentials {
    /// A token is usable only while its expiry is strictly in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp()
    }

    /// Replace the token triple with the values returned by a refresh.
    pub fn with_tokens(&self, access_token: String, refresh_token: String, expires_at: i64) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Expiry rendered for logs.
    pub fn expires_at_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.expires_at, 0)
            .map(crate::time_utils::format_utc_rfc3339)
            .unwrap_or_else(|| self.expires_at.to_string())
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
