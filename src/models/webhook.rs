// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava webhook event payload.

use serde::Deserialize;

/// Push notification sent by Strava for object changes.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub object_type: String, // "activity" or "athlete"
    pub object_id: u64,
    pub aspect_type: String, // "create", "update", "delete"
    #[serde(default)]
    pub owner_id: u64,
    #[serde(default)]
    pub subscription_id: Option<u64>,
    #[serde(default)]
    pub event_time: Option<i64>,
}

impl WebhookEvent {
    /// Only newly created activities are enriched.
    pub fn is_activity_create(&self) -> bool {
        self.object_type == "activity" && self.aspect_type == "create"
    }
}
