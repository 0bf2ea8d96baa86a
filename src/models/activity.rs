// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model as seen by the enrichment pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Start coordinates of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Activity fields the pipeline reads.
///
/// The platform owns this record. Only `name` and `description` are ever
/// written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Free-text description (empty when unset)
    pub description: String,
    /// Activity type (Run, Ride, Yoga, ...)
    pub activity_type: String,
    /// Local wall-clock start, e.g. "2025-02-03T16:56:12Z" (no real offset)
    pub start_date_local: String,
    /// Elapsed time in seconds
    pub elapsed_seconds: i64,
    /// Start coordinates; `None` means no GPS
    pub start_coordinates: Option<LatLng>,
}

impl ActivityRecord {
    pub fn is_type_in(&self, types: &HashSet<String>) -> bool {
        types.contains(&self.activity_type)
    }
}

/// Detailed Strava activity response.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub sport_type: Option<String>,
    pub start_date_local: String,
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub map: Option<StravaMap>,
}

/// Activity map data with polylines.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaMap {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

impl StravaActivity {
    /// Convert the wire payload into the pipeline's record.
    ///
    /// `requested_id` fills in the ID when the payload omits it. Coordinates
    /// that are not exactly a (lat, lng) pair count as no GPS.
    pub fn into_record(self, requested_id: u64) -> ActivityRecord {
        let start_coordinates = match self.start_latlng.as_deref() {
            Some([latitude, longitude]) => Some(LatLng {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        };

        // Older payloads only carry `type`.
        let activity_type = if self.activity_type.is_empty() {
            self.sport_type.unwrap_or_default()
        } else {
            self.activity_type
        };

        ActivityRecord {
            id: if self.id == 0 { requested_id } else { self.id },
            name: self.name,
            description: self.description.unwrap_or_default(),
            activity_type,
            start_date_local: self.start_date_local,
            elapsed_seconds: self.elapsed_time,
            start_coordinates,
        }
    }
}

/// Partial update body. Never carries anything but name and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityUpdate {
    pub name: String,
    pub description: String,
}
