// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity enrichment service.
//!
//! Handles the core workflow:
//! 1. Fetch activity from Strava
//! 2. Skip indoor activities and activities without GPS
//! 3. Resolve the weather slot and fetch the observation
//! 4. Append the weather emoji to the name, and the temperature to the
//!    description for running-style activities
//! 5. Push the update back to Strava

use crate::error::Result;
use crate::models::weather::TEMPERATURE_SENTINEL;
use crate::models::ActivityRecord;
use crate::services::tasks::ProcessActivityPayload;
use crate::services::{StravaService, WeatherService};
use std::collections::HashSet;

/// Enrich an activity with weather information.
pub struct ActivityProcessor {
    strava: StravaService,
    weather: WeatherService,
    indoor_activities: HashSet<String>,
    running_activities: HashSet<String>,
}

impl ActivityProcessor {
    pub fn new(
        strava: StravaService,
        weather: WeatherService,
        indoor_activities: HashSet<String>,
        running_activities: HashSet<String>,
    ) -> Self {
        Self {
            strava,
            weather,
            indoor_activities,
            running_activities,
        }
    }

    /// Enrich an activity by ID.
    pub async fn process_activity(&self, activity_id: u64) -> Result<ProcessResult> {
        tracing::info!(activity_id, "Processing activity");

        // 1. Fetch activity from Strava (token management is handled by StravaService)
        let activity = self.strava.fetch(activity_id).await?;

        // 2. Classify
        if activity.is_type_in(&self.indoor_activities) {
            tracing::info!(
                activity_id,
                activity_type = %activity.activity_type,
                "Indoor activity, skipping"
            );
            return Ok(ProcessResult::Skipped(SkipReason::Indoor));
        }

        let Some(start) = activity.start_coordinates else {
            tracing::info!(activity_id, "Activity has no start coordinates, skipping");
            return Ok(ProcessResult::Skipped(SkipReason::NoLocation));
        };

        // 3. Correlate
        let slot = self.weather.target_slot(&activity)?;
        let observation = self
            .weather
            .observe(start.latitude, start.longitude, slot)
            .await?;

        let symbol = observation.symbol();
        let temperature = observation.temperature_label();

        tracing::info!(
            activity_id,
            date = %slot.date,
            hour = slot.hour,
            weather_code = observation.condition_code(),
            temperature = %temperature,
            "Weather resolved"
        );

        // 4. Compose
        let new_name = compose_name(&activity.name, symbol);
        let new_description =
            compose_description(&activity, &self.running_activities, &temperature);

        // 5. Push
        self.strava
            .update(activity_id, &new_name, &new_description)
            .await?;

        tracing::info!(activity_id, name = %new_name, "Activity updated");

        Ok(ProcessResult::Updated {
            name: new_name,
            description: new_description,
        })
    }

    /// Run a queued task to completion.
    ///
    /// Errors stop here: the webhook was acknowledged long ago, so all that is
    /// left is to log them with enough context to find the triggering event.
    pub async fn handle_task(&self, payload: &ProcessActivityPayload) {
        match self.process_activity(payload.activity_id).await {
            Ok(ProcessResult::Updated { .. }) => {}
            Ok(ProcessResult::Skipped(reason)) => {
                tracing::debug!(
                    activity_id = payload.activity_id,
                    reason = ?reason,
                    "Enrichment skipped"
                );
            }
            Err(e) => {
                tracing::error!(
                    activity_id = payload.activity_id,
                    athlete_id = payload.athlete_id,
                    source = %payload.source,
                    auth_error = e.is_auth_error(),
                    remote_status = ?e.remote_status(),
                    error = %e,
                    "Enrichment failed"
                );
            }
        }
    }
}

/// Result of processing an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    Updated { name: String, description: String },
    Skipped(SkipReason),
}

/// Why an activity was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Indoor,
    NoLocation,
}

/// Name with the weather emoji appended.
pub fn compose_name(name: &str, symbol: &str) -> String {
    format!("{} {}", name, symbol)
}

/// Description, with a temperature line for running-style activities.
///
/// `temperature` is the label produced by the observation; the "no data"
/// sentinel is never written out.
pub fn compose_description(
    activity: &ActivityRecord,
    running_activities: &HashSet<String>,
    temperature: &str,
) -> String {
    if temperature == TEMPERATURE_SENTINEL || !activity.is_type_in(running_activities) {
        return activity.description.clone();
    }

    append_annotation(&activity.description, &format!("T: {}°C", temperature))
}

/// Append annotation to existing description, directly with no separator.
fn append_annotation(existing: &str, annotation: &str) -> String {
    format!("{}{}", existing, annotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> HashSet<String> {
        ["Run", "TrailRun", "Hike"].iter().map(|s| s.to_string()).collect()
    }

    fn activity(activity_type: &str, description: &str) -> ActivityRecord {
        ActivityRecord {
            id: 1,
            name: "Afternoon Run".to_string(),
            description: description.to_string(),
            activity_type: activity_type.to_string(),
            start_date_local: "2025-02-03T16:00:00Z".to_string(),
            elapsed_seconds: 5400,
            start_coordinates: None,
        }
    }

    #[test]
    fn test_compose_name() {
        assert_eq!(compose_name("Afternoon Run", "🌦"), "Afternoon Run 🌦");
    }

    #[test]
    fn test_description_for_run() {
        let result = compose_description(&activity("Run", ""), &running(), "8");
        assert_eq!(result, "T: 8°C");
    }

    #[test]
    fn test_description_appends_to_existing() {
        let result = compose_description(&activity("Hike", "Windy ridge"), &running(), "-3");
        assert_eq!(result, "Windy ridgeT: -3°C");
    }

    #[test]
    fn test_description_exact_format() {
        let result = compose_description(&activity("Run", "Easy"), &running(), "8");
        assert_eq!(result, "EasyT: 8°C");
    }

    #[test]
    fn test_description_sentinel_never_written() {
        let result = compose_description(&activity("Run", "Legs"), &running(), TEMPERATURE_SENTINEL);
        assert_eq!(result, "Legs");
        assert!(!result.contains("999"));
    }

    #[test]
    fn test_description_untouched_for_other_types() {
        let result = compose_description(&activity("Ride", "Commute"), &running(), "12");
        assert_eq!(result, "Commute");
    }

    #[test]
    fn test_append_annotation_to_empty() {
        assert_eq!(append_annotation("", "T: 1°C"), "T: 1°C");
    }
}
