// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather correlation against the Open-Meteo archive.
//!
//! An activity is matched to one hourly sample: the local start date, and the
//! local start hour pushed forward by the number of *whole* hours the activity
//! lasted. The hour is not wrapped into the next day; anything past 23 simply
//! finds no sample and degrades to the unknown values.

use crate::error::AppError;
use crate::models::{ActivityRecord, Observation, WeatherResponse, WeatherSample};
use crate::time_utils::parse_local_timestamp;
use chrono::{NaiveDate, Timelike};
use std::time::Duration;

const SECS_PER_HOUR: i64 = 3600;

/// Date and hour-of-day to look up. `hour` may fall outside 0..=23.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSlot {
    pub date: NaiveDate,
    pub hour: i64,
}

/// Compute the sample slot for an activity.
pub fn resolve_target_slot(
    start_date_local: &str,
    elapsed_seconds: i64,
) -> Result<TargetSlot, AppError> {
    let start = parse_local_timestamp(start_date_local)
        .map_err(|e| AppError::InvalidTimestamp(format!("{:?}: {}", start_date_local, e)))?;

    Ok(TargetSlot {
        date: start.date(),
        hour: i64::from(start.hour()) + elapsed_seconds.div_euclid(SECS_PER_HOUR),
    })
}

/// Weather archive client.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    /// Slot for `activity`; see [`resolve_target_slot`].
    pub fn target_slot(&self, activity: &ActivityRecord) -> Result<TargetSlot, AppError> {
        resolve_target_slot(&activity.start_date_local, activity.elapsed_seconds)
    }

    /// Fetch the hourly weather code and temperature series for one date.
    pub async fn fetch_sample(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<WeatherSample, AppError> {
        let day = date.format("%Y-%m-%d").to_string();

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "weather_code,temperature_2m".to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
            ])
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Weather request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Remote { status, body });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read weather body: {}", e)))?;
        let parsed: WeatherResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::Decode(format!("Weather response: {}", e)))?;

        Ok(parsed.hourly)
    }

    /// Fetch the sample for `slot` and pick out its hour.
    pub async fn observe(
        &self,
        latitude: f64,
        longitude: f64,
        slot: TargetSlot,
    ) -> Result<Observation, AppError> {
        let sample = self.fetch_sample(latitude, longitude, slot.date).await?;
        let observation = sample.extract(slot.hour);

        if observation.condition.value().is_none() {
            tracing::info!(
                hour = slot.hour,
                date = %slot.date,
                hours_available = sample.weather_code.len(),
                "No weather code for target hour, using default"
            );
        }
        if observation.temperature.value().is_none() {
            tracing::info!(
                hour = slot.hour,
                date = %slot.date,
                hours_available = sample.temperature.len(),
                "No temperature for target hour"
            );
        }

        Ok(observation)
    }
}
