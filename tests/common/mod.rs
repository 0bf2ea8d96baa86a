// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use strava_weather::config::Config;
use strava_weather::db::CredentialStore;
use strava_weather::models::Credentials;
use strava_weather::routes::create_router;
use strava_weather::services::{
    ActivityProcessor, ProcessActivityPayload, StravaClient, StravaService, TasksService,
    TokenManager, WeatherService,
};
use strava_weather::AppState;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const ACTIVITY_ID: u64 = 13564780272;

/// Create a test app with an in-process queue.
/// Returns the router, the shared state and the queue's receiving end.
#[allow(dead_code)]
pub fn create_test_app(
    capacity: usize,
) -> (
    axum::Router,
    Arc<AppState>,
    mpsc::Receiver<ProcessActivityPayload>,
) {
    let config = Config::test_default();
    let (tasks_service, receiver) = TasksService::new(capacity);

    let state = Arc::new(AppState {
        config,
        tasks_service,
    });

    (create_router(state.clone()), state, receiver)
}

/// Credentials expiring `offset_secs` from now (negative = already expired).
#[allow(dead_code)]
pub fn credentials(offset_secs: i64) -> Credentials {
    Credentials {
        client_id: "12345".to_string(),
        client_secret: "client-secret".to_string(),
        access_token: "cached-access".to_string(),
        refresh_token: "cached-refresh".to_string(),
        expires_at: Utc::now().timestamp() + offset_secs,
    }
}

#[allow(dead_code)]
pub fn strava_base(server: &MockServer) -> String {
    format!("{}/api/v3", server.uri())
}

#[allow(dead_code)]
pub fn weather_base(server: &MockServer) -> String {
    format!("{}/v1/archive", server.uri())
}

#[allow(dead_code)]
pub fn strava_client(server: &MockServer) -> StravaClient {
    StravaClient::new(&strava_base(server), Duration::from_secs(5)).unwrap()
}

/// Token manager backed by an in-memory store.
#[allow(dead_code)]
pub fn token_manager(server: &MockServer, creds: Credentials) -> (Arc<TokenManager>, CredentialStore) {
    let store = CredentialStore::in_memory(Some(creds.clone()));
    let manager = Arc::new(TokenManager::new(strava_client(server), store.clone(), creds));
    (manager, store)
}

/// Full processor wired to mock Strava and weather servers, with a valid token.
#[allow(dead_code)]
pub fn processor(strava: &MockServer, weather: &MockServer) -> ActivityProcessor {
    let config = Config::test_default();
    let (tokens, _store) = token_manager(strava, credentials(3600));
    let strava_service = StravaService::new(strava_client(strava), tokens);
    let weather_service =
        WeatherService::new(&weather_base(weather), Duration::from_secs(5)).unwrap();

    ActivityProcessor::new(
        strava_service,
        weather_service,
        config.indoor_activities,
        config.running_activities,
    )
}

/// Strava activity payload.
#[allow(dead_code)]
pub fn activity_json(
    name: &str,
    activity_type: &str,
    latlng: serde_json::Value,
    description: &str,
) -> serde_json::Value {
    json!({
        "id": ACTIVITY_ID,
        "resource_state": 3,
        "name": name,
        "type": activity_type,
        "sport_type": activity_type,
        "start_date": "2025-02-03T15:00:00Z",
        "start_date_local": "2025-02-03T16:00:00Z",
        "start_latlng": latlng,
        "elapsed_time": 5400,
        "description": description,
        "map": {"id": "a13564780272", "summary_polyline": "ki{eFvqfiVqAWQIGEEKAYJgBVqDJ{BHa@"}
    })
}

/// Open-Meteo payload with the given hourly series.
#[allow(dead_code)]
pub fn weather_json(codes: Vec<i64>, temps: Vec<f64>) -> serde_json::Value {
    let time: Vec<String> = (0..codes.len().max(temps.len()))
        .map(|h| format!("2025-02-03T{:02}:00", h))
        .collect();
    json!({
        "latitude": 47.5,
        "longitude": 8.25,
        "hourly_units": {"time": "iso8601", "weather_code": "wmo code", "temperature_2m": "°C"},
        "hourly": {
            "time": time,
            "weather_code": codes,
            "temperature_2m": temps
        }
    })
}

/// Mount the activity GET on the Strava mock.
#[allow(dead_code)]
pub async fn mount_activity(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
