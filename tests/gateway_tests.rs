// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity gateway tests against a mock Strava API.

use chrono::Utc;
use serde_json::json;
use strava_weather::error::AppError;
use strava_weather::models::LatLng;
use strava_weather::services::StravaService;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::ACTIVITY_ID;

fn gateway(server: &MockServer, expires_in: i64) -> StravaService {
    let (tokens, _store) = common::token_manager(server, common::credentials(expires_in));
    StravaService::new(common::strava_client(server), tokens)
}

#[tokio::test]
async fn test_fetch_activity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .and(header("authorization", "Bearer cached-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::activity_json(
            "Morning Run",
            "Run",
            json!([47.5, 8.25]),
            "Felt good",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let activity = gateway(&server, 3600).fetch(ACTIVITY_ID).await.unwrap();

    assert_eq!(activity.id, ACTIVITY_ID);
    assert_eq!(activity.name, "Morning Run");
    assert_eq!(activity.activity_type, "Run");
    assert_eq!(activity.description, "Felt good");
    assert_eq!(activity.elapsed_seconds, 5400);
    assert_eq!(activity.start_date_local, "2025-02-03T16:00:00Z");
    assert_eq!(
        activity.start_coordinates,
        Some(LatLng {
            latitude: 47.5,
            longitude: 8.25
        })
    );
}

#[tokio::test]
async fn test_fetch_non_success_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Record Not Found",
            "errors": [{"resource": "Activity", "field": "id", "code": "invalid"}]
        })))
        .mount(&server)
        .await;

    let err = gateway(&server, 3600).fetch(ACTIVITY_ID).await.unwrap_err();

    match err {
        AppError::NotFound { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Record Not Found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .mount(&server)
        .await;

    let err = gateway(&server, 3600).fetch(ACTIVITY_ID).await.unwrap_err();
    assert_eq!(err.remote_status(), Some(401));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_fetch_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": 5"))
        .mount(&server)
        .await;

    let err = gateway(&server, 3600).fetch(ACTIVITY_ID).await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_with_expired_token_refreshes_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "refresh_token": "fresh-refresh",
            "expires_at": Utc::now().timestamp() + 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::activity_json(
            "Morning Run",
            "Run",
            json!([47.5, 8.25]),
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let activity = gateway(&server, -10).fetch(ACTIVITY_ID).await.unwrap();
    assert_eq!(activity.name, "Morning Run");
}

#[tokio::test]
async fn test_fetch_aborts_when_refresh_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/oauth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server, -10).fetch(ACTIVITY_ID).await.unwrap_err();
    assert!(matches!(err, AppError::TokenRefresh(_)));
}

#[tokio::test]
async fn test_update_sends_only_name_and_description() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .and(header("authorization", "Bearer cached-access"))
        .and(body_json(json!({
            "name": "Morning Run ☀️",
            "description": "Felt good\nT: 12°C"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": ACTIVITY_ID})))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server, 3600)
        .update(ACTIVITY_ID, "Morning Run ☀️", "Felt good\nT: 12°C")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_failure_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v3/activities/{}", ACTIVITY_ID)))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server, 3600)
        .update(ACTIVITY_ID, "x", "y")
        .await
        .unwrap_err();

    match err {
        AppError::Remote { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
