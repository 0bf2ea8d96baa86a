// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather client tests against a mock Open-Meteo archive.

use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use strava_weather::error::AppError;
use strava_weather::models::Reading;
use strava_weather::services::{TargetSlot, WeatherService};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn service(server: &MockServer) -> WeatherService {
    WeatherService::new(&common::weather_base(server), Duration::from_secs(5)).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
}

#[tokio::test]
async fn test_fetch_sample_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", "47.5"))
        .and(query_param("longitude", "8.25"))
        .and(query_param("hourly", "weather_code,temperature_2m"))
        .and(query_param("start_date", "2025-02-03"))
        .and(query_param("end_date", "2025-02-03"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::weather_json(vec![0, 1, 2], vec![1.0, 2.0, 3.5])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sample = service(&server)
        .fetch_sample(47.5, 8.25, date())
        .await
        .unwrap();

    assert_eq!(sample.time.len(), 3);
    assert_eq!(sample.weather_code, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(sample.extract(2).temperature, Reading::Present(3.5));
}

#[tokio::test]
async fn test_observe_out_of_range_hour_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::weather_json(vec![3; 24], vec![5.0; 24])),
        )
        .mount(&server)
        .await;

    let observation = service(&server)
        .observe(
            47.5,
            8.25,
            TargetSlot {
                date: date(),
                hour: 25,
            },
        )
        .await
        .unwrap();

    assert_eq!(observation.condition, Reading::Unavailable);
    assert_eq!(observation.symbol(), "🏃");
    assert_eq!(observation.temperature_label(), "999");
}

#[tokio::test]
async fn test_missing_hourly_block_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"latitude": 47.5})))
        .mount(&server)
        .await;

    let observation = service(&server)
        .observe(47.5, 8.25, TargetSlot { date: date(), hour: 3 })
        .await
        .unwrap();

    assert_eq!(observation.condition_code(), 100);
    assert_eq!(observation.temperature, Reading::Unavailable);
}

#[tokio::test]
async fn test_fetch_sample_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server)
        .fetch_sample(47.5, 8.25, date())
        .await
        .unwrap_err();

    match err {
        AppError::Remote { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("out of allowed range"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_sample_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = service(&server)
        .fetch_sample(47.5, 8.25, date())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}
