// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod credentials;
pub mod weather;
pub mod webhook;

pub use activity::{ActivityRecord, ActivityUpdate, LatLng, StravaActivity};
pub use credentials::Credentials;
pub use weather::{Observation, Reading, WeatherResponse, WeatherSample};
pub use webhook::WebhookEvent;
