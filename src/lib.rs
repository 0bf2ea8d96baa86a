// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Weather: tag new Strava activities with the weather they had.
//!
//! Listens for Strava activity-creation webhooks, looks up the historical
//! weather at the activity's start location and time on Open-Meteo, and
//! rewrites the activity's title (and, for runs, its description) with a
//! weather emoji and temperature.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::TasksService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tasks_service: TasksService,
}
