// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod strava;
pub mod tasks;
pub mod token;
pub mod weather;

pub use activity::{ActivityProcessor, ProcessResult, SkipReason};
pub use strava::{StravaClient, StravaService};
pub use tasks::{ProcessActivityPayload, TasksService};
pub use token::TokenManager;
pub use weather::{TargetSlot, WeatherService};
