// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Weather webhook server
//!
//! Receives Strava activity webhooks and tags each new outdoor activity with
//! the weather at its start time and place.

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use strava_weather::{
    config::{Config, LogTarget},
    db::CredentialStore,
    services::{
        tasks, ActivityProcessor, StravaClient, StravaService, TasksService, TokenManager,
        WeatherService,
    },
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration comes first: it decides where logs go
    let config = Config::from_env()?;
    init_logging(&config)?;
    tracing::info!(
        port = config.port,
        config = %config.config_path.display(),
        "Starting Strava-Weather"
    );

    // Token manager owns the credential set and persists refreshes
    let store = CredentialStore::file(config.config_path.clone());
    let strava_client = StravaClient::new(&config.strava_api_url, config.http_timeout)?;
    let token_manager = Arc::new(TokenManager::from_store(strava_client.clone(), store).await?);
    tracing::info!("Credentials loaded");

    let strava_service = StravaService::new(strava_client, token_manager);
    let weather_service = WeatherService::new(&config.weather_api_url, config.http_timeout)?;

    let processor = Arc::new(ActivityProcessor::new(
        strava_service,
        weather_service,
        config.indoor_activities.clone(),
        config.running_activities.clone(),
    ));

    // Bounded queue between webhook handler and enrichment workers
    let (tasks_service, receiver) = TasksService::new(config.queue_capacity);
    let workers = tokio::spawn(tasks::run_workers(
        receiver,
        processor,
        config.worker_concurrency,
    ));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        tasks_service,
    });

    // Build router
    let app = strava_weather::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last queue sender) is gone; let in-flight
    // enrichments finish.
    if let Err(e) = workers.await {
        tracing::error!(error = %e, "Worker loop ended abnormally");
    }
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging, to stdout or to the configured file.
fn init_logging(config: &Config) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strava_weather=debug,info"));

    let (console, file) = match config.log_target {
        LogTarget::Console => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            ),
            None,
        ),
        LogTarget::File => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(config.log_file_path())?;
            (
                None,
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(false)
                        .with_current_span(true)
                        .flatten_event(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(log_file)),
                ),
            )
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}
