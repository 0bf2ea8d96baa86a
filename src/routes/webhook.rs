// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::error::AppError;
use crate::models::WebhookEvent;
use crate::services::ProcessActivityPayload;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", get(verify).post(handle_event))
}

/// Strava webhook verification query params.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    mode: String,
    #[serde(rename = "hub.challenge", default)]
    challenge: String,
    #[serde(rename = "hub.verify_token", default)]
    verify_token: String,
}

/// Verification response.
#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    if params.mode == "subscribe" && params.verify_token == state.config.webhook_verify_token {
        tracing::info!("Webhook subscription verified");
        (
            StatusCode::OK,
            Json(VerifyResponse {
                challenge: params.challenge,
            }),
        )
            .into_response()
    } else {
        tracing::warn!(
            mode = %params.mode,
            "Webhook verification failed: invalid token"
        );
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Handle incoming webhook events (POST).
///
/// The body is decoded by hand so that malformed JSON is a plain 400.
async fn handle_event(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse webhook event");
            return AppError::BadRequest(format!("Invalid webhook payload: {}", e))
                .into_response();
        }
    };

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = %event.aspect_type,
        owner_id = event.owner_id,
        "Webhook event received"
    );

    if event.is_activity_create() {
        let payload = ProcessActivityPayload {
            activity_id: event.object_id,
            athlete_id: event.owner_id,
            source: "webhook".to_string(),
        };

        if let Err(e) = state.tasks_service.queue_activity(payload) {
            tracing::error!(
                activity_id = event.object_id,
                error = %e,
                "Failed to queue activity"
            );
        }
    } else {
        tracing::debug!(
            object_type = %event.object_type,
            aspect_type = %event.aspect_type,
            "Ignoring unhandled event type"
        );
    }

    // Always acknowledge quickly; enrichment outcome is not reported back.
    StatusCode::OK.into_response()
}
