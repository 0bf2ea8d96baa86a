// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process task queue for asynchronous enrichment.
//!
//! The webhook handler hands events off with a non-blocking send and answers
//! Strava right away. A single worker loop drains the queue, keeping at most
//! `concurrency` enrichments in flight. When the queue is full, new events are
//! dropped and logged rather than blocking the webhook response.

use crate::error::{AppError, Result};
use crate::services::ActivityProcessor;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Payload sent to the activity processing task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessActivityPayload {
    pub activity_id: u64,
    pub athlete_id: u64,
    pub source: String, // "webhook"
}

/// Sending half of the task queue.
#[derive(Clone)]
pub struct TasksService {
    sender: mpsc::Sender<ProcessActivityPayload>,
}

impl TasksService {
    /// Create a queue holding up to `capacity` pending tasks.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ProcessActivityPayload>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue a single activity for processing without waiting.
    pub fn queue_activity(&self, payload: ProcessActivityPayload) -> Result<()> {
        let activity_id = payload.activity_id;
        self.sender.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AppError::Internal(anyhow::anyhow!(
                "Task queue full, dropping activity {}",
                activity_id
            )),
            mpsc::error::TrySendError::Closed(_) => AppError::Internal(anyhow::anyhow!(
                "Task queue closed, dropping activity {}",
                activity_id
            )),
        })?;

        tracing::debug!(activity_id, "Activity queued");
        Ok(())
    }

    /// Number of tasks that can still be queued.
    pub fn remaining_capacity(&self) -> usize {
        self.sender.capacity()
    }
}

/// Drain `receiver` until every sender is gone.
///
/// Each task runs on its own tokio task so a panic in one enrichment does not
/// take the loop down.
pub async fn run_workers(
    receiver: mpsc::Receiver<ProcessActivityPayload>,
    processor: Arc<ActivityProcessor>,
    concurrency: usize,
) {
    tracing::info!(concurrency, "Enrichment workers started");

    let tasks = stream::unfold(receiver, |mut rx| async move {
        rx.recv().await.map(|payload| (payload, rx))
    });

    tasks
        .for_each_concurrent(concurrency.max(1), |payload| {
            let processor = Arc::clone(&processor);
            async move {
                let span = tracing::info_span!(
                    "enrich",
                    activity_id = payload.activity_id,
                    athlete_id = payload.athlete_id
                );
                let activity_id = payload.activity_id;
                let handle = tokio::spawn(
                    async move { processor.handle_task(&payload).await }.instrument(span),
                );
                if let Err(e) = handle.await {
                    tracing::error!(activity_id, error = %e, "Enrichment task aborted");
                }
            }
        })
        .await;

    tracing::info!("Enrichment workers stopped");
}
