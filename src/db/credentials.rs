// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential persistence.
//!
//! Credentials live inside the configuration record on disk. Saving patches
//! only the OAuth fields and swaps the file in with a rename, so a crash
//! mid-write leaves either the old or the new record, never a torn one.

use crate::config::Settings;
use crate::error::AppError;
use crate::models::Credentials;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Credential store client.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    File(Arc<PathBuf>),
    Memory(Arc<Mutex<Option<Credentials>>>),
}

impl CredentialStore {
    /// Store backed by the JSON record at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(Arc::new(path.into())),
        }
    }

    /// In-memory store for testing (offline mode).
    pub fn in_memory(initial: Option<Credentials>) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(initial))),
        }
    }

    /// Load the persisted credentials, `None` if there is no record yet.
    pub async fn load(&self) -> Result<Option<Credentials>, AppError> {
        match &self.backend {
            Backend::File(path) => Ok(read_settings(path).await?.map(|s| s.credentials())),
            Backend::Memory(slot) => Ok(slot.lock().await.clone()),
        }
    }

    /// Persist `credentials`, replacing whatever was stored before.
    pub async fn save(&self, credentials: &Credentials) -> Result<(), AppError> {
        match &self.backend {
            Backend::File(path) => {
                let mut settings = match read_settings(path).await? {
                    Some(s) => s,
                    None => Settings::parse("{}")
                        .map_err(|e| AppError::Store(e.to_string()))?,
                };
                settings.apply_credentials(credentials);

                let json = serde_json::to_string_pretty(&settings)
                    .map_err(|e| AppError::Store(format!("Failed to serialize record: {}", e)))?;
                write_atomic(path, json.as_bytes()).await?;

                tracing::debug!(path = %path.display(), "Credentials persisted");
                Ok(())
            }
            Backend::Memory(slot) => {
                *slot.lock().await = Some(credentials.clone());
                Ok(())
            }
        }
    }
}

async fn read_settings(path: &Path) -> Result<Option<Settings>, AppError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AppError::Store(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    Settings::parse(&raw)
        .map(Some)
        .map_err(|e| AppError::Store(format!("{}: {}", path.display(), e)))
}

async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Store(format!("Invalid record path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| AppError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;

    // The replacement keeps the mode of the record it replaces.
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if let Err(e) = tokio::fs::set_permissions(&tmp, metadata.permissions()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Store(format!(
                "Failed to set permissions on {}: {}",
                tmp.display(),
                e
            )));
        }
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(AppError::Store(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}
