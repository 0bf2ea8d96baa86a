// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration.
//!
//! Everything lives in a single JSON record on disk (`config.json` by default).
//! The same record holds the OAuth token triple, which the credential store
//! rewrites in place after every refresh. A few values can be overridden from
//! the environment (or a `.env` file) for local development.

use crate::models::Credentials;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_URL_BASE: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_WEATHER_API_URL_BASE: &str = "https://archive-api.open-meteo.com/v1/archive";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKER_CONCURRENCY: usize = 4;
const DEFAULT_QUEUE_CAPACITY: usize = 64;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

const DEFAULT_INDOOR_ACTIVITIES: &[&str] = &[
    "Crossfit",
    "Elliptical",
    "StairStepper",
    "VirtualRide",
    "VirtualRun",
    "WeightTraining",
    "Workout",
    "Yoga",
];

const DEFAULT_RUNNING_ACTIVITIES: &[&str] = &["Run", "TrailRun", "Hike"];

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
}

/// Port as found in the record; older files store it as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

/// The persisted configuration/credential record, field for field.
///
/// Unknown keys are kept in `extra` so that rewriting the file after a token
/// refresh never drops anything an operator put there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_api_url_base: Option<String>,
    #[serde(default)]
    pub webhook_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_target: Option<LogTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<PortValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor_activities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running_activities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_concurrency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Settings {
    /// Read and parse the record at `path`.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    /// The OAuth portion of the record.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: self.expires_at,
        }
    }

    /// Overwrite the OAuth portion of the record.
    pub fn apply_credentials(&mut self, credentials: &Credentials) {
        self.client_id = credentials.client_id.clone();
        self.client_secret = credentials.client_secret.clone();
        self.access_token = credentials.access_token.clone();
        self.refresh_token = credentials.refresh_token.clone();
        self.expires_at = credentials.expires_at;
    }
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the persisted record (also used by the credential store)
    pub config_path: PathBuf,
    /// Server port
    pub port: u16,
    /// Strava API base URL
    pub strava_api_url: String,
    /// Weather archive endpoint
    pub weather_api_url: String,
    /// Webhook verification token
    pub webhook_verify_token: String,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
    /// Activity types that never get weather
    pub indoor_activities: HashSet<String>,
    /// Activity types that get a temperature line in the description
    pub running_activities: HashSet<String>,
    /// Max enrichments in flight at once
    pub worker_concurrency: usize,
    /// Pending events before new ones are dropped
    pub queue_capacity: usize,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            port: DEFAULT_PORT,
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            weather_api_url: "http://127.0.0.1:9/v1/archive".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
            log_target: LogTarget::Console,
            log_file: PathBuf::from("app.log"),
            indoor_activities: to_set(DEFAULT_INDOOR_ACTIVITIES),
            running_activities: to_set(DEFAULT_RUNNING_ACTIVITIES),
            worker_concurrency: 1,
            queue_capacity: 8,
            http_timeout: Duration::from_secs(5),
        }
    }

    /// Load configuration from the record named by `CONFIG_FILE`.
    ///
    /// `PORT` overrides the record's `serverPort`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let path = PathBuf::from(
            env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string()),
        );
        let settings = Settings::read(&path)?;
        let mut config = Self::from_settings(path, &settings)?;

        if let Ok(port) = env::var("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", port.clone()))?;
        }

        Ok(config)
    }

    /// Resolve runtime configuration from a parsed record.
    pub fn from_settings(config_path: PathBuf, settings: &Settings) -> Result<Self, ConfigError> {
        if settings.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("clientId"));
        }
        if settings.client_secret.trim().is_empty() {
            return Err(ConfigError::Missing("clientSecret"));
        }
        if settings.refresh_token.trim().is_empty() {
            return Err(ConfigError::Missing("refreshToken"));
        }
        if settings.webhook_token.trim().is_empty() {
            return Err(ConfigError::Missing("webhookToken"));
        }

        let port = match &settings.server_port {
            None => DEFAULT_PORT,
            Some(PortValue::Number(n)) => *n,
            Some(PortValue::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("serverPort", s.clone()))?,
        };

        let worker_concurrency = settings
            .worker_concurrency
            .unwrap_or(DEFAULT_WORKER_CONCURRENCY);
        if worker_concurrency == 0 {
            return Err(ConfigError::Invalid("workerConcurrency", "0".to_string()));
        }
        let queue_capacity = settings.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY);
        if queue_capacity == 0 {
            return Err(ConfigError::Invalid("queueCapacity", "0".to_string()));
        }

        Ok(Self {
            config_path,
            port,
            strava_api_url: non_empty_or(&settings.api_url_base, DEFAULT_API_URL_BASE),
            weather_api_url: non_empty_or(
                &settings.weather_api_url_base,
                DEFAULT_WEATHER_API_URL_BASE,
            ),
            webhook_verify_token: settings.webhook_token.trim().to_string(),
            log_target: settings.log_target.unwrap_or_default(),
            log_file: PathBuf::from(non_empty_or(&settings.log_file, "app.log")),
            indoor_activities: settings
                .indoor_activities
                .as_ref()
                .map(|v| v.iter().cloned().collect())
                .unwrap_or_else(|| to_set(DEFAULT_INDOOR_ACTIVITIES)),
            running_activities: settings
                .running_activities
                .as_ref()
                .map(|v| v.iter().cloned().collect())
                .unwrap_or_else(|| to_set(DEFAULT_RUNNING_ACTIVITIES)),
            worker_concurrency,
            queue_capacity,
            http_timeout: Duration::from_secs(
                settings.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }

    /// Log file location. Relative paths sit next to the running executable.
    pub fn log_file_path(&self) -> PathBuf {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_log_path(&self.log_file, exe_dir.as_deref())
    }
}

fn resolve_log_path(log_file: &Path, exe_dir: Option<&Path>) -> PathBuf {
    match exe_dir {
        Some(dir) if log_file.is_relative() => dir.join(log_file),
        _ => log_file.to_path_buf(),
    }
}

fn non_empty_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, #[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Missing required config value: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
