// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a Strava `start_date_local` value as a naive wall-clock time.
///
/// Strava appends a `Z` to local times even though they carry no offset, so the
/// suffix is ignored rather than interpreted as UTC.
pub fn parse_local_timestamp(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = input.trim();
    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
}
