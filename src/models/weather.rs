// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hourly weather samples and their presentation.
//!
//! Open-Meteo reports WMO weather codes and 2m temperatures as parallel
//! per-hour arrays. Gaps never abort enrichment: a missing hour degrades to
//! [`Reading::Unavailable`], which only turns into the legacy sentinels (code
//! 100, temperature "999") when text is composed.

use serde::Deserialize;

/// Weather code used when no sample exists for the target hour.
pub const UNKNOWN_WEATHER_CODE: i64 = 100;

/// Temperature text used when no sample exists for the target hour.
pub const TEMPERATURE_SENTINEL: &str = "999";

/// A value that may be missing from the provider's series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Present(T),
    Unavailable,
}

impl<T: Copy> Reading<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Reading::Present(v) => Some(*v),
            Reading::Unavailable => None,
        }
    }
}

/// Map a WMO weather code to an emoji.
/// See: https://open-meteo.com/en/docs#weathervariables
///
/// Total over all inputs; unknown codes get the code-100 symbol.
pub fn weather_symbol(code: i64) -> &'static str {
    match code {
        0 => "☀️", // Clear sky
        1 => "🌤", // Mainly clear
        2 => "⛅", // Partly cloudy
        3 => "☁️", // Overcast
        45 => "🌫", // Fog
        48 => "🌫❄️", // Depositing rime fog
        51 => "🌦", // Drizzle: Light
        53 => "🌧", // Drizzle: Moderate
        55 => "🌧🌧", // Drizzle: Dense
        56 => "🧊🌧", // Freezing Drizzle: Light
        57 => "🧊🌧🌧", // Freezing Drizzle: Dense
        61 => "🌦", // Rain: Slight
        63 => "🌧", // Rain: Moderate
        65 => "🌧🌧", // Rain: Heavy
        66 => "🧊🌧", // Freezing Rain: Light
        67 => "🧊🌧🌧", // Freezing Rain: Heavy
        71 => "❄️", // Snow fall: Slight
        73 => "❄️❄️", // Snow fall: Moderate
        75 => "❄️❄️❄️", // Snow fall: Heavy
        77 => "🌨", // Snow grains
        80 => "🌦", // Rain showers: Slight
        81 => "🌧", // Rain showers: Moderate
        82 => "🌧🌧", // Rain showers: Violent
        85 => "🌨", // Snow showers: Slight
        86 => "🌨🌨", // Snow showers: Heavy
        95 => "⛈", // Thunderstorm: Slight or moderate
        96 => "⛈🌨", // Thunderstorm with slight hail
        99 => "⛈🌨🌨", // Thunderstorm with heavy hail
        100 => "🏃", // unknown
        _ => weather_symbol(UNKNOWN_WEATHER_CODE),
    }
}

/// Hourly series for a single calendar date at one coordinate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherSample {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<Option<i64>>,
    #[serde(default, rename = "temperature_2m")]
    pub temperature: Vec<Option<f64>>,
}

/// Archive API response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub hourly: WeatherSample,
}

/// Condition and temperature for one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub condition: Reading<i64>,
    pub temperature: Reading<f64>,
}

impl WeatherSample {
    /// Pick the values for `hour`.
    ///
    /// The two series are bounds-checked independently; either may be shorter
    /// than the other. Never fails, whatever the hour.
    pub fn extract(&self, hour: i64) -> Observation {
        Observation {
            condition: lookup(&self.weather_code, hour),
            temperature: lookup(&self.temperature, hour),
        }
    }
}

fn lookup<T: Copy>(series: &[Option<T>], hour: i64) -> Reading<T> {
    usize::try_from(hour)
        .ok()
        .and_then(|idx| series.get(idx).copied().flatten())
        .map_or(Reading::Unavailable, Reading::Present)
}

impl Observation {
    /// Condition code with the unknown sentinel substituted.
    pub fn condition_code(&self) -> i64 {
        self.condition.value().unwrap_or(UNKNOWN_WEATHER_CODE)
    }

    pub fn symbol(&self) -> &'static str {
        weather_symbol(self.condition_code())
    }

    /// Temperature truncated toward zero, or [`TEMPERATURE_SENTINEL`].
    pub fn temperature_label(&self) -> String {
        match self.temperature {
            Reading::Present(t) if t.is_finite() => format!("{}", t.trunc() as i64),
            _ => TEMPERATURE_SENTINEL.to_string(),
        }
    }
}
