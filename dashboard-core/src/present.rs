//! Turns a [`WeatherSnapshot`] into display-ready values.

use chrono::{DateTime, Utc};

use crate::{icon::ConditionIcon, model::WeatherSnapshot};

const MPS_TO_KMH: f64 = 3.6;

/// Everything the dashboard card shows for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    /// "{name}, {country}"
    pub heading: String,
    pub description: String,
    pub icon: ConditionIcon,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity_pct: u8,
    pub wind_kmh: i64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherView {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let heading = if snapshot.country.is_empty() {
            snapshot.location_name.clone()
        } else {
            format!("{}, {}", snapshot.location_name, snapshot.country)
        };

        Self {
            heading,
            description: display_case(&snapshot.description),
            icon: ConditionIcon::from_condition(&snapshot.condition),
            temperature: round_half_up(snapshot.temperature_c),
            feels_like: round_half_up(snapshot.feels_like_c),
            humidity_pct: snapshot.humidity_pct,
            wind_kmh: round_half_up(snapshot.wind_speed_mps * MPS_TO_KMH),
            observed_at: snapshot.observed_at,
        }
    }

    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature)
    }

    pub fn feels_like_label(&self) -> String {
        format!("Feels like {}°C", self.feels_like)
    }

    pub fn humidity_label(&self) -> String {
        format!("{}%", self.humidity_pct)
    }

    pub fn wind_label(&self) -> String {
        format!("{} km/h", self.wind_kmh)
    }
}

/// Shown in place of the dashboard whenever no API key is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupNotice {
    pub title: &'static str,
    pub intro: &'static str,
    pub steps: &'static [&'static str],
}

impl SetupNotice {
    pub const fn new() -> Self {
        Self {
            title: "API Key Required",
            intro: "To use this weather dashboard, you need a free API key from OpenWeather:",
            steps: &[
                "Visit https://openweathermap.org/api",
                "Sign up for a free account",
                "Get your API key",
                "Run `weather-dashboard configure` and paste the key",
            ],
        }
    }
}

impl Default for SetupNotice {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest integer, halves rounded up (2.5 -> 3, -2.5 -> -2).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Upper-cases the first letter of every word: "light rain" -> "Light Rain".
pub fn display_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
