use std::fmt::Write as _;

use chrono::Local;
use weather_dashboard_core::{Notification, NotificationKind, SetupNotice, WeatherView};

pub fn header() -> String {
    "Weather Dashboard\nSearch for any city to get real-time weather information\n".to_string()
}

pub fn setup_notice(notice: &SetupNotice) -> String {
    let mut out = format!("! {}\n  {}\n", notice.title, notice.intro);
    for (i, step) in notice.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", i + 1);
    }
    out
}

pub fn weather_card(view: &WeatherView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.heading);
    let _ = writeln!(out, "{}", view.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {}", view.icon.glyph(), view.temperature_label());
    let _ = writeln!(out, "  {}", view.feels_like_label());
    let _ = writeln!(out);
    let _ = writeln!(out, "  Humidity    {}", view.humidity_label());
    let _ = writeln!(out, "  Wind Speed  {}", view.wind_label());
    if let Some(at) = view.observed_at {
        let _ = writeln!(out, "  Updated     {}", at.with_timezone(&Local).format("%H:%M"));
    }
    out
}

pub fn notification(n: &Notification) -> String {
    let marker = match n.kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✗",
    };
    format!("{marker} {}: {}", n.title, n.description)
}

pub fn loading(city: &str) -> String {
    format!("Loading weather for {city}...")
}
