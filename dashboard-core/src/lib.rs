//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - The headless `Dashboard` controller (query, snapshot, loading, preload)
//! - Presentation helpers (icons, rounding, display labels)
//!
//! It is used by the `weather-dashboard` binary, but has no terminal I/O of its own.

pub mod config;
pub mod credential;
pub mod dashboard;
pub mod error;
pub mod icon;
pub mod model;
pub mod notify;
pub mod prefs;
pub mod present;
pub mod provider;

pub use config::Config;
pub use credential::{ApiKey, Credential};
pub use dashboard::{Command, Dashboard, FetchOutcome, Generation, PendingFetch};
pub use error::FetchError;
pub use icon::ConditionIcon;
pub use model::{CityName, WeatherSnapshot};
pub use notify::{Notification, NotificationKind};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use present::{SetupNotice, WeatherView};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
