use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::Config,
    credential::ApiKey,
    error::FetchError,
    model::{CityName, WeatherSnapshot},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        city: &CityName,
        api_key: &ApiKey,
    ) -> Result<WeatherSnapshot, FetchError>;
}

/// Build the OpenWeather client, honouring a configured base URL override.
pub fn provider_from_config(config: &Config) -> OpenWeatherProvider {
    match config.base_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => OpenWeatherProvider::with_base_url(url),
        _ => OpenWeatherProvider::new(),
    }
}
