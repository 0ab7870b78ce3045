use reqwest::StatusCode;

/// Shown when no better reason can be extracted from a failure.
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch weather data";

/// Everything that can go wrong between a search submission and a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("No API key configured")]
    MissingCredential,

    #[error("City not found")]
    CityNotFound,

    #[error("Provider returned status {status}")]
    Status {
        status: StatusCode,
        /// `message` field of the provider's error body, if it had one.
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response payload: {0}")]
    Payload(String),
}

impl FetchError {
    /// Text suitable for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::EmptyCity => "Please enter a city name".to_string(),
            FetchError::MissingCredential => {
                "Please add your OpenWeather API key (run `weather-dashboard configure`)".to_string()
            }
            FetchError::CityNotFound => "City not found".to_string(),
            FetchError::Status { message, .. } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(capitalize_first)
                .unwrap_or_else(|| GENERIC_FETCH_FAILURE.to_string()),
            FetchError::Transport(_) | FetchError::Payload(_) => GENERIC_FETCH_FAILURE.to_string(),
        }
    }

    /// Whether the failure happened before any network traffic.
    pub fn is_local(&self) -> bool {
        matches!(self, FetchError::EmptyCity | FetchError::MissingCredential)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
