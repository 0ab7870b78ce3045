use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message produced by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn loaded(location_name: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            description: format!("Weather data loaded for {location_name}"),
        }
    }

    pub fn failed(err: &FetchError) -> Self {
        let title = match err {
            FetchError::MissingCredential => "API Key Required",
            _ => "Error",
        };
        Self {
            kind: NotificationKind::Error,
            title: title.to_string(),
            description: err.user_message(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
