use std::fmt;

/// Value shipped in sample configs before a real key is filled in.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Provider API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Whether a provider credential is configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    Absent,
    Present(ApiKey),
}

impl Credential {
    /// Blank values and the sample placeholder count as absent.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => {
                Credential::Present(ApiKey(key.to_string()))
            }
            _ => Credential::Absent,
        }
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        match self {
            Credential::Present(key) => Some(key),
            Credential::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Credential::Present(_))
    }
}
