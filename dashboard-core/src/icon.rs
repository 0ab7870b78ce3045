/// Icon shown next to the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionIcon {
    Sun,
    Rain,
    Snow,
    /// Used for every condition without a dedicated icon.
    Cloud,
}

impl ConditionIcon {
    /// Maps a provider condition group onto an icon. Never fails.
    pub fn from_condition(condition: &str) -> Self {
        match condition.trim().to_lowercase().as_str() {
            "clear" => Self::Sun,
            "rain" | "drizzle" => Self::Rain,
            "snow" => Self::Snow,
            _ => Self::Cloud,
        }
    }

    /// Stable icon class name.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Rain => "cloud-rain",
            Self::Snow => "cloud-snow",
            Self::Cloud => "cloud",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Rain => "🌧",
            Self::Snow => "❄",
            Self::Cloud => "☁",
        }
    }
}
