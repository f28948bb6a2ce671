use serde::{Deserialize, Serialize};

/// Opaque identifier returned by geocoding and consumed by the weather fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Current conditions for one location, written to the screen as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location: String,
    pub weather: String,
    /// In the provider's native unit.
    pub temperature: f64,
}
