//! AQI source configuration (`[plugins.aqi]`).

use std::time::Duration;

use serde::Deserialize;

/// Settings of the air-quality source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AqiConfig {
    /// WAQI API token. Required when the source is selected.
    pub api_token: Option<String>,
    /// WAQI location path segment; `here` geolocates the caller's IP.
    pub location: String,
    /// Minutes between two refreshes.
    pub refresh_period_min: u32,
    /// Base URL of the WAQI API.
    pub endpoint: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AqiConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            location: "here".to_string(),
            refresh_period_min: 5,
            endpoint: "http://api.waqi.info".to_string(),
            timeout_secs: 5,
        }
    }
}

impl AqiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The feed URL, without the token query.
    #[must_use]
    pub fn feed_url(&self) -> String {
        format!(
            "{}/feed/{}/",
            self.endpoint.trim_end_matches('/'),
            self.location
        )
    }
}
