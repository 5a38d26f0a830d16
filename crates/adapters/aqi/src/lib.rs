//! # lumen-adapter-aqi
//!
//! Air-quality source. Each tick reads the WAQI index of the configured
//! location and turns it into a colour band; very unhealthy readings
//! breathe instead of holding a solid colour.

pub mod band;
pub mod client;
pub mod config;
pub mod error;

use lumen_app::ports::LightSource;
use lumen_domain::error::{ConfigError, PluginError};
use lumen_domain::light::LightEntry;

pub use client::{AqiFetcher, WaqiClient};
pub use config::AqiConfig;
pub use error::WaqiError;

/// Display name of the source.
pub const NAME: &str = "AQI Indicator";

/// Source plugin driven by an [`AqiFetcher`].
pub struct AqiSource<F = WaqiClient> {
    fetcher: F,
    location: String,
    refresh_period_min: u32,
}

impl AqiSource<WaqiClient> {
    /// Build the source backed by the WAQI API.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when no API token is configured, or
    /// [`ConfigError::Load`] if the HTTP client cannot be built.
    pub fn from_config(config: &AqiConfig) -> Result<Self, ConfigError> {
        let token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing("plugins.aqi.api_token"))?;
        let client =
            WaqiClient::new(config, token).map_err(|err| ConfigError::Load(Box::new(err)))?;
        Ok(Self::with_fetcher(client, config))
    }
}

impl<F: AqiFetcher> AqiSource<F> {
    #[must_use]
    pub fn with_fetcher(fetcher: F, config: &AqiConfig) -> Self {
        Self {
            fetcher,
            location: config.location.clone(),
            refresh_period_min: config.refresh_period_min,
        }
    }
}

impl<F: AqiFetcher> LightSource for AqiSource<F> {
    fn name(&self) -> &str {
        NAME
    }

    fn refresh_interval(&self) -> u32 {
        self.refresh_period_min
    }

    async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
        let aqi = self.fetcher.fetch().await?;
        tracing::info!(plugin = NAME, location = %self.location, aqi, "air quality fetched");
        Ok(Some(band::entry_for(aqi)))
    }
}
