//! WAQI HTTP client.

use std::future::Future;

use serde::Deserialize;

use crate::config::AqiConfig;
use crate::error::WaqiError;

/// Something that can read the current air-quality index.
pub trait AqiFetcher: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<u32, WaqiError>> + Send;
}

/// Reads the index of one location from the WAQI feed API.
#[derive(Debug, Clone)]
pub struct WaqiClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl WaqiClient {
    /// Build a client for the location in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WaqiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AqiConfig, token: impl Into<String>) -> Result<Self, WaqiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.feed_url(),
            token: token.into(),
        })
    }
}

impl AqiFetcher for WaqiClient {
    async fn fetch(&self) -> Result<u32, WaqiError> {
        tracing::debug!(url = %self.url, "requesting WAQI feed");
        let response = self
            .client
            .get(&self.url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(WaqiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_feed(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Feed {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Extract the index from a WAQI feed response body.
///
/// # Errors
///
/// [`WaqiError::Rejected`] when the API reports a failure,
/// [`WaqiError::Json`] for an unreadable body and
/// [`WaqiError::NotNumeric`] when the station has no current reading.
pub fn parse_feed(body: &str) -> Result<u32, WaqiError> {
    let feed: Feed = serde_json::from_str(body)?;
    if feed.status != "ok" {
        let reason = feed.data.as_str().unwrap_or(&feed.status).to_string();
        return Err(WaqiError::Rejected(reason));
    }

    let aqi = &feed.data["aqi"];
    aqi.as_u64()
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| WaqiError::NotNumeric(aqi.to_string()))
}
