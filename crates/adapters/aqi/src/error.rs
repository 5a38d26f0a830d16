//! WAQI client error types.

use lumen_domain::error::PluginError;

/// Errors specific to the WAQI client.
#[derive(Debug, thiserror::Error)]
pub enum WaqiError {
    /// The request could not be sent or timed out.
    #[error("WAQI request failed")]
    Http(#[from] reqwest::Error),

    #[error("WAQI answered with HTTP status {0}")]
    Status(u16),

    /// The API answered with `status != "ok"`.
    #[error("WAQI rejected the request: {0}")]
    Rejected(String),

    #[error("failed to parse WAQI response")]
    Json(#[from] serde_json::Error),

    #[error("WAQI returned a non-numeric index: {0}")]
    NotNumeric(String),
}

impl From<WaqiError> for PluginError {
    fn from(err: WaqiError) -> Self {
        match err {
            WaqiError::Http(_) => Self::Fetch(Box::new(err)),
            WaqiError::Status(_) | WaqiError::Rejected(_) => Self::Unavailable(err.to_string()),
            WaqiError::Json(_) | WaqiError::NotNumeric(_) => Self::Parse(Box::new(err)),
        }
    }
}
