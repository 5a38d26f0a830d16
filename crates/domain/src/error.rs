//! Error taxonomy shared across the workspace.
//!
//! Four kinds, so callers can decide retry-vs-fatal by matching:
//!
//! | Kind | Raised by | Handling |
//! |------|-----------|----------|
//! | [`ConfigError`] | config loading, plugin constructors | fatal at startup |
//! | [`DeviceError`] | device adapters | reconnect, fatal once the budget is spent |
//! | [`ContractError`] | plugin selection / scheduling | fatal |
//! | [`PluginError`] | source and automation plugins | logged, tick falls back to warning |

use crate::device::DeviceAddress;

/// Boxed source error for adapter-specific failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error of the controller.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("device error")]
    Device(#[from] DeviceError),

    /// Every reconnect attempt failed.
    #[error("device unreachable after {attempts} connection attempts")]
    ReconnectExhausted {
        attempts: u32,
        #[source]
        last: DeviceError,
    },

    #[error("plugin contract violated")]
    Contract(#[from] ContractError),

    #[error("plugin failed")]
    Plugin(#[from] PluginError),
}

impl LumenError {
    /// Whether the controller keeps running after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Device(_) | Self::Plugin(_))
    }
}

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The configuration source could not be read or parsed.
    #[error("failed to load configuration")]
    Load(#[source] BoxError),
}

/// Connectivity failure talking to the lighting device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("no device found at {0}")]
    NotFound(DeviceAddress),

    #[error("device not connected")]
    Disconnected,

    #[error("device I/O failed")]
    Io(#[source] BoxError),
}

/// A selected plugin cannot honour its contract.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("no source plugin named `{0}`")]
    UnknownSource(String),

    #[error("no automation plugin named `{0}`")]
    UnknownAutomation(String),

    #[error("source `{plugin}` reported a zero refresh interval")]
    ZeroRefreshInterval { plugin: String },
}

/// Runtime failure inside a plugin; contained to the current tick.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The upstream answered but had nothing usable.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("request failed")]
    Fetch(#[source] BoxError),

    #[error("malformed response")]
    Parse(#[source] BoxError),
}
