//! Orchestrator: owns the device connection and applies light entries.
//!
//! ```text
//! Disconnected ─► Connecting ─► Connected ─► Running
//!                  ▲   │  ▲                    │ device error
//!                  │   │  └── retry (1 s) ─┘   ▼
//!                  │   └─► Failed         Reconnecting
//!                  └───────────────────────────┘
//! ```
//!
//! The retry budget is `reconnect_timeout / retry_delay` attempts. On a
//! successful connection the optional colour correction is sent, then the
//! standby preset is shown until the first tick decides otherwise.

use std::time::Duration;

use lumen_domain::color::Rgb;
use lumen_domain::device::DeviceAddress;
use lumen_domain::error::{DeviceError, LumenError};
use lumen_domain::light::{self, LightEntry};

use crate::ports::{DeviceConnector, LightDevice};

/// Connection lifecycle of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Running,
    Reconnecting,
    /// Terminal: the retry budget is exhausted.
    Failed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connecting => f.write_str("connecting"),
            Self::Connected => f.write_str("connected"),
            Self::Running => f.write_str("running"),
            Self::Reconnecting => f.write_str("reconnecting"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Device-side settings of the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub address: DeviceAddress,
    /// Sent once after every successful connection.
    pub color_correction: Option<Rgb>,
    /// Total time budget for one (re)connection.
    pub reconnect_timeout: Duration,
    /// Pause between two connection attempts.
    pub retry_delay: Duration,
}

impl OrchestratorConfig {
    pub const DEFAULT_RECONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            color_correction: None,
            reconnect_timeout: Self::DEFAULT_RECONNECT_TIMEOUT,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }

    /// Number of connection attempts; always at least one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        let attempts = if self.retry_delay.is_zero() {
            self.reconnect_timeout.as_secs()
        } else {
            (self.reconnect_timeout.as_millis() / self.retry_delay.as_millis().max(1))
                .try_into()
                .unwrap_or(u64::MAX)
        };
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}

/// Owns the device handle. Only the orchestrator (and the scheduler that
/// wraps it) ever talks to the device.
pub struct Orchestrator<C: DeviceConnector> {
    connector: C,
    config: OrchestratorConfig,
    device: Option<C::Device>,
    state: ConnectionState,
}

impl<C: DeviceConnector> Orchestrator<C> {
    #[must_use]
    pub fn new(connector: C, config: OrchestratorConfig) -> Self {
        Self {
            connector,
            config,
            device: None,
            state: ConnectionState::Disconnected,
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        tracing::debug!(from = %self.state, to = %state, "state transition");
        self.state = state;
    }

    /// Drop the current handle after a device failure.
    pub(crate) fn disconnect(&mut self) {
        self.device = None;
        self.set_state(ConnectionState::Reconnecting);
    }

    /// Connect to the device, retrying until the budget runs out.
    ///
    /// On success the device shows the standby preset.
    ///
    /// # Errors
    ///
    /// [`LumenError::ReconnectExhausted`] when every attempt failed; the
    /// orchestrator is then [`Failed`](ConnectionState::Failed).
    pub async fn connect(&mut self) -> Result<(), LumenError> {
        self.set_state(ConnectionState::Connecting);
        let max_attempts = self.config.max_attempts();
        let mut last = DeviceError::Disconnected;

        for attempt in 1..=max_attempts {
            match self.open().await {
                Ok(()) => {
                    self.set_state(ConnectionState::Connected);
                    tracing::info!(address = %self.config.address, "device connected");
                    return Ok(());
                }
                Err(err) => {
                    self.device = None;
                    tracing::warn!(
                        error = %err,
                        attempt,
                        max_attempts,
                        "failed to connect, retrying"
                    );
                    last = err;
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        self.set_state(ConnectionState::Failed);
        tracing::error!(
            address = %self.config.address,
            attempts = max_attempts,
            "max retries reached, could not connect to device"
        );
        Err(LumenError::ReconnectExhausted {
            attempts: max_attempts,
            last,
        })
    }

    /// One connection attempt: open, calibrate, show standby.
    async fn open(&mut self) -> Result<(), DeviceError> {
        let mut device = self.connector.connect(self.config.address).await?;
        if let Some(rgb) = self.config.color_correction {
            device.set_color_correction(rgb).await?;
            tracing::info!(%rgb, "color correction enabled");
        }
        self.device = Some(device);
        self.apply(Some(&LightEntry::standby())).await
    }

    /// Send `entry` to the device; `None` shows the warning preset.
    ///
    /// # Errors
    ///
    /// [`DeviceError::Disconnected`] without a handle, or whatever the
    /// device reports. Directives already sent are not rolled back.
    pub async fn apply(&mut self, entry: Option<&LightEntry>) -> Result<(), DeviceError> {
        let device = self.device.as_mut().ok_or(DeviceError::Disconnected)?;
        if entry.is_none() {
            tracing::warn!("no lighting decision, showing warning");
        }
        tracing::info!("applying light entry");
        for directive in light::plan(entry) {
            tracing::debug!(%directive, "sending directive");
            device.execute(directive).await?;
        }
        Ok(())
    }
}
