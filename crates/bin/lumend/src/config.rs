//! Configuration loading: TOML file with environment variable overrides.
//!
//! Reads `lumen.toml` from the working directory, or the file named by
//! `LUMEN_CONFIG`. Only `device.vendor_id` is required; everything else
//! has a default. Environment variables take precedence over file values.

use std::time::Duration;

use lumen_adapter_aqi::AqiConfig;
use lumen_adapter_duty_timer::DutyTimerConfig;
use lumen_app::orchestrator::OrchestratorConfig;
use lumen_domain::color::Rgb;
use lumen_domain::device::DeviceAddress;
use lumen_domain::error::ConfigError;
use serde::Deserialize;

const DEFAULT_PATH: &str = "lumen.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyboard identification and connection settings.
    pub device: DeviceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Per-plugin settings.
    pub plugins: PluginsConfig,
}

/// Keyboard identification and connection settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// USB vendor id, e.g. `0x3434`.
    pub vendor_id: Option<u16>,
    /// USB product id; any product of the vendor when unset.
    pub product_id: Option<u16>,
    /// The keyboard's rendering of true white, sent once per connection.
    pub color_correction: Option<Rgb>,
    /// Total time spent reconnecting before giving up, in seconds.
    pub reconnect_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Settings handed to plugin constructors.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub aqi: AqiConfig,
    pub duty_timer: DutyTimerConfig,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a required setting is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("LUMEN_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Load(Box::new(err))),
        }
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Load(Box::new(err)))
    }

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("LUMEN_RECONNECT_TIMEOUT") {
            self.device.reconnect_timeout_secs =
                val.parse::<u64>().map_err(|err| ConfigError::Invalid {
                    field: "LUMEN_RECONNECT_TIMEOUT",
                    reason: format!("{val:?}: {err}"),
                })?;
        }
        if let Some(val) = var("LUMEN_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.device_address().map(|_| ())
    }

    /// The keyboard to connect to.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] without a vendor id.
    pub fn device_address(&self) -> Result<DeviceAddress, ConfigError> {
        let vendor_id = self
            .device
            .vendor_id
            .ok_or(ConfigError::Missing("device.vendor_id"))?;
        Ok(DeviceAddress::new(vendor_id, self.device.product_id))
    }

    /// Connection settings for the orchestrator.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] without a vendor id.
    pub fn orchestrator_config(&self) -> Result<OrchestratorConfig, ConfigError> {
        let mut config = OrchestratorConfig::new(self.device_address()?);
        config.color_correction = self.device.color_correction;
        config.reconnect_timeout = Duration::from_secs(self.device.reconnect_timeout_secs);
        Ok(config)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: None,
            product_id: None,
            color_correction: None,
            reconnect_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lumend=info,lumen=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert!(config.device.vendor_id.is_none());
        assert!(config.device.product_id.is_none());
        assert!(config.device.color_correction.is_none());
        assert_eq!(config.device.reconnect_timeout_secs, 5);
        assert_eq!(config.logging.filter, "lumend=info,lumen=info");
        assert_eq!(config.plugins.aqi.refresh_period_min, 5);
        assert!(!config.plugins.duty_timer.workday_mode);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [device]
            vendor_id = 0x3434
            product_id = 0x0361
            color_correction = [255, 200, 180]
            reconnect_timeout_secs = 30

            [logging]
            filter = "debug"

            [plugins.aqi]
            api_token = "secret"
            location = "@1437"
            refresh_period_min = 10

            [plugins.duty_timer]
            start_time = "09:00"
            end_time = "18:30"
            workday_mode = true
            holidays = ["2026-10-01"]
        "#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.device.vendor_id, Some(0x3434));
        assert_eq!(config.device.product_id, Some(0x0361));
        assert_eq!(config.device.color_correction, Some(Rgb::new(255, 200, 180)));
        assert_eq!(config.device.reconnect_timeout_secs, 30);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.plugins.aqi.api_token.as_deref(), Some("secret"));
        assert_eq!(config.plugins.aqi.refresh_period_min, 10);
        assert!(config.plugins.duty_timer.workday_mode);
        assert_eq!(config.plugins.duty_timer.holidays.len(), 1);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let config = Config::parse("[device]\nvendor_id = 0x05ac\n").unwrap();
        assert_eq!(config.device.vendor_id, Some(0x05ac));
        assert_eq!(config.device.reconnect_timeout_secs, 5);
        assert_eq!(config.plugins.aqi.location, "here");
    }

    #[test]
    fn should_report_load_error_for_invalid_toml() {
        assert!(matches!(
            Config::parse("invalid {{{"),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn should_reject_out_of_range_vendor_id() {
        assert!(Config::parse("[device]\nvendor_id = 70000\n").is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent-lumen.toml").unwrap();
        assert_eq!(config.device.reconnect_timeout_secs, 5);
    }

    #[test]
    fn should_require_vendor_id() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("device.vendor_id"))
        ));
    }

    #[test]
    fn should_accept_config_with_vendor_id() {
        let config = Config::parse("[device]\nvendor_id = 0x3434\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("LUMEN_RECONNECT_TIMEOUT", "12"),
            ("LUMEN_LOG", "lumend=debug"),
        ]))
        .unwrap();
        assert_eq!(config.device.reconnect_timeout_secs, 12);
        assert_eq!(config.logging.filter, "lumend=debug");
    }

    #[test]
    fn should_prefer_rust_log_over_lumen_log() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("LUMEN_LOG", "info"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_invalid_reconnect_timeout_override() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(env(&[("LUMEN_RECONNECT_TIMEOUT", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "LUMEN_RECONNECT_TIMEOUT",
                ..
            })
        ));
        assert_eq!(config.device.reconnect_timeout_secs, 5);
    }

    #[test]
    fn should_build_orchestrator_config() {
        let toml = "
            [device]
            vendor_id = 0x3434
            color_correction = [255, 230, 210]
            reconnect_timeout_secs = 3
        ";
        let config = Config::parse(toml).unwrap();
        let orchestrator = config.orchestrator_config().unwrap();
        assert_eq!(orchestrator.address, DeviceAddress::new(0x3434, None));
        assert_eq!(orchestrator.color_correction, Some(Rgb::new(255, 230, 210)));
        assert_eq!(orchestrator.reconnect_timeout, Duration::from_secs(3));
        assert_eq!(orchestrator.max_attempts(), 3);
    }
}
