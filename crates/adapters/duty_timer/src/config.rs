//! Duty-timer configuration (`[plugins.duty_timer]`).

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

/// Settings of the duty-timer automation.
///
/// Dates are quoted ISO strings (`"2026-10-01"`), times are `"HH:MM"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DutyTimerConfig {
    /// Start of the duty window (inclusive).
    #[serde(deserialize_with = "hh_mm::deserialize")]
    pub start_time: NaiveTime,
    /// End of the duty window (inclusive). Earlier than `start_time` means
    /// the window runs past midnight.
    #[serde(deserialize_with = "hh_mm::deserialize")]
    pub end_time: NaiveTime,
    /// Only workdays can be on duty.
    pub workday_mode: bool,
    /// Weekdays that are not workdays.
    pub holidays: Vec<NaiveDate>,
    /// Weekend days that are workdays.
    pub extra_workdays: Vec<NaiveDate>,
    /// Dim the source's lighting to this level while on duty, instead of
    /// leaving it untouched.
    pub brightness: Option<u8>,
}

impl Default for DutyTimerConfig {
    fn default() -> Self {
        Self {
            start_time: hour_minute(8, 0),
            end_time: hour_minute(20, 0),
            workday_mode: false,
            holidays: Vec::new(),
            extra_workdays: Vec::new(),
            brightness: None,
        }
    }
}

fn hour_minute(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .map_err(|err| D::Error::custom(format!("invalid time `{raw}`, expected HH:MM: {err}")))
    }
}
