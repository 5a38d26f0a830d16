//! # lumen-adapter-duty-timer
//!
//! Automation that switches the lighting off outside a daily duty window,
//! optionally only on workdays. While on duty it leaves the source's
//! decision alone, or dims it to a configured brightness.

pub mod calendar;
pub mod config;
pub mod window;

use lumen_app::ports::{Clock, LightAutomation, SystemClock};
use lumen_domain::error::PluginError;
use lumen_domain::light::LightEntry;
use lumen_domain::time::LocalTime;

pub use calendar::WorkCalendar;
pub use config::DutyTimerConfig;
pub use window::DutyWindow;

/// Display name of the automation.
pub const NAME: &str = "Duty Timer";

/// Forces the lighting off outside working hours.
pub struct DutyTimerAutomation<K = SystemClock> {
    window: DutyWindow,
    calendar: WorkCalendar,
    workday_mode: bool,
    brightness: Option<u8>,
    clock: K,
}

impl DutyTimerAutomation<SystemClock> {
    #[must_use]
    pub fn from_config(config: &DutyTimerConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<K: Clock> DutyTimerAutomation<K> {
    #[must_use]
    pub fn new(config: &DutyTimerConfig, clock: K) -> Self {
        Self {
            window: DutyWindow::new(config.start_time, config.end_time),
            calendar: WorkCalendar::new(
                config.holidays.iter().copied(),
                config.extra_workdays.iter().copied(),
            ),
            workday_mode: config.workday_mode,
            brightness: config.brightness,
            clock,
        }
    }

    /// Whether `now` is inside working hours.
    #[must_use]
    pub fn is_on_duty(&self, now: LocalTime) -> bool {
        if self.workday_mode && !self.calendar.is_workday(now.date()) {
            return false;
        }
        self.window.contains(now.time())
    }

    /// The override for `now`.
    #[must_use]
    pub fn decide(&self, now: LocalTime) -> Option<LightEntry> {
        if self.is_on_duty(now) {
            tracing::info!(plugin = NAME, window = %self.window, "on duty");
            self.brightness
                .map(|level| LightEntry::default().with_brightness(level))
        } else {
            tracing::info!(plugin = NAME, window = %self.window, "off duty");
            Some(LightEntry::off())
        }
    }
}

impl<K: Clock> LightAutomation for DutyTimerAutomation<K> {
    fn name(&self) -> &str {
        NAME
    }

    async fn light_entry(&self) -> Result<Option<LightEntry>, PluginError> {
        Ok(self.decide(self.clock.now()))
    }
}
