//! Daily duty window.

use std::fmt;

use chrono::NaiveTime;

/// A daily time window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DutyWindow {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether the window runs past midnight.
    #[must_use]
    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }

    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.is_overnight() {
            time >= self.start || time <= self.end
        } else {
            time >= self.start && time <= self.end
        }
    }
}

impl fmt::Display for DutyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
