//! Workday calendar: weekdays, minus holidays, plus extra workdays.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use lumen_domain::time;

#[derive(Debug, Clone, Default)]
pub struct WorkCalendar {
    holidays: BTreeSet<NaiveDate>,
    extra_workdays: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    #[must_use]
    pub fn new(
        holidays: impl IntoIterator<Item = NaiveDate>,
        extra_workdays: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            extra_workdays: extra_workdays.into_iter().collect(),
        }
    }

    /// An extra workday wins over a holiday listed for the same date.
    #[must_use]
    pub fn is_workday(&self, date: NaiveDate) -> bool {
        if self.extra_workdays.contains(&date) {
            return true;
        }
        !time::is_weekend(date) && !self.holidays.contains(&date)
    }
}
