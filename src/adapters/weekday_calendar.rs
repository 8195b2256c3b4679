//! Weekday trading calendar with an explicit holiday list.

use crate::domain::error::FridayError;
use crate::ports::calendar_port::CalendarPort;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Monday through Friday, minus `holidays`.
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }
}

impl CalendarPort for WeekdayCalendar {
    fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, FridayError> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_session(*d))
            .collect())
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}
