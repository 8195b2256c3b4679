//! Trading calendar port.

use crate::domain::error::FridayError;
use chrono::NaiveDate;

pub trait CalendarPort {
    /// Ordered sessions in `[start, end]`; empty when `start > end`.
    fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, FridayError>;

    fn is_session(&self, date: NaiveDate) -> bool;

    fn require_session(&self, date: NaiveDate) -> Result<(), FridayError> {
        if self.is_session(date) {
            Ok(())
        } else {
            Err(FridayError::CalendarLookup {
                date,
                reason: "not a recognized trading session".into(),
            })
        }
    }

    /// The `n`-th session strictly after `date` (`n >= 1`).
    fn nth_session_after(&self, date: NaiveDate, n: usize) -> Result<NaiveDate, FridayError> {
        let mut current = date;
        let mut found = 0;
        while found < n {
            current = current.succ_opt().ok_or_else(|| FridayError::CalendarLookup {
                date: current,
                reason: "date out of range".into(),
            })?;
            if self.is_session(current) {
                found += 1;
            }
        }
        Ok(current)
    }
}
