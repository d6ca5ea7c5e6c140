//! Inclusive calendar date range.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;

/// Wire format for every date exchanged with the connector.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` range of calendar dates.
///
/// The only way to obtain one is through a checked constructor, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ConnectorError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConnectorError> {
        if start > end {
            return Err(ConnectorError::validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ConnectorError> {
        Self::new(parse_date("start", start)?, parse_date("end", end)?)
    }

    /// Window ending `today` and starting `days` days earlier.
    pub fn last_days(today: NaiveDate, days: u32) -> Result<Self, ConnectorError> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| ConnectorError::validation(format!("{days} days is out of range")))?;
        Self::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included.
    pub fn day_count(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConnectorError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ConnectorError::validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'"))
    })
}
