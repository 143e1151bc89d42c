//! Date window for feed queries.

use chrono::{Duration, NaiveDate, Utc};

use crate::error::{CampusError, CampusResult};

/// How far ahead the default query window reaches.
const DEFAULT_WINDOW_WEEKS: i64 = 150;

/// Inclusive date window passed through to the upstream feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl Default for DateRange {
    /// Today until +DEFAULT_WINDOW_WEEKS.
    fn default() -> Self {
        let today = Utc::now().date_naive();
        DateRange {
            from: today,
            until: today + Duration::weeks(DEFAULT_WINDOW_WEEKS),
        }
    }
}

impl DateRange {
    /// Parse `YYYY-MM-DD` bounds; either side falls back to the default
    /// window when not given.
    pub fn from_args(from: Option<&str>, until: Option<&str>) -> CampusResult<Self> {
        let default = DateRange::default();
        let from = match from {
            Some(raw) => parse_date(raw)?,
            None => default.from,
        };
        let until = match until {
            Some(raw) => parse_date(raw)?,
            None => default.until,
        };
        Ok(DateRange { from, until })
    }

    /// Wire form of the `from` bound (`YYYYMMDD`).
    pub fn from_param(&self) -> String {
        self.from.format("%Y%m%d").to_string()
    }

    /// Wire form of the `until` bound (`YYYYMMDD`).
    pub fn until_param(&self) -> String {
        self.until.format("%Y%m%d").to_string()
    }
}

fn parse_date(raw: &str) -> CampusResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CampusError::Config(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}
