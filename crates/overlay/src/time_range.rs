use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed date interval sent to the imagery service as `start/end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("time range must look like START/END, got {0:?}")]
    MissingSeparator(String),
    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
    #[error("time range ends before it starts: {start} > {end}")]
    Reversed { start: NaiveDate, end: NaiveDate },
}

const DATE_FORMAT: &str = "%Y-%m-%d";

impl TimeRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TimeRangeError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| TimeRangeError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

impl FromStr for TimeRange {
    type Err = TimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('/')
            .ok_or_else(|| TimeRangeError::MissingSeparator(s.to_string()))?;
        Self::new(parse_date(start)?, parse_date(end)?)
    }
}

impl TryFrom<String> for TimeRange {
    type Error = TimeRangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeRange, TimeRangeError};

    #[test]
    fn parses_and_displays_interval() {
        let r: TimeRange = "2020-03-01/2020-03-31".parse().expect("valid range");
        assert_eq!(r.to_string(), "2020-03-01/2020-03-31");
        assert_eq!(r.days(), 31);
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(matches!(
            "2020-03-01".parse::<TimeRange>(),
            Err(TimeRangeError::MissingSeparator(_))
        ));
        assert!(matches!(
            "2020-03-01/March".parse::<TimeRange>(),
            Err(TimeRangeError::InvalidDate { .. })
        ));
        assert!(matches!(
            "2020-03-31/2020-03-01".parse::<TimeRange>(),
            Err(TimeRangeError::Reversed { .. })
        ));
    }

    #[test]
    fn serializes_as_string() {
        let r: TimeRange = "2025-03-01/2025-03-31".parse().expect("valid range");
        let json = serde_json::to_string(&r).expect("serialize");
        assert_eq!(json, "\"2025-03-01/2025-03-31\"");
        let back: TimeRange = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, r);
        assert!(serde_json::from_str::<TimeRange>("\"nope\"").is_err());
    }
}
