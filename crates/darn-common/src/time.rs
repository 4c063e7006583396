//! Date and time-of-day handling for map runs.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DarnError;

/// The day a convection map run covers, written `YYYYMMDD` in every file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MapDate(NaiveDate);

impl MapDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight at the start of this day.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Compact form used in file names.
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl FromStr for MapDate {
    type Err = DarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(DarnError::invalid("date", format!("'{}' is not YYYYMMDD", s)));
        }
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(MapDate)
            .map_err(|e| DarnError::invalid("date", format!("'{}': {}", s, e)))
    }
}

impl TryFrom<String> for MapDate {
    type Error = DarnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MapDate> for String {
    fn from(value: MapDate) -> Self {
        value.compact()
    }
}

impl fmt::Display for MapDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// A wall-clock time within the map day, written `hh:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub const START_OF_DAY: TimeOfDay = TimeOfDay(NaiveTime::MIN);

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Last minute of the day (23:59).
    pub fn end_of_day() -> Self {
        TimeOfDay(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// `hhmm` without the colon, as used in plot file names.
    pub fn compact(&self) -> String {
        format!("{:02}{:02}", self.hour(), self.minute())
    }

    /// Add seconds, clamping to 23:59 instead of wrapping past midnight.
    pub fn add_seconds_clamped(&self, seconds: i64) -> Self {
        let end = Self::end_of_day();
        let (shifted, wrapped) = self.0.overflowing_add_signed(Duration::seconds(seconds));
        if wrapped != 0 || shifted > end.0 {
            end
        } else {
            TimeOfDay(shifted.with_second(0).unwrap_or(shifted))
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = DarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| DarnError::invalid("time", format!("'{}' is not hh:mm", s)))?;
        if h.len() != 2 || m.len() != 2 {
            return Err(DarnError::invalid("time", format!("'{}' is not hh:mm", s)));
        }
        let hour: u32 = h
            .parse()
            .map_err(|_| DarnError::invalid("time", format!("bad hour in '{}'", s)))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| DarnError::invalid("time", format!("bad minute in '{}'", s)))?;
        Self::from_hm(hour, minute)
            .ok_or_else(|| DarnError::invalid("time", format!("'{}' is out of range", s)))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DarnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_date() {
        let date: MapDate = "20170301".parse().unwrap();
        assert_eq!(date.to_string(), "20170301");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2017, 3, 1).unwrap());
    }

    #[test]
    fn test_reject_bad_dates() {
        assert!("2017031".parse::<MapDate>().is_err());
        assert!("2017-03-01".parse::<MapDate>().is_err());
        assert!("20170230".parse::<MapDate>().is_err());
    }

    #[test]
    fn test_parse_time_of_day() {
        let t: TimeOfDay = "10:04".parse().unwrap();
        assert_eq!(t.hour(), 10);
        assert_eq!(t.minute(), 4);
        assert_eq!(t.compact(), "1004");
        assert_eq!(t.to_string(), "10:04");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("9:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_add_seconds_clamped() {
        let t: TimeOfDay = "10:04".parse().unwrap();
        assert_eq!(t.add_seconds_clamped(120).to_string(), "10:06");

        let late: TimeOfDay = "23:58".parse().unwrap();
        assert_eq!(late.add_seconds_clamped(600).to_string(), "23:59");
    }
}
