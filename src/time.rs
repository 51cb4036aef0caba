use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::MINUTES_PER_DAY;

/// A connection departure time, stored as minutes since midnight.
///
/// Ordering is numeric, so "9:05" and "09:05" compare equal and sort
/// before "10:00" regardless of how the source file padded them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureTime(u16);

impl DepartureTime {
    /// Build a departure time from an hour and minute of the day
    #[must_use]
    pub const fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let minutes = (hour * 60 + minute) as u16;
        Some(Self(minutes))
    }

    /// Build a departure time from minutes since midnight
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            None
        } else {
            Some(Self(minutes))
        }
    }

    #[must_use]
    pub const fn minutes_since_midnight(self) -> u16 {
        self.0
    }

    /// Hour-of-day component (0-23)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }
}

impl From<NaiveTime> for DepartureTime {
    fn from(time: NaiveTime) -> Self {
        // Seconds are dropped; departures are scheduled to the minute
        #[allow(clippy::cast_possible_truncation)]
        let minutes = (time.hour() * 60 + time.minute()) as u16;
        Self(minutes)
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for DepartureTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_departure(s).map(Self::from)
    }
}

impl Serialize for DepartureTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a time string in HH:MM:SS format
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a valid time in HH:MM:SS format.
pub fn parse_time_hms(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
}

/// Parse a departure time written as `HH:MM` or `HH:MM:SS`.
///
/// The hour may be unpadded (`8:30`), surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns an error if the string matches neither format.
pub fn parse_departure(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").or_else(|_| parse_time_hms(s))
}
