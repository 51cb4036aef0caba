use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::DepartureTime;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    #[error("time range starts at {start} after it ends at {end}")]
    InvertedRange { start: DepartureTime, end: DepartureTime },
    #[error("hour {0} is outside 0-23")]
    HourOutOfRange(u8),
}

/// Which departures a filter pass keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TimeWindow {
    /// Keep every departure
    #[default]
    All,
    /// Keep `start <= departure <= end`
    Range { start: DepartureTime, end: DepartureTime },
    /// Keep departures whose hour lies in `start_hour..=end_hour`, wrapping past
    /// midnight when `start_hour > end_hour` (e.g. 18 to 6)
    HourOfDay { start_hour: u8, end_hour: u8 },
}

impl TimeWindow {
    /// Inclusive range between two departure times
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn range(start: DepartureTime, end: DepartureTime) -> Result<Self, TimeWindowError> {
        let window = Self::Range { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Hour-of-day window, overnight when `start_hour > end_hour`
    ///
    /// # Errors
    ///
    /// Returns an error if either hour is above 23.
    pub fn hour_of_day(start_hour: u8, end_hour: u8) -> Result<Self, TimeWindowError> {
        let window = Self::HourOfDay { start_hour, end_hour };
        window.validate()?;
        Ok(window)
    }

    /// The widest range over a set of departure times.
    ///
    /// A single distinct time gives a window of that one instant; no times
    /// at all gives `All`.
    #[must_use]
    pub fn full_range(times: &[DepartureTime]) -> Self {
        let (Some(&start), Some(&end)) = (times.iter().min(), times.iter().max()) else {
            return Self::All;
        };
        Self::Range { start, end }
    }

    /// Check a window built field by field, e.g. after deserializing
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted range or an hour above 23.
    pub fn validate(&self) -> Result<(), TimeWindowError> {
        match *self {
            Self::All => Ok(()),
            Self::Range { start, end } => {
                if start > end {
                    Err(TimeWindowError::InvertedRange { start, end })
                } else {
                    Ok(())
                }
            }
            Self::HourOfDay { start_hour, end_hour } => {
                if let Some(hour) = [start_hour, end_hour].into_iter().find(|h| *h > 23) {
                    Err(TimeWindowError::HourOutOfRange(hour))
                } else {
                    Ok(())
                }
            }
        }
    }

    #[must_use]
    pub const fn is_overnight(&self) -> bool {
        matches!(self, Self::HourOfDay { start_hour, end_hour } if *start_hour > *end_hour)
    }

    #[must_use]
    pub fn contains(&self, departure: DepartureTime) -> bool {
        match *self {
            Self::All => true,
            Self::Range { start, end } => start <= departure && departure <= end,
            Self::HourOfDay { start_hour, end_hour } => contains_hour(start_hour, end_hour, departure.hour()),
        }
    }
}

/// Hour-of-day test with overnight wraparound
#[must_use]
pub fn contains_hour(start_hour: u8, end_hour: u8, hour: u8) -> bool {
    if start_hour <= end_hour {
        start_hour <= hour && hour <= end_hour
    } else {
        hour >= start_hour || hour <= end_hour
    }
}
