use std::fmt;

use serde::{Deserialize, Serialize};

/// Minute-precision time of day.
///
/// Ordering is chronological (hour first, then minute).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Last representable minute of a day.
    pub const END_OF_DAY: ClockTime = ClockTime {
        hour: 23,
        minute: 59,
    };

    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn as_minutes(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Saturates at [`ClockTime::END_OF_DAY`].
    pub fn from_minutes(minutes: u16) -> Self {
        let minutes = minutes.min(Self::END_OF_DAY.as_minutes());
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    /// Adds whole hours, saturating at [`ClockTime::END_OF_DAY`].
    pub fn saturating_add_hours(&self, hours: u8) -> Self {
        Self::from_minutes(self.as_minutes() + u16::from(hours) * 60)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// ISO day number, Monday = 1 .. Sunday = 7.
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }
}
