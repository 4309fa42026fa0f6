use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    HIJRI_LONG_MONTH, JANUARY, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;

/// The two calendars a [`CalendarDate`](crate::CalendarDate) can be expressed in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    /// Proleptic Gregorian civil calendar
    #[display(fmt = "Gregorian")]
    Gregorian,
    /// Hijri lunar calendar, Umm al-Qura reckoning
    #[display(fmt = "Hijri")]
    Hijri,
}

impl CalendarSystem {
    /// The calendar shown alongside this one in a dual-calendar grid
    pub const fn other(self) -> Self {
        match self {
            Self::Gregorian => Self::Hijri,
            Self::Hijri => Self::Gregorian,
        }
    }
}

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub(crate) const LAST: Self = match NonZeroU16::new(MAX_YEAR) {
        Some(value) => Self(value),
        None => Self(NonZeroU16::MIN),
    };
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12).
/// The same bound holds for Gregorian and Hijri months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    pub(crate) const LAST: Self = match NonZeroU8::new(MAX_MONTH) {
        Some(value) => Self(value),
        None => Self(NonZeroU8::MIN),
    };
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given calendar, year and month.
///
/// Gregorian days are checked against the proleptic month length. Hijri month
/// lengths come from the conversion table, so only the upper bound of 30 is
/// enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating it against the month it belongs to
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, system: CalendarSystem, year: u16, month: u8) -> Result<Self, ParseError> {
        let max = max_day(system, year, month);
        let invalid = ParseError::InvalidDay {
            year,
            month,
            day: value,
            max,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if value > max {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// December 31st
    pub(crate) const LAST_OF_YEAR: Self = match NonZeroU8::new(DAYS_IN_MONTH[DECEMBER as usize]) {
        Some(value) => Self(value),
        None => Self(NonZeroU8::MIN),
    };
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Without month context only the calendar-wide bounds can be checked
        let value = u8::deserialize(deserializer)?;
        match NonZeroU8::new(value) {
            Some(non_zero) if value <= DAYS_IN_MONTH[JANUARY as usize] => Ok(Self(non_zero)),
            _ => Err(serde::de::Error::custom(format!("invalid day: {value}"))),
        }
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Days in a Gregorian month, or 0 if `month` is not in `1..=12`.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    if month == 0 || month > MAX_MONTH {
        0
    } else if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Largest day number a month may hold in the given calendar.
pub(crate) const fn max_day(system: CalendarSystem, year: u16, month: u8) -> u8 {
    match system {
        CalendarSystem::Gregorian => days_in_month(year, month),
        CalendarSystem::Hijri => HIJRI_LONG_MONTH,
    }
}

/// The Gregorian day after `(year, month, day)`, or `None` past `MAX_YEAR`.
pub(crate) fn next_day(year: u16, month: u8, day: u8) -> Option<(u16, u8, u8)> {
    if day < days_in_month(year, month) {
        return Some((year, month, day + 1));
    }
    if month < DECEMBER {
        Some((year, month + 1, MIN_DAY))
    } else if year >= MAX_YEAR {
        None
    } else {
        Some((year + 1, JANUARY, MIN_DAY))
    }
}
