//! Gregorian and Hijri (Umm al-Qura) date conversion, plus the month grids a
//! dual-calendar year view is drawn from.
//!
//! Data flows one way: [`CalendarConverter`] feeds [`HijriYearIndexer`], and
//! both feed [`MonthGridBuilder`]. Every stage is a pure function of its
//! inputs; the only state worth keeping between requests is the
//! [`IndexCache`], which the caller owns.

mod bounds;
mod config;
mod consts;
mod convert;
mod grid;
mod index;
mod prelude;
mod types;

pub use bounds::{YearBounds, resolve_year_input};
pub use config::{CalendarConfig, ConfigError, NameStyle};
pub use consts::*;
pub use convert::{
    CalendarConverter, ConversionError, ConversionResult, ExtendedUmmAlQura, HijriParts, HijriSource,
    TabularIslamic, Today, UmmAlQura,
};
pub use grid::{DayCell, GridRequest, MonthGrid, MonthGridBuilder, SecondarySpan, YearLayout};
pub use index::{HijriYearIndex, HijriYearIndexer, IndexCache, ScanWindow, scan_window};
pub use types::{CalendarSystem, Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

/// A calendar date (day granularity) in one of the two supported calendars.
///
/// Two values in different systems may name the same real-world day. That
/// equivalence only exists through [`CalendarConverter`]; comparing fields
/// across systems means nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{:04}-{:02}-{:02}{}",
    "year.get()",
    "month.get()",
    "day.get()",
    "suffix(*system)"
)]
pub struct CalendarDate {
    system: CalendarSystem,
    year:   Year,
    month:  Month,
    day:    Day,
}

const fn suffix(system: CalendarSystem) -> &'static str {
    match system {
        CalendarSystem::Gregorian => "",
        CalendarSystem::Hijri => " AH",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02} (max {max})")]
    InvalidDay { year: u16, month: u8, day: u8, max: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Last Gregorian day this crate can represent
    pub const LAST_GREGORIAN: Self = Self {
        system: CalendarSystem::Gregorian,
        year:   Year::LAST,
        month:  Month::LAST,
        day:    Day::LAST_OF_YEAR,
    };

    /// Creates a validated date in the given calendar.
    ///
    /// # Errors
    /// Returns `ParseError` if any component is out of range for that calendar.
    pub fn new(system: CalendarSystem, year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, system, year, month)?;
        Ok(Self {
            system,
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    /// Creates a proleptic Gregorian date.
    ///
    /// # Errors
    /// Returns `ParseError` if the date does not exist.
    pub fn gregorian(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Self::new(CalendarSystem::Gregorian, year, month, day)
    }

    /// Creates a Hijri date. Day 30 is accepted for any month here; whether
    /// the month actually has 30 days is known only to the conversion table.
    ///
    /// # Errors
    /// Returns `ParseError` if a component is out of range.
    pub fn hijri(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Self::new(CalendarSystem::Hijri, year, month, day)
    }

    pub const fn system(&self) -> CalendarSystem {
        self.system
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// `(year, month)` pair, the key month-level grouping works on
    pub const fn year_month(&self) -> (u16, u8) {
        (self.year.get(), self.month.get())
    }

    pub const fn is_gregorian(&self) -> bool {
        matches!(self.system, CalendarSystem::Gregorian)
    }

    /// Converts a Gregorian date to a chrono date. Hijri dates have no direct
    /// chrono equivalent and return `None`.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        if !self.is_gregorian() {
            return None;
        }
        NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month()),
            u32::from(self.day()),
        )
    }

    /// Builds a Gregorian date from a chrono date, if the year is in `1..=MAX_YEAR`.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        let year = u16::try_from(date.year()).ok()?;
        let month = u8::try_from(date.month()).ok()?;
        let day = u8::try_from(date.day()).ok()?;
        Self::gregorian(year, month, day).ok()
    }

    /// Column of this day in a Saturday-first week (Saturday = 0 .. Friday = 6).
    /// Only meaningful for Gregorian dates; Hijri dates return `None`.
    pub fn weekday_from_saturday(&self) -> Option<usize> {
        let sunday_first = self.to_naive()?.weekday().num_days_from_sunday();
        usize::try_from((sunday_first + 1) % 7).ok()
    }

    /// The following Gregorian day. `None` for Hijri dates or past `MAX_YEAR`.
    pub fn succ(&self) -> Option<Self> {
        if !self.is_gregorian() {
            return None;
        }
        let (y, m, d) = types::next_day(self.year(), self.month(), self.day())?;
        Self::gregorian(y, m, d).ok()
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD` as Gregorian and `YYYY-MM-DD AH` as Hijri.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let (body, system) = match trimmed.strip_suffix(HIJRI_SUFFIX) {
            Some(rest) => (rest.trim_end(), CalendarSystem::Hijri),
            None => (trimmed, CalendarSystem::Gregorian),
        };

        let parts: Vec<&str> = body.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} part(s): {s}",
                parts.len()
            )));
        }

        let year = Self::parse_u16(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;
        Self::new(system, year, month, day)
    }
}

impl CalendarDate {
    /// Helper to parse u16 with better error messages
    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        s.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gregorian_constructor() {
        let date = CalendarDate::gregorian(2024, 2, 29).unwrap();
        assert_eq!(date.system(), CalendarSystem::Gregorian);
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 2);
        assert_eq!(date.day(), 29);
        assert!(CalendarDate::gregorian(2023, 2, 29).is_err());
    }

    #[test]
    fn test_hijri_constructor() {
        let date = CalendarDate::hijri(1445, 9, 30).unwrap();
        assert_eq!(date.system(), CalendarSystem::Hijri);
        assert_eq!(date.year_month(), (1445, 9));
        assert!(CalendarDate::hijri(1445, 13, 1).is_err());
        assert!(CalendarDate::hijri(1445, 1, 31).is_err());
    }

    #[test]
    fn test_display() {
        let g = CalendarDate::gregorian(2024, 2, 1).unwrap();
        assert_eq!(g.to_string(), "2024-02-01");

        let h = CalendarDate::hijri(1445, 7, 21).unwrap();
        assert_eq!(h.to_string(), "1445-07-21 AH");
    }

    #[test]
    fn test_parse_gregorian() {
        let date = "2024-02-01".parse::<CalendarDate>().unwrap();
        assert_eq!(date, CalendarDate::gregorian(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_parse_hijri() {
        let date = "1445-07-21 AH".parse::<CalendarDate>().unwrap();
        assert_eq!(date, CalendarDate::hijri(1445, 7, 21).unwrap());

        let tight = "1445-07-21AH".parse::<CalendarDate>().unwrap();
        assert_eq!(tight, date);
    }

    #[test]
    fn test_parse_errors() {
        struct TestCase {
            input:       &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input:       "",
                description: "empty input",
            },
            TestCase {
                input:       "2024-02",
                description: "missing day",
            },
            TestCase {
                input:       "2024-02-01-05",
                description: "too many parts",
            },
            TestCase {
                input:       "2024-xx-01",
                description: "non-numeric month",
            },
            TestCase {
                input:       "2023-02-29",
                description: "day past month end",
            },
            TestCase {
                input:       "0000-01-01",
                description: "year zero",
            },
        ];

        for case in &cases {
            assert!(
                case.input.parse::<CalendarDate>().is_err(),
                "Expected failure for: {}",
                case.description
            );
        }
        assert_eq!("  ".parse::<CalendarDate>(), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_serde_as_string() {
        let date = CalendarDate::hijri(1445, 1, 1).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"1445-01-01 AH\"");

        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }

    #[test]
    fn test_naive_bridge() {
        let date = CalendarDate::gregorian(2024, 2, 1).unwrap();
        let naive = date.to_naive().unwrap();
        assert_eq!(naive, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(CalendarDate::from_naive(naive), Some(date));

        let hijri = CalendarDate::hijri(1445, 1, 1).unwrap();
        assert_eq!(hijri.to_naive(), None);
    }

    #[test]
    fn test_weekday_from_saturday() {
        // 2024-02-01 is a Thursday (Sunday-first 4)
        let thursday = CalendarDate::gregorian(2024, 2, 1).unwrap();
        assert_eq!(thursday.weekday_from_saturday(), Some(5));

        let saturday = CalendarDate::gregorian(2024, 2, 3).unwrap();
        assert_eq!(saturday.weekday_from_saturday(), Some(0));

        let friday = CalendarDate::gregorian(2024, 2, 2).unwrap();
        assert_eq!(friday.weekday_from_saturday(), Some(6));
    }

    #[test]
    fn test_succ() {
        let date = CalendarDate::gregorian(2023, 12, 31).unwrap();
        assert_eq!(date.succ(), Some(CalendarDate::gregorian(2024, 1, 1).unwrap()));
        assert_eq!(CalendarDate::hijri(1445, 1, 1).unwrap().succ(), None);
    }

    #[test]
    fn test_ordering_within_system() {
        let a = CalendarDate::gregorian(2024, 1, 31).unwrap();
        let b = CalendarDate::gregorian(2024, 2, 1).unwrap();
        assert!(a < b);
    }
}
