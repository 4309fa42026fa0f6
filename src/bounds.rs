use serde::{Deserialize, Serialize};

use crate::consts::{GREGORIAN_YEAR_DAYS, HIJRI_EPOCH_GREGORIAN_YEAR, HIJRI_YEAR_DAYS};
use crate::convert::Today;
use crate::prelude::*;
use crate::types::CalendarSystem;

/// Inclusive range of years a view accepts.
///
/// Years outside the range are never rejected; they are pulled back to the
/// nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{min}..={max}")]
pub struct YearBounds {
    min: u16,
    max: u16,
}

impl YearBounds {
    /// Creates bounds without checking their order; see
    /// [`CalendarConfig::validate`](crate::CalendarConfig::validate).
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Returns the lower bound
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// Returns the upper bound
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Checks if the year lies within the bounds
    pub const fn contains(&self, year: u16) -> bool {
        self.min <= year && year <= self.max
    }

    /// Pulls `year` into the bounds. The upper bound wins if the bounds are inverted.
    pub fn clamp(&self, year: i64) -> u16 {
        let clamped = year.max(i64::from(self.min)).min(i64::from(self.max));
        u16::try_from(clamped).unwrap_or(self.max)
    }

    /// The year `delta` steps away from `year`, kept within bounds
    /// (previous/next year navigation).
    pub fn step(&self, year: u16, delta: i32) -> u16 {
        self.clamp(i64::from(year) + i64::from(delta))
    }
}

/// Turns free-form year text into a year the view can show.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"2024abc"` reads as 2024. Text with no leading integer, or
/// whose leading integer is zero, falls back to the current year in `system`. The
/// result is clamped to `bounds`.
pub fn resolve_year_input(
    input: &str,
    system: CalendarSystem,
    bounds: YearBounds,
    today: &Today,
) -> u16 {
    let year = leading_integer(input)
        .filter(|&year| year != 0)
        .unwrap_or_else(|| current_year(system, today));
    bounds.clamp(year)
}

fn leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    // Overlong digit runs saturate; clamping follows anyway
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn current_year(system: CalendarSystem, today: &Today) -> i64 {
    match today.in_system(system) {
        Some(date) => i64::from(date.year()),
        None => approximate_hijri_year(today.gregorian.year()),
    }
}

/// Rough Hijri year for a Gregorian year, for when the conversion source
/// cannot say which Hijri year today falls in.
fn approximate_hijri_year(gregorian_year: u16) -> i64 {
    let elapsed = i64::from(gregorian_year) - i64::from(HIJRI_EPOCH_GREGORIAN_YEAR);
    elapsed * i64::from(GREGORIAN_YEAR_DAYS) / i64::from(HIJRI_YEAR_DAYS) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalendarDate;

    fn today() -> Today {
        Today::new(
            CalendarDate::gregorian(2024, 3, 15).unwrap(),
            Some(CalendarDate::hijri(1445, 9, 5).unwrap()),
        )
    }

    #[test]
    fn test_clamp() {
        let bounds = YearBounds::new(1900, 2100);
        assert_eq!(bounds.clamp(1800), 1900);
        assert_eq!(bounds.clamp(2024), 2024);
        assert_eq!(bounds.clamp(3000), 2100);
        assert_eq!(bounds.clamp(-5), 1900);
    }

    #[test]
    fn test_contains() {
        let bounds = YearBounds::new(1350, 1500);
        assert!(bounds.contains(1350));
        assert!(bounds.contains(1500));
        assert!(!bounds.contains(1349));
        assert!(!bounds.contains(1501));
    }

    #[test]
    fn test_step() {
        let bounds = YearBounds::new(1900, 2100);
        assert_eq!(bounds.step(2024, 1), 2025);
        assert_eq!(bounds.step(2024, -1), 2023);
        assert_eq!(bounds.step(2100, 1), 2100);
        assert_eq!(bounds.step(1900, -1), 1900);
    }

    #[test]
    fn test_display() {
        assert_eq!(YearBounds::new(1350, 1500).to_string(), "1350..=1500");
    }

    #[test]
    fn test_resolve_year_input_cases() {
        struct TestCase {
            input:       &'static str,
            system:      CalendarSystem,
            expected:    u16,
            description: &'static str,
        }

        let gregorian = YearBounds::new(1900, 2100);
        let hijri = YearBounds::new(1350, 1500);
        let cases = [
            TestCase {
                input:       "2030",
                system:      CalendarSystem::Gregorian,
                expected:    2030,
                description: "plain year",
            },
            TestCase {
                input:       "  1999 ",
                system:      CalendarSystem::Gregorian,
                expected:    1999,
                description: "surrounding whitespace",
            },
            TestCase {
                input:       "2024abc",
                system:      CalendarSystem::Gregorian,
                expected:    2024,
                description: "trailing garbage",
            },
            TestCase {
                input:       "1850",
                system:      CalendarSystem::Gregorian,
                expected:    1900,
                description: "below range",
            },
            TestCase {
                input:       "99999999999999999999999",
                system:      CalendarSystem::Gregorian,
                expected:    2100,
                description: "overlong digits",
            },
            TestCase {
                input:       "-40",
                system:      CalendarSystem::Gregorian,
                expected:    1900,
                description: "negative",
            },
            TestCase {
                input:       "abc",
                system:      CalendarSystem::Gregorian,
                expected:    2024,
                description: "unparseable falls back to current Gregorian year",
            },
            TestCase {
                input:       "0",
                system:      CalendarSystem::Gregorian,
                expected:    2024,
                description: "zero falls back to current Gregorian year",
            },
            TestCase {
                input:       "000",
                system:      CalendarSystem::Hijri,
                expected:    1445,
                description: "zero digits fall back to current Hijri year",
            },
            TestCase {
                input:       "",
                system:      CalendarSystem::Hijri,
                expected:    1445,
                description: "empty falls back to current Hijri year",
            },
            TestCase {
                input:       "1600",
                system:      CalendarSystem::Hijri,
                expected:    1500,
                description: "above Hijri range",
            },
        ];

        for case in &cases {
            let bounds = match case.system {
                CalendarSystem::Gregorian => gregorian,
                CalendarSystem::Hijri => hijri,
            };
            assert_eq!(
                resolve_year_input(case.input, case.system, bounds, &today()),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_resolve_without_hijri_today() {
        let today = Today::new(CalendarDate::gregorian(2024, 3, 15).unwrap(), None);
        let year = resolve_year_input("x", CalendarSystem::Hijri, YearBounds::new(1350, 1500), &today);
        assert!((1445..=1446).contains(&year), "estimated {year}");
    }

    #[test]
    fn test_serde() {
        let bounds: YearBounds = serde_json::from_str(r#"{"min": 1900, "max": 2100}"#).unwrap();
        assert_eq!(bounds, YearBounds::new(1900, 2100));
    }
}
