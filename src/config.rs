//! Caller-supplied settings for conversion, indexing and grid building.

use serde::{Deserialize, Serialize};

use crate::bounds::YearBounds;
use crate::consts::{
    GREGORIAN_MONTHS_AR, GREGORIAN_MONTHS_EN, GREGORIAN_YEAR_RANGE, HIJRI_MONTHS_AR,
    HIJRI_MONTHS_EN, HIJRI_YEAR_RANGE,
};

/// Language month names are produced in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    #[default]
    Arabic,
    English,
}

impl NameStyle {
    /// Name of Hijri month `month` (1 = Muharram), if it exists.
    pub fn hijri_month(self, month: u8) -> Option<&'static str> {
        let table = match self {
            Self::Arabic => &HIJRI_MONTHS_AR,
            Self::English => &HIJRI_MONTHS_EN,
        };
        table.get(usize::from(month).checked_sub(1)?).copied()
    }

    /// Name of Gregorian month `month` (1 = January), if it exists.
    pub fn gregorian_month(self, month: u8) -> Option<&'static str> {
        let table = match self {
            Self::Arabic => &GREGORIAN_MONTHS_AR,
            Self::English => &GREGORIAN_MONTHS_EN,
        };
        table.get(usize::from(month).checked_sub(1)?).copied()
    }
}

/// Error raised by [`CalendarConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A year range whose lower bound exceeds its upper bound.
    #[error("invalid {calendar} year bounds: {min} > {max}")]
    InvertedBounds {
        calendar: &'static str,
        min:      u16,
        max:      u16,
    },

    /// A year range reaching outside what a date can represent.
    #[error("invalid {calendar} year bounds: {min}..={max} must lie within 1..=9999")]
    UnrepresentableBounds {
        calendar: &'static str,
        min:      u16,
        max:      u16,
    },
}

/// Settings for a dual-calendar year view.
///
/// Every field has a default, so a partial JSON document such as
/// `{"names": "english"}` is enough to deserialize one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Years accepted for a Gregorian-primary view.
    pub gregorian_years: YearBounds,
    /// Years accepted for a Hijri-primary view.
    pub hijri_years:     YearBounds,
    /// How many Hijri year indices stay resident in an [`IndexCache`](crate::IndexCache).
    pub cache_capacity:  usize,
    /// Language of month names.
    pub names:           NameStyle,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            gregorian_years: YearBounds::new(GREGORIAN_YEAR_RANGE.0, GREGORIAN_YEAR_RANGE.1),
            hijri_years:     YearBounds::new(HIJRI_YEAR_RANGE.0, HIJRI_YEAR_RANGE.1),
            cache_capacity:  1,
            names:           NameStyle::default(),
        }
    }
}

impl CalendarConfig {
    /// Checks that both year ranges are ordered and representable.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the first offending range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_bounds("Gregorian", self.gregorian_years)?;
        check_bounds("Hijri", self.hijri_years)
    }

    /// Bounds for the given calendar.
    pub const fn bounds(&self, system: crate::CalendarSystem) -> YearBounds {
        match system {
            crate::CalendarSystem::Gregorian => self.gregorian_years,
            crate::CalendarSystem::Hijri => self.hijri_years,
        }
    }
}

fn check_bounds(calendar: &'static str, bounds: YearBounds) -> Result<(), ConfigError> {
    let (min, max) = (bounds.min(), bounds.max());
    if min > max {
        return Err(ConfigError::InvertedBounds { calendar, min, max });
    }
    if min == 0 || max > crate::MAX_YEAR {
        return Err(ConfigError::UnrepresentableBounds { calendar, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalendarSystem;

    #[test]
    fn test_defaults() {
        let config = CalendarConfig::default();
        assert_eq!(config.gregorian_years, YearBounds::new(1900, 2100));
        assert_eq!(config.hijri_years, YearBounds::new(1350, 1500));
        assert_eq!(config.cache_capacity, 1);
        assert_eq!(config.names, NameStyle::Arabic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: CalendarConfig = serde_json::from_str(r#"{"names": "english"}"#).unwrap();
        assert_eq!(config.names, NameStyle::English);
        assert_eq!(config.hijri_years, YearBounds::new(1350, 1500));
    }

    #[test]
    fn test_full_json_round_trip() {
        let json = r#"{
            "gregorian_years": {"min": 1950, "max": 2050},
            "hijri_years": {"min": 1370, "max": 1480},
            "cache_capacity": 3,
            "names": "arabic"
        }"#;
        let config: CalendarConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bounds(CalendarSystem::Gregorian), YearBounds::new(1950, 2050));
        assert_eq!(config.bounds(CalendarSystem::Hijri), YearBounds::new(1370, 1480));
        assert_eq!(config.cache_capacity, 3);

        let back: CalendarConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validate_rejects_inverted() {
        let config = CalendarConfig {
            hijri_years: YearBounds::new(1500, 1350),
            ..CalendarConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedBounds {
                calendar: "Hijri",
                min:      1500,
                max:      1350,
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_year() {
        let config = CalendarConfig {
            gregorian_years: YearBounds::new(0, 2100),
            ..CalendarConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnrepresentableBounds { calendar: "Gregorian", .. })
        ));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(NameStyle::English.hijri_month(9), Some("Ramadan"));
        assert_eq!(NameStyle::Arabic.hijri_month(9), Some("رمضان"));
        assert_eq!(NameStyle::English.gregorian_month(2), Some("February"));
        assert_eq!(NameStyle::Arabic.gregorian_month(1), Some("يناير"));
        assert_eq!(NameStyle::English.hijri_month(0), None);
        assert_eq!(NameStyle::English.gregorian_month(13), None);
    }
}
