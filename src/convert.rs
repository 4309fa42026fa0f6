//! Single-date conversion between the Gregorian and Hijri calendars.
//!
//! The Gregorian to Hijri direction is delegated to a [`HijriSource`], the
//! authoritative table or algorithm. The reverse direction is derived from it:
//! an arithmetic estimate is refined by probing nearby Gregorian days until
//! one converts back to the requested Hijri date.

use chrono::{Datelike, Local, NaiveDate};
use hijri_date::HijriDate;
use serde::{Deserialize, Serialize};

use crate::config::NameStyle;
use crate::consts::{CE_JDN_OFFSET, HIJRI_EPOCH_JDN, PROBE_RADIUS};
use crate::types::CalendarSystem;
use crate::CalendarDate;

/// Hijri components reported by a [`HijriSource`].
///
/// A `None` component is unknown. It is never read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HijriParts {
    pub year:  Option<u32>,
    pub month: Option<u32>,
    pub day:   Option<u32>,
}

impl HijriParts {
    /// All three components known
    pub const fn new(year: u32, month: u32, day: u32) -> Self {
        Self {
            year:  Some(year),
            month: Some(month),
            day:   Some(day),
        }
    }

    /// A Hijri date, if every component is present and in range
    pub fn to_date(self) -> Option<CalendarDate> {
        let year = u16::try_from(self.year?).ok()?;
        let month = u8::try_from(self.month?).ok()?;
        let day = u8::try_from(self.day?).ok()?;
        CalendarDate::hijri(year, month, day).ok()
    }
}

/// The Gregorian to Hijri conversion capability the rest of the crate is built on.
///
/// Implementations are trusted to be calendrically correct. The only failure
/// they signal is having no answer (`None`) or an incomplete one.
pub trait HijriSource {
    /// Hijri components for a valid proleptic Gregorian date.
    fn hijri_parts(&self, year: i32, month: u32, day: u32) -> Option<HijriParts>;
}

impl<S: HijriSource + ?Sized> HijriSource for &S {
    fn hijri_parts(&self, year: i32, month: u32, day: u32) -> Option<HijriParts> {
        (**self).hijri_parts(year, month, day)
    }
}

/// Umm al-Qura calendar of Saudi Arabia, read from the `hijri_date` tables.
///
/// The tables cover roughly 1356..=1500 AH. Gregorian days outside
/// 1938-01-01..=2076-12-31 are reported as unavailable; see
/// [`ExtendedUmmAlQura`] for a source that answers for every day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UmmAlQura;

impl UmmAlQura {
    const FIRST: (i32, u32, u32) = (1938, 1, 1);
    const LAST: (i32, u32, u32) = (2076, 12, 31);
}

impl HijriSource for UmmAlQura {
    fn hijri_parts(&self, year: i32, month: u32, day: u32) -> Option<HijriParts> {
        let key = (year, month, day);
        if key < Self::FIRST || key > Self::LAST {
            return None;
        }

        let hd = HijriDate::from_gr(
            usize::try_from(year).ok()?,
            usize::try_from(month).ok()?,
            usize::try_from(day).ok()?,
        )
        .ok()?;
        Some(HijriParts {
            year:  u32::try_from(hd.year()).ok(),
            month: u32::try_from(hd.month()).ok(),
            day:   u32::try_from(hd.day()).ok(),
        })
    }
}

/// Umm al-Qura where the table has data, and the tabular calendar beyond it.
///
/// Outside the table the tabular calendar is shifted so that it agrees with
/// the table's nearest covered day. Consecutive Gregorian days then stay
/// consecutive Hijri days across both table edges. Dates beyond the table are
/// arithmetic estimates and may be a day or two off the official calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedUmmAlQura;

impl ExtendedUmmAlQura {
    fn extrapolate(date: NaiveDate, edge: (i32, u32, u32)) -> Option<HijriParts> {
        let (year, month, day) = edge;
        let anchor = UmmAlQura.hijri_parts(year, month, day)?;
        let anchor_jdn = TabularIslamic::jdn(
            i64::from(anchor.year?),
            i64::from(anchor.month?),
            i64::from(anchor.day?),
        );
        let shift = anchor_jdn - julian_day(NaiveDate::from_ymd_opt(year, month, day)?);
        Some(TabularIslamic::parts_at(julian_day(date) + shift))
    }
}

impl HijriSource for ExtendedUmmAlQura {
    fn hijri_parts(&self, year: i32, month: u32, day: u32) -> Option<HijriParts> {
        let key = (year, month, day);
        let edge = if key < UmmAlQura::FIRST {
            UmmAlQura::FIRST
        } else if key > UmmAlQura::LAST {
            UmmAlQura::LAST
        } else {
            return UmmAlQura.hijri_parts(year, month, day);
        };
        Self::extrapolate(NaiveDate::from_ymd_opt(year, month, day)?, edge)
    }
}

/// Arithmetic (civil, "Kuwaiti") Hijri calendar: 30-year cycle with 11 leap
/// years, odd months of 30 days and even months of 29.
///
/// Defined for every date, but can differ from Umm al-Qura by a day or two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabularIslamic;

impl TabularIslamic {
    /// Julian day number of a tabular Hijri date
    pub(crate) const fn jdn(year: i64, month: i64, day: i64) -> i64 {
        day + (59 * (month - 1) + 1) / 2
            + (year - 1) * 354
            + (3 + 11 * year).div_euclid(30)
            + HIJRI_EPOCH_JDN
            - 1
    }

    /// Tabular Hijri `(year, month, day)` for a Julian day number
    pub(crate) const fn from_jdn(jdn: i64) -> (i64, i64, i64) {
        let year = (30 * (jdn - HIJRI_EPOCH_JDN) + 10646).div_euclid(10631);
        let into_year = jdn - (29 + Self::jdn(year, 1, 1));
        let month = if into_year <= 0 {
            1
        } else {
            let month = (2 * into_year + 58) / 59 + 1;
            if month > 12 { 12 } else { month }
        };
        let day = jdn - Self::jdn(year, month, 1) + 1;
        (year, month, day)
    }

    /// Tabular date of a Julian day number. Days before the epoch come back
    /// with a year that [`HijriParts::to_date`] rejects.
    fn parts_at(jdn: i64) -> HijriParts {
        let (year, month, day) = Self::from_jdn(jdn);
        HijriParts {
            year:  u32::try_from(year).ok(),
            month: u32::try_from(month).ok(),
            day:   u32::try_from(day).ok(),
        }
    }
}

impl HijriSource for TabularIslamic {
    fn hijri_parts(&self, year: i32, month: u32, day: u32) -> Option<HijriParts> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self::parts_at(julian_day(date)))
    }
}

/// Julian day number of a proleptic Gregorian date
fn julian_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + CE_JDN_OFFSET
}

/// Failure of a single-date conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The conversion source produced no usable answer for this date.
    #[error("no {target} equivalent available for {from}")]
    Unavailable {
        from:   CalendarDate,
        target: CalendarSystem,
    },
}

pub type ConversionResult = Result<CalendarDate, ConversionError>;

/// The current day in both calendars, captured once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Today {
    pub gregorian: CalendarDate,
    /// `None` when the conversion source has no answer for today
    pub hijri:     Option<CalendarDate>,
}

impl Today {
    pub const fn new(gregorian: CalendarDate, hijri: Option<CalendarDate>) -> Self {
        Self { gregorian, hijri }
    }

    /// Today expressed in `system`, if known
    pub const fn in_system(&self, system: CalendarSystem) -> Option<CalendarDate> {
        match system {
            CalendarSystem::Gregorian => Some(self.gregorian),
            CalendarSystem::Hijri => self.hijri,
        }
    }
}

/// Converts single dates between the two calendars and names their months.
#[derive(Debug, Clone, Default)]
pub struct CalendarConverter<S = ExtendedUmmAlQura> {
    source: S,
    names:  NameStyle,
}

impl<S: HijriSource> CalendarConverter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            names: NameStyle::default(),
        }
    }

    /// Switches the language month names are produced in
    #[must_use]
    pub fn with_names(mut self, names: NameStyle) -> Self {
        self.names = names;
        self
    }

    pub const fn names(&self) -> NameStyle {
        self.names
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Hijri equivalent of a Gregorian date, as the source reports it. Hijri
    /// input is returned unchanged.
    ///
    /// # Errors
    /// Returns `ConversionError::Unavailable` if the source has no answer or
    /// an incomplete one.
    pub fn to_hijri(&self, date: &CalendarDate) -> ConversionResult {
        if !date.is_gregorian() {
            return Ok(*date);
        }
        let parts = self.source.hijri_parts(
            i32::from(date.year()),
            u32::from(date.month()),
            u32::from(date.day()),
        );
        match parts.and_then(HijriParts::to_date) {
            Some(hijri) => Ok(hijri),
            None => {
                tracing::trace!(%date, ?parts, "Hijri conversion unavailable");
                Err(ConversionError::Unavailable {
                    from:   *date,
                    target: CalendarSystem::Hijri,
                })
            }
        }
    }

    /// Gregorian equivalent of a Hijri date. Gregorian input is returned unchanged.
    ///
    /// Starts from the arithmetic calendar's estimate and accepts only a
    /// Gregorian day that converts back to exactly `date`.
    ///
    /// # Errors
    /// Returns `ConversionError::Unavailable` if no nearby Gregorian day maps
    /// to `date`, which is also the case for a day 30 in a 29-day month.
    pub fn to_gregorian(&self, date: &CalendarDate) -> ConversionResult {
        if date.is_gregorian() {
            return Ok(*date);
        }
        let estimate = TabularIslamic::jdn(
            i64::from(date.year()),
            i64::from(date.month()),
            i64::from(date.day()),
        );

        let offsets = std::iter::once(0).chain((1..=PROBE_RADIUS).flat_map(|r| [-r, r]));
        for offset in offsets {
            let Some(candidate) = gregorian_from_jdn(estimate + offset) else {
                continue;
            };
            if self.to_hijri(&candidate).as_ref() == Ok(date) {
                return Ok(candidate);
            }
        }

        tracing::trace!(%date, "no Gregorian day converts back");
        Err(ConversionError::Unavailable {
            from:   *date,
            target: CalendarSystem::Gregorian,
        })
    }

    /// Name of the Hijri month containing the Gregorian `date`.
    /// Empty when the date cannot be converted.
    pub fn hijri_month_name(&self, date: &CalendarDate) -> String {
        self.to_hijri(date)
            .ok()
            .and_then(|hijri| self.names.hijri_month(hijri.month()))
            .map(ToOwned::to_owned)
            .unwrap_or_default()
    }

    /// Name of Gregorian month `month` (1 = January). Empty if out of range.
    pub fn gregorian_month_name(&self, month: u8) -> String {
        self.names
            .gregorian_month(month)
            .map(ToOwned::to_owned)
            .unwrap_or_default()
    }

    /// Name of the month `date` falls in, in its own calendar.
    pub(crate) fn own_month_name(&self, date: &CalendarDate) -> String {
        match date.system() {
            CalendarSystem::Gregorian => self.gregorian_month_name(date.month()),
            CalendarSystem::Hijri => self
                .names
                .hijri_month(date.month())
                .map(ToOwned::to_owned)
                .unwrap_or_default(),
        }
    }

    /// The current local day in both calendars.
    pub fn today(&self) -> Today {
        let now = Local::now().date_naive();
        let gregorian = CalendarDate::from_naive(now).unwrap_or(CalendarDate::LAST_GREGORIAN);
        self.today_on(gregorian)
    }

    /// [`today`](Self::today) pinned to a given Gregorian day.
    pub fn today_on(&self, gregorian: CalendarDate) -> Today {
        Today::new(gregorian, self.to_hijri(&gregorian).ok())
    }
}

fn gregorian_from_jdn(jdn: i64) -> Option<CalendarDate> {
    let days = i32::try_from(jdn - CE_JDN_OFFSET).ok()?;
    CalendarDate::from_naive(NaiveDate::from_num_days_from_ce_opt(days)?)
}
