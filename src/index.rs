//! Day-by-day index of one Hijri year, built by scanning Gregorian days.
//!
//! Umm al-Qura month lengths come from a table, not a formula, so the only
//! exact way to lay out a Hijri month is to ask the conversion source about
//! every Gregorian day that could belong to it.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use serde::Serialize;

use crate::config::CalendarConfig;
use crate::consts::{
    GREGORIAN_YEAR_DAYS, HIJRI_EPOCH_GREGORIAN_YEAR, HIJRI_LONG_MONTH, HIJRI_SHORT_MONTH,
    HIJRI_YEAR_DAYS, MAX_MONTH, MAX_YEAR, MIN_DAY, SCAN_SLACK_YEARS,
};
use crate::convert::{CalendarConverter, HijriSource};
use crate::CalendarDate;

/// Inclusive range of whole Gregorian years scanned for one Hijri year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScanWindow {
    first_year: u16,
    last_year:  u16,
}

impl ScanWindow {
    /// First Gregorian year scanned (from January 1st)
    pub const fn first_year(&self) -> u16 {
        self.first_year
    }

    /// Last Gregorian year scanned (through December 31st)
    pub const fn last_year(&self) -> u16 {
        self.last_year
    }

    /// Checks if a Gregorian date falls inside the window
    pub const fn contains(&self, date: &CalendarDate) -> bool {
        date.is_gregorian() && self.first_year <= date.year() && date.year() <= self.last_year
    }

    /// Every Gregorian day of the window, ascending
    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + use<> {
        let last_year = self.last_year;
        let first = CalendarDate::gregorian(self.first_year, 1, MIN_DAY).ok();
        std::iter::successors(first, CalendarDate::succ).take_while(move |d| d.year() <= last_year)
    }
}

/// Gregorian years that bound `hijri_year` with a year of slack on each side.
///
/// The estimate is `622 + (h - 1) * 354 / 365` rounded down for the start and
/// `622 + (h + 2) * 354 / 365` rounded up for the end, clamped to the
/// representable years.
pub fn scan_window(hijri_year: u16) -> ScanWindow {
    let h = i64::from(hijri_year.max(1));
    let epoch = i64::from(HIJRI_EPOCH_GREGORIAN_YEAR);
    let (lunar, solar) = (i64::from(HIJRI_YEAR_DAYS), i64::from(GREGORIAN_YEAR_DAYS));
    let slack = i64::from(SCAN_SLACK_YEARS);

    let start = epoch + ((h - 1) * lunar).div_euclid(solar) - slack;
    let end = epoch + ((h + 2) * lunar + solar - 1).div_euclid(solar) + slack;

    let clamp = |year: i64| u16::try_from(year.clamp(1, i64::from(MAX_YEAR))).unwrap_or(MAX_YEAR);
    ScanWindow {
        first_year: clamp(start),
        last_year:  clamp(end),
    }
}

/// Every `(month, day)` of one Hijri year mapped to its Gregorian date.
///
/// Built in one piece by [`HijriYearIndexer::build_index`] and never changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HijriYearIndex {
    year:   u16,
    months: BTreeMap<u8, BTreeMap<u8, CalendarDate>>,
}

impl HijriYearIndex {
    const fn empty(year: u16) -> Self {
        Self {
            year,
            months: BTreeMap::new(),
        }
    }

    /// Records a day; the first date seen for a `(month, day)` wins.
    fn insert(&mut self, hijri: &CalendarDate, gregorian: CalendarDate) -> bool {
        let days = self.months.entry(hijri.month()).or_default();
        if days.contains_key(&hijri.day()) {
            return false;
        }
        days.insert(hijri.day(), gregorian);
        true
    }

    /// The Hijri year this index covers
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Gregorian date of Hijri `(month, day)` in this year
    pub fn get(&self, month: u8, day: u8) -> Option<CalendarDate> {
        self.months.get(&month)?.get(&day).copied()
    }

    /// 30 if the month has a day 30, otherwise 29, including for a month
    /// the index knows nothing about.
    pub fn month_length(&self, month: u8) -> u8 {
        if self.get(month, HIJRI_LONG_MONTH).is_some() {
            HIJRI_LONG_MONTH
        } else {
            HIJRI_SHORT_MONTH
        }
    }

    /// A month counts as present once its first day is indexed
    pub fn has_month(&self, month: u8) -> bool {
        self.get(month, MIN_DAY).is_some()
    }

    /// Months with at least one indexed day, ascending
    pub fn months(&self) -> impl Iterator<Item = u8> + '_ {
        self.months.keys().copied()
    }

    /// Indexed days of `month`, ascending
    pub fn days(&self, month: u8) -> impl Iterator<Item = (u8, CalendarDate)> + '_ {
        self.months
            .get(&month)
            .into_iter()
            .flat_map(|days| days.iter().map(|(day, date)| (*day, *date)))
    }

    /// Number of indexed days
    pub fn len(&self) -> usize {
        self.months.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// All twelve months present, each a gap-free run of 29 or 30 days from day 1
    pub fn is_complete(&self) -> bool {
        (1..=MAX_MONTH).all(|month| {
            let Some(days) = self.months.get(&month) else {
                return false;
            };
            let Ok(len) = u8::try_from(days.len()) else {
                return false;
            };
            (HIJRI_SHORT_MONTH..=HIJRI_LONG_MONTH).contains(&len) && days.keys().copied().eq(MIN_DAY..=len)
        })
    }
}

/// Builds [`HijriYearIndex`]es with a borrowed converter.
#[derive(Debug)]
pub struct HijriYearIndexer<'c, S> {
    converter: &'c CalendarConverter<S>,
}

impl<'c, S: HijriSource> HijriYearIndexer<'c, S> {
    pub const fn new(converter: &'c CalendarConverter<S>) -> Self {
        Self { converter }
    }

    pub const fn converter(&self) -> &'c CalendarConverter<S> {
        self.converter
    }

    /// Scans every day of [`scan_window`] and records the ones that fall in
    /// `hijri_year`. Days the converter cannot handle are skipped.
    ///
    /// Runs to completion before returning; no partially built index is
    /// ever observable.
    pub fn build_index(&self, hijri_year: u16) -> HijriYearIndex {
        let window = scan_window(hijri_year);
        tracing::debug!(
            hijri_year,
            first_year = window.first_year(),
            last_year = window.last_year(),
            "building Hijri year index"
        );

        let mut index = HijriYearIndex::empty(hijri_year);
        let mut skipped = 0usize;
        for gregorian in window.days() {
            match self.converter.to_hijri(&gregorian) {
                Ok(hijri) if hijri.year() == hijri_year => {
                    if !index.insert(&hijri, gregorian) {
                        tracing::warn!(
                            %hijri,
                            %gregorian,
                            "conversion source mapped two days to one Hijri date; keeping the first"
                        );
                    }
                }
                Ok(_) => {}
                Err(_) => skipped += 1,
            }
        }

        tracing::debug!(hijri_year, recorded = index.len(), skipped, "Hijri year index built");
        index
    }
}

/// Most-recently-used Hijri year indices, keyed by Hijri year.
///
/// Only fully built indices are inserted. A miss rebuilds the whole year.
#[derive(Debug)]
pub struct IndexCache {
    entries: LruCache<u16, Arc<HijriYearIndex>>,
}

impl IndexCache {
    /// Keeps up to `capacity` years resident; zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    /// Cached index for `hijri_year`, building it on a miss.
    pub fn get_or_build<S: HijriSource>(
        &mut self,
        hijri_year: u16,
        indexer: &HijriYearIndexer<'_, S>,
    ) -> Arc<HijriYearIndex> {
        if let Some(index) = self.entries.get(&hijri_year) {
            tracing::debug!(hijri_year, "index cache hit");
            return Arc::clone(index);
        }

        tracing::debug!(hijri_year, "index cache miss");
        let index = Arc::new(indexer.build_index(hijri_year));
        if let Some((evicted, _)) = self.entries.push(hijri_year, Arc::clone(&index)) {
            tracing::debug!(evicted, "index cache evicted year");
        }
        index
    }

    /// Cached index for `hijri_year` without building
    pub fn get(&mut self, hijri_year: u16) -> Option<Arc<HijriYearIndex>> {
        self.entries.get(&hijri_year).cloned()
    }

    pub fn contains(&self, hijri_year: u16) -> bool {
        self.entries.contains(&hijri_year)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new(1)
    }
}
