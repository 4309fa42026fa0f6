//! Month grids for a dual-calendar year view.
//!
//! A grid is a flat run of cells, seven per week with Saturday in column 0.
//! Leading and trailing [`DayCell::Empty`] cells pad the month out to whole
//! weeks. Each filled cell carries its date in the grid's own calendar, the
//! equivalent in the other calendar, and a segment number that changes
//! wherever the other calendar's month does.

use serde::{Deserialize, Serialize};

use crate::bounds::resolve_year_input;
use crate::config::CalendarConfig;
use crate::consts::{DAYS_PER_WEEK, MAX_MONTH, MIN_DAY};
use crate::convert::{CalendarConverter, HijriSource, Today};
use crate::index::{HijriYearIndex, HijriYearIndexer, IndexCache};
use crate::types::{CalendarSystem, days_in_month};
use crate::CalendarDate;

/// Which calendar and year a year view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRequest {
    pub system: CalendarSystem,
    pub year:   u16,
}

impl GridRequest {
    pub const fn new(system: CalendarSystem, year: u16) -> Self {
        Self { system, year }
    }

    /// Request for the year typed by a user, resolved and clamped against
    /// the configured bounds for `system`.
    pub fn from_input(system: CalendarSystem, input: &str, config: &CalendarConfig, today: &Today) -> Self {
        Self::new(system, resolve_year_input(input, system, config.bounds(system), today))
    }
}

/// One cell of a [`MonthGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayCell {
    /// Padding before the first or after the last day of the month
    Empty,
    Filled {
        /// The day in the grid's own calendar
        primary:   CalendarDate,
        /// The same day in the other calendar, absent if conversion failed
        secondary: Option<CalendarDate>,
        is_today:  bool,
        /// Order in which this cell's secondary month first appears in the grid
        segment:   usize,
    },
}

impl DayCell {
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn primary(&self) -> Option<CalendarDate> {
        match self {
            Self::Filled { primary, .. } => Some(*primary),
            Self::Empty => None,
        }
    }

    pub const fn secondary(&self) -> Option<CalendarDate> {
        match self {
            Self::Filled { secondary, .. } => *secondary,
            Self::Empty => None,
        }
    }

    pub const fn is_today(&self) -> bool {
        matches!(self, Self::Filled { is_today: true, .. })
    }

    pub const fn segment(&self) -> Option<usize> {
        match self {
            Self::Filled { segment, .. } => Some(*segment),
            Self::Empty => None,
        }
    }
}

/// Secondary-calendar dates (and month names) of a grid's first and last day.
///
/// A month's two ends often fall in different secondary months or even
/// years, so a header needs both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SecondarySpan {
    pub first:      Option<CalendarDate>,
    pub first_name: String,
    pub last:       Option<CalendarDate>,
    pub last_name:  String,
}

impl SecondarySpan {
    /// Both ends in the same secondary month of the same year
    pub fn is_single_month(&self) -> bool {
        self.first.map(|d| d.year_month()) == self.last.map(|d| d.year_month())
    }
}

/// The cells of one month, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    system: CalendarSystem,
    year:   u16,
    month:  u8,
    cells:  Vec<DayCell>,
    span:   SecondarySpan,
}

impl MonthGrid {
    fn empty(system: CalendarSystem, year: u16, month: u8) -> Self {
        Self {
            system,
            year,
            month,
            cells: Vec::new(),
            span: SecondarySpan::default(),
        }
    }

    /// Calendar the grid is laid out in
    pub const fn system(&self) -> CalendarSystem {
        self.system
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Always a multiple of seven
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// An empty grid stands for a month missing from its Hijri index
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Week rows, Saturday first
    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Padding cells before day 1
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_empty()).count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Number of distinct secondary months the grid touches
    pub fn segment_count(&self) -> usize {
        self.cells
            .iter()
            .filter_map(DayCell::segment)
            .max()
            .map_or(0, |last| last + 1)
    }

    /// The cell marked as today, if the month holds today
    pub fn today(&self) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.is_today())
    }

    pub fn secondary_span(&self) -> &SecondarySpan {
        &self.span
    }
}

/// A full year of month grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearLayout {
    pub request: GridRequest,
    pub months:  Vec<MonthGrid>,
}

impl YearLayout {
    /// Grids worth drawing: every Gregorian month, and the Hijri months
    /// present in the index
    pub fn renderable(&self) -> impl Iterator<Item = &MonthGrid> {
        self.months.iter().filter(|grid| !grid.is_empty())
    }

    /// Grid of `month` (1-based)
    pub fn month(&self, month: u8) -> Option<&MonthGrid> {
        self.months.iter().find(|grid| grid.month() == month)
    }

    /// Month containing today, if the year holds it
    pub fn current_month(&self) -> Option<&MonthGrid> {
        self.months.iter().find(|grid| grid.today().is_some())
    }
}

/// One day of a month before layout
struct DayEntry {
    primary:   CalendarDate,
    secondary: Option<CalendarDate>,
    gregorian: CalendarDate,
}

/// Lays out month grids with a borrowed converter.
#[derive(Debug)]
pub struct MonthGridBuilder<'c, S> {
    converter: &'c CalendarConverter<S>,
}

impl<'c, S: HijriSource> MonthGridBuilder<'c, S> {
    pub const fn new(converter: &'c CalendarConverter<S>) -> Self {
        Self { converter }
    }

    /// Grid for a Gregorian month, with Hijri dates as the secondary calendar.
    ///
    /// A month that does not exist (month 0 or 13, year 0) yields an empty grid.
    pub fn build_gregorian_month(&self, year: u16, month: u8, today: &CalendarDate) -> MonthGrid {
        if CalendarDate::gregorian(year, month, MIN_DAY).is_err() {
            tracing::debug!(year, month, "no such Gregorian month");
            return MonthGrid::empty(CalendarSystem::Gregorian, year, month);
        }

        let days = (MIN_DAY..=days_in_month(year, month))
            .filter_map(|day| CalendarDate::gregorian(year, month, day).ok())
            .map(|primary| DayEntry {
                primary,
                secondary: self.converter.to_hijri(&primary).ok(),
                gregorian: primary,
            })
            .collect();
        self.assemble(CalendarSystem::Gregorian, year, month, days, today)
    }

    /// Grid for a Hijri month read from `index`, with Gregorian dates as the
    /// secondary calendar.
    ///
    /// If the index has no day 1 for the month, or was built for another
    /// year, the month is absent and the grid is empty.
    pub fn build_hijri_month(
        &self,
        index: &HijriYearIndex,
        hijri_month: u8,
        hijri_year: u16,
        today: &CalendarDate,
    ) -> MonthGrid {
        if index.year() != hijri_year || !index.has_month(hijri_month) {
            tracing::debug!(hijri_year, hijri_month, index_year = index.year(), "Hijri month absent from index");
            return MonthGrid::empty(CalendarSystem::Hijri, hijri_year, hijri_month);
        }

        let days = (MIN_DAY..=index.month_length(hijri_month))
            .filter_map(|day| {
                let gregorian = index.get(hijri_month, day)?;
                let primary = CalendarDate::hijri(hijri_year, hijri_month, day).ok()?;
                Some(DayEntry {
                    primary,
                    secondary: Some(gregorian),
                    gregorian,
                })
            })
            .collect();
        self.assemble(CalendarSystem::Hijri, hijri_year, hijri_month, days, today)
    }

    /// All twelve months of the requested year. Hijri years go through
    /// `cache`, which builds the year's index on a miss.
    pub fn build_year(&self, request: GridRequest, cache: &mut IndexCache, today: &Today) -> YearLayout {
        tracing::debug!(system = %request.system, year = request.year, "building year layout");
        let months = match request.system {
            CalendarSystem::Gregorian => (1..=MAX_MONTH)
                .map(|month| self.build_gregorian_month(request.year, month, &today.gregorian))
                .collect(),
            CalendarSystem::Hijri => {
                let index = cache.get_or_build(request.year, &HijriYearIndexer::new(self.converter));
                (1..=MAX_MONTH)
                    .map(|month| self.build_hijri_month(&index, month, request.year, &today.gregorian))
                    .collect()
            }
        };
        YearLayout { request, months }
    }

    fn assemble(
        &self,
        system: CalendarSystem,
        year: u16,
        month: u8,
        days: Vec<DayEntry>,
        today: &CalendarDate,
    ) -> MonthGrid {
        let Some(first) = days.first() else {
            return MonthGrid::empty(system, year, month);
        };
        let leading = first.gregorian.weekday_from_saturday().unwrap_or(0);

        let mut segments: Vec<Option<(u16, u8)>> = Vec::new();
        let mut cells = vec![DayCell::Empty; leading];
        cells.reserve(days.len() + DAYS_PER_WEEK);
        for entry in &days {
            let key = entry.secondary.map(|d| d.year_month());
            let segment = match segments.iter().position(|seen| *seen == key) {
                Some(segment) => segment,
                None => {
                    segments.push(key);
                    segments.len() - 1
                }
            };
            cells.push(DayCell::Filled {
                primary: entry.primary,
                secondary: entry.secondary,
                is_today: entry.gregorian == *today,
                segment,
            });
        }

        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat_n(DayCell::Empty, trailing));

        let first_secondary = first.secondary;
        let last_secondary = days.last().and_then(|entry| entry.secondary);
        let span = SecondarySpan {
            first:      first_secondary,
            first_name: self.secondary_name(first_secondary),
            last:       last_secondary,
            last_name:  self.secondary_name(last_secondary),
        };

        MonthGrid {
            system,
            year,
            month,
            cells,
            span,
        }
    }

    fn secondary_name(&self, date: Option<CalendarDate>) -> String {
        date.map(|d| self.converter.own_month_name(&d)).unwrap_or_default()
    }
}
