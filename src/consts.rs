/// Maximum valid year (inclusive), shared by both calendars
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December / Dhu al-Hijjah)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// A Hijri month never runs longer than this
pub const HIJRI_LONG_MONTH: u8 = 30;
/// ...nor shorter than this
pub const HIJRI_SHORT_MONTH: u8 = 29;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Suffix marking a Hijri date in its text form ("anno Hegirae")
pub const HIJRI_SUFFIX: &str = "AH";

/// Number of columns in a month grid
pub const DAYS_PER_WEEK: usize = 7;

/// Accepted Gregorian years for a year view
pub const GREGORIAN_YEAR_RANGE: (u16, u16) = (1900, 2100);
/// Accepted Hijri years for a year view
pub const HIJRI_YEAR_RANGE: (u16, u16) = (1350, 1500);

/// Gregorian year in which the Hijri era begins
pub(crate) const HIJRI_EPOCH_GREGORIAN_YEAR: i32 = 622;
/// Days in a common Hijri year, used to estimate scan windows
pub(crate) const HIJRI_YEAR_DAYS: i32 = 354;
/// Days in a common Gregorian year, used to estimate scan windows
pub(crate) const GREGORIAN_YEAR_DAYS: i32 = 365;
/// Whole Gregorian years of slack added on each side of a scan window
pub(crate) const SCAN_SLACK_YEARS: i32 = 1;

/// Julian day number of 1 Muharram 1 AH in the arithmetic (civil) reckoning
pub(crate) const HIJRI_EPOCH_JDN: i64 = 1_948_440;
/// Offset between a Julian day number and chrono's days-from-CE count
pub(crate) const CE_JDN_OFFSET: i64 = 1_721_425;
/// How far (in days) the Hijri to Gregorian search looks around its estimate
pub(crate) const PROBE_RADIUS: i64 = 5;

/// Hijri month names in Arabic, Muharram first
pub const HIJRI_MONTHS_AR: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

/// Hijri month names in English transliteration, Muharram first
pub const HIJRI_MONTHS_EN: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// Gregorian month names in Arabic, January first
pub const GREGORIAN_MONTHS_AR: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

/// Gregorian month names in English, January first
pub const GREGORIAN_MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
