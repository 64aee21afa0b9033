//! Parsing of the source date/time strings and the calendar fields derived
//! from them.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

/// Date layouts accepted for `occur_date`, tried in order.
///
/// The first is the layout the published dataset uses (`01/05/2020`).
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// The only layout accepted for `occur_time`.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Layout of the derived `yearmonth` key: two-digit year then two-digit month.
pub const YEARMONTH_FORMAT: &str = "%y%m";

/// Parse an `occur_date` string.
///
/// Some exports append a midnight time to the date
/// (`"01/05/2020 12:00:00 AM"`); only the leading date token is considered.
/// Returns `None` when no accepted layout matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parse an `occur_time` string using the strict [`TIME_FORMAT`].
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

/// Calendar year of `date`.
pub fn year_of(date: NaiveDate) -> i32 {
    date.year()
}

/// Hour of day (0–23) of `time`.
pub fn hour_of(time: NaiveTime) -> u32 {
    time.hour()
}

/// The `"YYMM"` key for `date`.
///
/// Lexical order of these keys equals chronological order for dates within
/// the same century.
pub fn yearmonth_of(date: NaiveDate) -> String {
    date.format(YEARMONTH_FORMAT).to_string()
}
