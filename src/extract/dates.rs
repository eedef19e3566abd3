//! Date recognition for scoreboard cells.
//!
//! Text is tried against [`DATE_PATTERNS`] in order and the first pattern
//! that consumes the whole string wins. `MM/DD/YYYY` is listed before
//! `DD/MM/YYYY`, so a string such as `03/05/2024` always reads as March 5th;
//! the day-first pattern only applies when the month-first reading is
//! impossible (e.g. `25/12/2024`).

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::io::sheet::CellValue;

/// Output format of every date key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Accepted text patterns, most specific first.
pub const DATE_PATTERNS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

const NULL_MARKERS: &[&str] = &["nan", "none"];

/// Renders a cell as a `YYYY-MM-DD` key, or `None` when the cell does not
/// hold a date. Absence is not an error: callers skip the cell.
pub fn parse_date_cell(value: &CellValue) -> Option<String> {
    let date = match value {
        CellValue::Date(date) => *date,
        CellValue::Text(text) => parse_date_text(text)?,
        CellValue::Empty | CellValue::Number(_) | CellValue::Bool(_) => return None,
    };
    Some(date.format(DATE_KEY_FORMAT).to_string())
}

/// Parses free text against [`DATE_PATTERNS`].
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() || NULL_MARKERS.iter().any(|marker| text.eq_ignore_ascii_case(marker)) {
        return None;
    }

    DATE_PATTERNS.iter().find_map(|pattern| {
        if pattern.contains("%H") {
            NaiveDateTime::parse_from_str(text, pattern)
                .ok()
                .map(|datetime| datetime.date())
        } else {
            NaiveDate::parse_from_str(text, pattern).ok()
        }
    })
}

/// Converts an Excel serial day number (1900 date system) into a date. The
/// fractional part holds the time of day and is dropped.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once Excel's phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.trunc() as u64))
}

/// Reads the date part of an ISO 8601 datetime such as `2024-01-10T00:00:00`.
pub fn parse_iso_datetime(text: &str) -> Option<NaiveDate> {
    let (date, time) = text.split_once('T')?;
    if time.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_KEY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn iso_dates_pass_through() {
        assert_eq!(parse_date_cell(&text("2024-03-05")).as_deref(), Some("2024-03-05"));
        assert_eq!(
            parse_date_cell(&text(" 2024-03-05 14:30:00 ")).as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn null_markers_and_blanks_are_absent() {
        for raw in ["nan", "NaN", "None", "none", "", "   "] {
            assert_eq!(parse_date_cell(&text(raw)), None, "{raw:?}");
        }
        assert_eq!(parse_date_cell(&CellValue::Empty), None);
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        assert_eq!(parse_date_cell(&text("03/05/2024")).as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date_cell(&text("3/5/2024")).as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn day_first_applies_only_when_month_first_fails() {
        assert_eq!(parse_date_cell(&text("25/12/2024")).as_deref(), Some("2024-12-25"));
    }

    #[test]
    fn unmatched_text_and_plain_numbers_are_absent() {
        assert_eq!(parse_date_cell(&text("Week 3")), None);
        assert_eq!(parse_date_cell(&text("2024-03-05 extra")), None);
        assert_eq!(parse_date_cell(&text("13/13/2024")), None);
        assert_eq!(parse_date_cell(&CellValue::Number(45301.0)), None);
    }

    #[test]
    fn native_dates_render_directly() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_date_cell(&CellValue::Date(date)).as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn excel_serials_convert_to_dates() {
        assert_eq!(excel_serial_to_date(45301.0), NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(excel_serial_to_date(45301.75), NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(excel_serial_to_date(0.5), None);
    }

    #[test]
    fn iso_datetimes_keep_their_date() {
        assert_eq!(
            parse_iso_datetime("2024-01-10T08:00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert_eq!(parse_iso_datetime("2024-01-10"), None);
    }
}
