//! Turns scoreboard sheets into the intermediate document.
//!
//! Each sheet is one person. The date column and commitment column are
//! located by [`sniff`], every dated row becomes a [`DayEntry`] whose
//! attendance comes from the date cell's fill ([`color`]) and whose
//! commitments come from the glyph-marked lines of the commitment cell
//! ([`emoji`]).

pub mod color;
pub mod dates;
pub mod emoji;
pub mod sniff;

use std::fmt;

use tracing::{debug, info, warn};

use crate::io::sheet::Sheet;
use crate::model::{DayEntry, ScoreboardDocument, SheetRecord};

use self::color::classify_fill;
use self::dates::parse_date_cell;
use self::emoji::parse_commitments;
use self::sniff::sniff_layout;

/// Why a sheet contributed nothing to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No date found in the probed window.
    NoDateColumn,
    /// A date column exists but no row below the start row held a date.
    NoEntries,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoDateColumn => write!(f, "no date column found"),
            SkipReason::NoEntries => write!(f, "no dated rows found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSheet {
    pub sheet: String,
    pub reason: SkipReason,
}

/// Outcome of an extraction: the document plus the sheets left out of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractReport {
    pub document: ScoreboardDocument,
    pub skipped: Vec<SkippedSheet>,
}

/// Extracts every sheet, reporting the ones that yield no entries.
pub fn extract_sheets(sheets: &[Sheet]) -> ExtractReport {
    let mut report = ExtractReport::default();

    for sheet in sheets {
        match walk_sheet(sheet) {
            Ok(record) => {
                info!(sheet = %sheet.name, entries = record.len(), "processed sheet");
                report.document.insert(sheet.name.clone(), record);
            }
            Err(reason) => {
                warn!(sheet = %sheet.name, %reason, "skipping sheet");
                report.skipped.push(SkippedSheet {
                    sheet: sheet.name.clone(),
                    reason,
                });
            }
        }
    }

    report
}

/// Walks one sheet from its data start row to its last row.
pub fn walk_sheet(sheet: &Sheet) -> Result<SheetRecord, SkipReason> {
    let layout = sniff_layout(sheet).ok_or(SkipReason::NoDateColumn)?;
    debug!(sheet = %sheet.name, ?layout, "sniffed sheet layout");

    let mut record = SheetRecord::new();
    for row in layout.start_row..sheet.row_count() {
        let Some(date) = parse_date_cell(sheet.value(row, layout.date_column)) else {
            continue;
        };

        let attendance = classify_fill(sheet.fill(row, layout.date_column));
        let commitments = layout
            .commitment_column
            .map(|col| sheet.value(row, col))
            .filter(|value| !value.is_empty())
            .map(|value| parse_commitments(&value.to_string()))
            .unwrap_or_default();

        if record
            .insert(date.clone(), DayEntry { attendance, commitments })
            .is_some()
        {
            debug!(sheet = %sheet.name, %date, row, "date repeated; keeping the later row");
        }
    }

    if record.is_empty() {
        return Err(SkipReason::NoEntries);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sheet::{CellFill, CellValue};
    use crate::model::{Attendance, Commitment, Fulfillment};

    const LEGEND: &str = "Legend: ✅ marks a kept commitment and ❌ marks a missed one this week";

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn jane() -> Sheet {
        Sheet::new("Jane Doe")
            .with_value(0, 0, text("Date"))
            .with_value(0, 1, text(LEGEND))
            .with_value(1, 0, text("2024-01-10"))
            .with_fill(1, 0, CellFill::solid("FF92D050"))
            .with_value(1, 1, text("✅ Ship feature\n❌ Write tests"))
            .with_value(2, 0, text("01/17/2024"))
            .with_fill(2, 0, CellFill::solid("FFFF0000"))
            .with_value(3, 0, text("not a date"))
            .with_value(4, 0, text("2024-01-24"))
            .with_value(4, 1, text("No glyph here"))
    }

    #[test]
    fn walks_dated_rows_into_entries() {
        let record = walk_sheet(&jane()).unwrap();
        assert_eq!(record.len(), 3);

        assert_eq!(
            record["2024-01-10"],
            DayEntry {
                attendance: Attendance::Attended,
                commitments: vec![
                    Commitment::new("Ship feature", Fulfillment::Fulfilled),
                    Commitment::new("Write tests", Fulfillment::Unfulfilled),
                ],
            }
        );
        assert_eq!(record["2024-01-17"].attendance, Attendance::NotAttended);
        assert!(record["2024-01-17"].commitments.is_empty());
        assert_eq!(
            record["2024-01-24"],
            DayEntry {
                attendance: Attendance::Unknown,
                commitments: vec![Commitment::new("No glyph here", Fulfillment::Unknown)],
            }
        );
    }

    #[test]
    fn repeated_dates_keep_the_later_row() {
        let sheet = Sheet::new("s")
            .with_value(0, 0, text("2024-01-10"))
            .with_value(1, 0, text("2024-01-10"))
            .with_fill(1, 0, CellFill::solid("FFC6EFCE"));
        let record = walk_sheet(&sheet).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["2024-01-10"].attendance, Attendance::Attended);
    }

    #[test]
    fn sheets_without_dates_are_reported_not_fatal() {
        let notes = Sheet::new("Notes").with_value(0, 0, text("Just some notes"));
        let report = extract_sheets(&[jane(), notes]);

        assert_eq!(report.document.len(), 1);
        assert!(report.document.contains_key("Jane Doe"));
        assert_eq!(
            report.skipped,
            vec![SkippedSheet {
                sheet: "Notes".into(),
                reason: SkipReason::NoDateColumn,
            }]
        );
    }
}
