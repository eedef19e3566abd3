//! Column and start-row detection for hand-edited scoreboard sheets.
//!
//! These are heuristics over human layouts, not a parser: each sheet is
//! probed inside a fixed top-left window and the first match wins. A sheet
//! with an unusual layout can be misread; that is a known approximation.
//! Columns are probed column by column, top to bottom within each column.

use crate::extract::dates::parse_date_cell;
use crate::extract::emoji::has_status_glyph;
use crate::io::sheet::Sheet;

/// Rows probed when looking for the date and commitment columns.
pub const SNIFF_ROWS: u32 = 10;
/// Columns probed when looking for the date and commitment columns.
pub const SNIFF_COLUMNS: u32 = 10;
/// Rows probed when looking for the first data row.
pub const START_SCAN_ROWS: u32 = 20;
/// Columns probed when looking for the first data row.
pub const START_SCAN_COLUMNS: u32 = 10;
/// Zero-based start row used when no dated row is found (the fifth row).
pub const DEFAULT_START_ROW: u32 = 4;
/// A commitment cell holds more than this many characters.
pub const COMMITMENT_MIN_CHARS: usize = 50;

/// Where the data of one sheet lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub date_column: u32,
    pub commitment_column: Option<u32>,
    pub start_row: u32,
}

/// Locates the date column, the commitment column and the first data row.
/// Returns `None` when no date column exists, which disqualifies the sheet.
pub fn sniff_layout(sheet: &Sheet) -> Option<SheetLayout> {
    let (date_column, commitment_column) = find_columns(sheet);
    Some(SheetLayout {
        date_column: date_column?,
        commitment_column,
        start_row: find_data_start_row(sheet),
    })
}

/// First column holding a date and first column holding a long, glyph-marked
/// text, each within the [`SNIFF_ROWS`] × [`SNIFF_COLUMNS`] window.
pub fn find_columns(sheet: &Sheet) -> (Option<u32>, Option<u32>) {
    let mut date_column = None;
    let mut commitment_column = None;

    for col in 0..SNIFF_COLUMNS.min(sheet.column_count()) {
        for row in 0..SNIFF_ROWS.min(sheet.row_count()) {
            let value = sheet.value(row, col);
            if date_column.is_none() && parse_date_cell(value).is_some() {
                date_column = Some(col);
            }
            if commitment_column.is_none() && value.as_text().is_some_and(looks_like_commitments) {
                commitment_column = Some(col);
            }
        }
        if date_column.is_some() && commitment_column.is_some() {
            break;
        }
    }

    (date_column, commitment_column)
}

/// First row with a date in any of the first [`START_SCAN_COLUMNS`] columns,
/// searching [`START_SCAN_ROWS`] rows, else [`DEFAULT_START_ROW`].
pub fn find_data_start_row(sheet: &Sheet) -> u32 {
    (0..START_SCAN_ROWS.min(sheet.row_count()))
        .find(|&row| {
            (0..START_SCAN_COLUMNS.min(sheet.column_count()))
                .any(|col| parse_date_cell(sheet.value(row, col)).is_some())
        })
        .unwrap_or(DEFAULT_START_ROW)
}

fn looks_like_commitments(text: &str) -> bool {
    text.chars().count() > COMMITMENT_MIN_CHARS && has_status_glyph(text)
}
