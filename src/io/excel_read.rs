use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::extract::dates::{excel_serial_to_date, parse_iso_datetime};
use crate::io::sheet::{CellValue, Sheet};
use crate::io::styles;

/// Reads every worksheet of the workbook at `path`, merging cell values with
/// the fills declared in the workbook styles. Sheets keep workbook order.
pub fn read_sheets(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut fills = styles::read_cell_fills(path)?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_vec() {
        let range = read_sheet_range(&mut workbook, &name)?;
        let mut sheet = Sheet::new(name.clone());

        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                sheet.set_value(
                    row_offset + row_idx as u32,
                    col_offset + col_idx as u32,
                    cell_value(cell),
                );
            }
        }

        for ((row, col), fill) in fills.remove(&name).unwrap_or_default() {
            sheet.set_fill(row, col, fill);
        }

        debug!(
            sheet = %sheet.name,
            rows = sheet.row_count(),
            columns = sheet.column_count(),
            "loaded worksheet"
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

fn read_sheet_range<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => match excel_serial_to_date(*serial) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Number(*serial),
        },
        DataType::Empty => CellValue::Empty,
        other => {
            let text = other.to_string();
            match parse_iso_datetime(&text) {
                Some(date) => CellValue::Date(date),
                None => CellValue::Text(text),
            }
        }
    }
}
