use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

/// Fill metadata of a single cell as declared in the workbook styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFill {
    /// `patternType` of the fill, e.g. `solid`, `gray125` or `none`.
    pub pattern: Option<String>,
    /// Foreground color as written in the workbook, usually 8-digit ARGB.
    pub rgb: Option<String>,
}

impl CellFill {
    pub fn solid(rgb: impl Into<String>) -> Self {
        Self {
            pattern: Some("solid".to_string()),
            rgb: Some(rgb.into()),
        }
    }

    pub fn is_solid(&self) -> bool {
        self.pattern.as_deref() == Some("solid")
    }

    /// True when the fill paints nothing, so there is no point keeping it.
    pub fn is_empty(&self) -> bool {
        matches!(self.pattern.as_deref(), None | Some("none"))
    }
}

/// Cell value as seen by the extractor, independent of the reader backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the workbook itself stores as a date.
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{number}"),
            CellValue::Bool(flag) => write!(f, "{flag}"),
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// One worksheet, addressed by zero-based absolute (row, column).
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    values: HashMap<(u32, u32), CellValue>,
    fills: HashMap<(u32, u32), CellFill>,
    rows: u32,
    columns: u32,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            self.values.remove(&(row, col));
            return;
        }
        self.extend_to(row, col);
        self.values.insert((row, col), value);
    }

    pub fn set_fill(&mut self, row: u32, col: u32, fill: CellFill) {
        if fill.is_empty() {
            self.fills.remove(&(row, col));
            return;
        }
        self.extend_to(row, col);
        self.fills.insert((row, col), fill);
    }

    /// Builder-style variant of [`Sheet::set_value`].
    pub fn with_value(mut self, row: u32, col: u32, value: CellValue) -> Self {
        self.set_value(row, col, value);
        self
    }

    /// Builder-style variant of [`Sheet::set_fill`].
    pub fn with_fill(mut self, row: u32, col: u32, fill: CellFill) -> Self {
        self.set_fill(row, col, fill);
        self
    }

    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.values.get(&(row, col)).unwrap_or(&EMPTY)
    }

    pub fn fill(&self, row: u32, col: u32) -> Option<&CellFill> {
        self.fills.get(&(row, col))
    }

    /// Number of rows up to and including the last row holding a value or fill.
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// Number of columns up to and including the last column holding a value or fill.
    pub fn column_count(&self) -> u32 {
        self.columns
    }

    fn extend_to(&mut self, row: u32, col: u32) {
        self.rows = self.rows.max(row + 1);
        self.columns = self.columns.max(col + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_covers_values_and_fills() {
        let sheet = Sheet::new("Jane Doe")
            .with_value(2, 1, CellValue::Text("x".into()))
            .with_fill(5, 0, CellFill::solid("FF92D050"));
        assert_eq!(sheet.row_count(), 6);
        assert_eq!(sheet.column_count(), 2);
        assert_eq!(sheet.value(0, 0), &CellValue::Empty);
        assert!(sheet.fill(5, 0).is_some_and(CellFill::is_solid));
    }

    #[test]
    fn empty_values_and_fills_are_not_stored() {
        let sheet = Sheet::new("s")
            .with_value(3, 3, CellValue::Text(String::new()))
            .with_fill(4, 4, CellFill::default());
        assert_eq!(sheet.row_count(), 0);
        assert!(sheet.fill(4, 4).is_none());
    }
}
