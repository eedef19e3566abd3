//! Cell fill extraction straight from the xlsx package.
//!
//! The value reader does not expose cell styles, so fills are resolved here
//! from the raw parts: `xl/workbook.xml` and its relationships locate each
//! worksheet part, `xl/styles.xml` maps a cell's `s` index through `cellXfs`
//! to an entry in `fills`, and the worksheet parts supply the `s` index of
//! every styled cell.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Result, ToolError};
use crate::io::sheet::CellFill;

const STYLES_PART: &str = "xl/styles.xml";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// Fills of every visibly filled cell, grouped by sheet name.
pub type WorkbookFills = HashMap<String, HashMap<(u32, u32), CellFill>>;

/// Reads the fills of every filled cell in the workbook at `path`.
pub fn read_cell_fills(path: &Path) -> Result<WorkbookFills> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let Some(styles_xml) = read_part(&mut archive, STYLES_PART)? else {
        debug!("workbook has no styles part; no fills to read");
        return Ok(WorkbookFills::new());
    };
    let xf_fills = parse_styles(&styles_xml)?;

    let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing part '{WORKBOOK_PART}'")))?;
    let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PART)?.ok_or_else(|| {
        ToolError::InvalidWorkbook(format!("missing part '{WORKBOOK_RELS_PART}'"))
    })?;

    let mut fills = WorkbookFills::new();
    for (sheet_name, part) in parse_sheet_targets(&workbook_xml, &rels_xml)? {
        let Some(sheet_xml) = read_part(&mut archive, &part)? else {
            debug!(sheet = %sheet_name, %part, "worksheet part missing from package");
            continue;
        };

        let mut sheet_fills = HashMap::new();
        for (position, style) in parse_cell_styles(&sheet_xml)? {
            if let Some(fill) = xf_fills.get(style).filter(|fill| !fill.is_empty()) {
                sheet_fills.insert(position, fill.clone());
            }
        }
        debug!(sheet = %sheet_name, filled_cells = sheet_fills.len(), "resolved cell fills");
        fills.insert(sheet_name, sheet_fills);
    }

    Ok(fills)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Resolves the fill of every `cellXfs` entry, indexed like the `s`
/// attribute of worksheet cells.
pub(crate) fn parse_styles(xml: &str) -> Result<Vec<CellFill>> {
    let mut reader = Reader::from_str(xml);
    let mut fills: Vec<CellFill> = Vec::new();
    let mut xf_fill_ids: Vec<usize> = Vec::new();
    // `fill` also occurs inside `dxfs`, and `xf` inside `cellStyleXfs`;
    // only the `fills` and `cellXfs` lists matter here.
    let mut in_fills = false;
    let mut in_cell_xfs = false;
    let mut in_pattern = false;

    loop {
        let (element, is_empty) = match reader.read_event()? {
            Event::Start(element) => (element, false),
            Event::Empty(element) => (element, true),
            Event::End(element) => {
                match element.local_name().as_ref() {
                    b"fills" => in_fills = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"patternFill" => in_pattern = false,
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        match element.local_name().as_ref() {
            b"fills" => in_fills = !is_empty,
            b"cellXfs" => in_cell_xfs = !is_empty,
            b"fill" if in_fills => fills.push(CellFill::default()),
            b"patternFill" if in_fills => {
                if let Some(fill) = fills.last_mut() {
                    fill.pattern = attribute(&element, b"patternType")?;
                }
                in_pattern = !is_empty;
            }
            b"fgColor" if in_pattern => {
                if let Some(fill) = fills.last_mut() {
                    fill.rgb = attribute(&element, b"rgb")?;
                }
            }
            b"xf" if in_cell_xfs => {
                let fill_id = attribute(&element, b"fillId")?
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(0);
                xf_fill_ids.push(fill_id);
            }
            _ => {}
        }
    }

    Ok(xf_fill_ids
        .into_iter()
        .map(|fill_id| fills.get(fill_id).cloned().unwrap_or_default())
        .collect())
}

/// Maps sheet names to the package path of their worksheet part, in
/// workbook order.
pub(crate) fn parse_sheet_targets(workbook_xml: &str, rels_xml: &str) -> Result<Vec<(String, String)>> {
    let mut targets: HashMap<String, String> = HashMap::new();
    let mut reader = Reader::from_str(rels_xml);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) =
                    (attribute(&element, b"Id")?, attribute(&element, b"Target")?)
                {
                    targets.insert(id, resolve_target(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut sheets = Vec::new();
    let mut reader = Reader::from_str(workbook_xml);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == b"sheet" =>
            {
                let name = attribute(&element, b"name")?;
                // `r:id`; the relationship namespace prefix is not fixed.
                let rel_id = attribute(&element, b"id")?;
                match (name, rel_id.and_then(|id| targets.get(&id).cloned())) {
                    (Some(name), Some(part)) => sheets.push((name, part)),
                    (name, _) => debug!(?name, "sheet without a resolvable worksheet part"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheets)
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

/// Collects the `(row, column)` and style index of every cell carrying an
/// `s` attribute. Cells without an `r` reference continue from the previous
/// cell, as the format allows.
pub(crate) fn parse_cell_styles(xml: &str) -> Result<Vec<((u32, u32), usize)>> {
    let mut reader = Reader::from_str(xml);
    let mut styled = Vec::new();
    let mut current_row: Option<u32> = None;
    let mut next_col = 0u32;

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => match element.local_name().as_ref() {
                b"row" => {
                    let explicit = attribute(&element, b"r")?
                        .and_then(|value| value.parse::<u32>().ok())
                        .map(|row| row.saturating_sub(1));
                    current_row = Some(explicit.unwrap_or_else(|| current_row.map_or(0, |row| row + 1)));
                    next_col = 0;
                }
                b"c" => {
                    let position = attribute(&element, b"r")?
                        .as_deref()
                        .and_then(parse_cell_reference)
                        .unwrap_or((current_row.unwrap_or(0), next_col));
                    next_col = position.1 + 1;
                    if let Some(style) = attribute(&element, b"s")?.and_then(|value| value.parse().ok()) {
                        styled.push((position, style));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(styled)
}

/// Parses an A1-style reference such as `AB12` into zero-based `(row, column)`.
pub fn parse_cell_reference(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let column = letters.chars().try_fold(0u32, |acc, c| {
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, column - 1))
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|error| ToolError::InvalidWorkbook(format!("malformed XML attribute: {error}")))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|error| ToolError::InvalidWorkbook(format!("malformed XML attribute: {error}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
