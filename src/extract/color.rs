//! Attendance from the fill color of a date cell.

use crate::io::sheet::CellFill;
use crate::model::Attendance;

/// Green shades used on the scoreboards to mark attendance.
pub const ATTENDED_COLORS: &[&str] = &["92D050", "00FF00", "C6EFCE", "90EE90"];

/// Red shades used on the scoreboards to mark a missed meeting.
pub const MISSED_COLORS: &[&str] = &["FF0000", "FFC7CE", "FFB3BA"];

/// Classifies a solid fill by exact RGB match against the known shades.
/// Non-solid fills, theme or indexed colors and unknown shades are
/// [`Attendance::Unknown`].
pub fn classify_fill(fill: Option<&CellFill>) -> Attendance {
    let Some(rgb) = fill
        .filter(|fill| fill.is_solid())
        .and_then(|fill| fill.rgb.as_deref())
        .and_then(normalize_rgb)
    else {
        return Attendance::Unknown;
    };

    if ATTENDED_COLORS.contains(&rgb.as_str()) {
        Attendance::Attended
    } else if MISSED_COLORS.contains(&rgb.as_str()) {
        Attendance::NotAttended
    } else {
        Attendance::Unknown
    }
}

/// Upper-cases a color code and drops the alpha byte of 8-digit ARGB codes.
fn normalize_rgb(code: &str) -> Option<String> {
    let code = code.trim().trim_start_matches('#');
    if !code.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match code.len() {
        6 => Some(code.to_ascii_uppercase()),
        8 => Some(code[2..].to_ascii_uppercase()),
        _ => None,
    }
}
