use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// ISO `YYYY-MM-DD` date used as the key of every day entry.
pub type DateKey = String;

/// One person's full history, keyed by normalized date. Date keys are unique
/// per person; a later row for the same date replaces the earlier one.
pub type SheetRecord = BTreeMap<DateKey, DayEntry>;

/// The intermediate document handed from the extractor to the loader,
/// keyed by person (sheet) name.
pub type ScoreboardDocument = BTreeMap<String, SheetRecord>;

/// Attendance inferred from the fill color of a date cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    /// Green fill.
    Attended,
    /// Red fill.
    NotAttended,
    /// No fill, or a color outside the known shades.
    #[default]
    Unknown,
}

impl Attendance {
    /// Collapses the tri-state into the nullable boolean stored remotely.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Attendance::Attended => Some(true),
            Attendance::NotAttended => Some(false),
            Attendance::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Attendance::Unknown
    }
}

/// Tri-state completion status of a commitment, derived from its leading
/// glyph. Serialized as the strings `"true"`, `"false"` and `"unknown"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fulfillment {
    #[serde(rename = "true")]
    Fulfilled,
    #[serde(rename = "false")]
    Unfulfilled,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

/// A single commitment line with its glyph removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub text: String,
    pub fulfilled: Fulfillment,
}

impl Commitment {
    pub fn new(text: impl Into<String>, fulfilled: Fulfillment) -> Self {
        Self {
            text: text.into(),
            fulfilled,
        }
    }

    /// Blank text, or a lone placeholder dash, carries nothing worth importing.
    pub fn is_blank(&self) -> bool {
        let text = self.text.trim();
        text.is_empty() || text == "-"
    }
}

/// Everything recorded for one person on one date. Commitments keep the
/// order of the lines in the source cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub attendance: Attendance,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
}

/// Totals reported after an extraction or before an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub people: usize,
    pub entries: usize,
    pub commitments: usize,
}

impl DocumentStats {
    pub fn of(document: &ScoreboardDocument) -> Self {
        let entries = document.values().map(BTreeMap::len).sum();
        let commitments = document
            .values()
            .flat_map(BTreeMap::values)
            .map(|entry| entry.commitments.len())
            .sum();
        Self {
            people: document.len(),
            entries,
            commitments,
        }
    }
}

/// Every distinct date across all people, in ascending order.
pub fn distinct_dates(document: &ScoreboardDocument) -> Vec<DateKey> {
    let mut dates: Vec<DateKey> = document
        .values()
        .flat_map(|record| record.keys().cloned())
        .collect();
    dates.sort();
    dates.dedup();
    dates
}
