use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::ScoreboardDocument;

/// Reads the intermediate document written by [`write_document`].
pub fn read_document(path: &Path) -> Result<ScoreboardDocument> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Writes the intermediate document as pretty-printed UTF-8 JSON. Glyphs and
/// other non-ASCII text are written as-is rather than escaped.
pub fn write_document(path: &Path, document: &ScoreboardDocument) -> Result<()> {
    let json_string = serde_json::to_string_pretty(document)?;
    fs::write(path, json_string)?;
    Ok(())
}
