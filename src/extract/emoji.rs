//! Commitment lines and their leading status glyph.

use crate::model::{Commitment, Fulfillment};

/// Marks a kept commitment.
pub const CHECK_GLYPH: char = '\u{2705}';
/// Marks a missed commitment.
pub const CROSS_GLYPH: char = '\u{274C}';

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Reads the fulfillment flag from the first character of a trimmed line.
pub fn detect_fulfillment(line: &str) -> Fulfillment {
    match line.trim().chars().next() {
        Some(CHECK_GLYPH) => Fulfillment::Fulfilled,
        Some(CROSS_GLYPH) => Fulfillment::Unfulfilled,
        _ => Fulfillment::Unknown,
    }
}

/// Strips one leading status glyph and the whitespace after it.
pub fn clean_commitment_text(line: &str) -> String {
    let line = line.trim();
    let rest = line
        .strip_prefix(CHECK_GLYPH)
        .or_else(|| line.strip_prefix(CROSS_GLYPH))
        .map(|rest| rest.strip_prefix(VARIATION_SELECTOR).unwrap_or(rest));
    rest.unwrap_or(line).trim().to_string()
}

/// True when the text carries either status glyph anywhere.
pub fn has_status_glyph(text: &str) -> bool {
    text.contains(CHECK_GLYPH) || text.contains(CROSS_GLYPH)
}

/// Splits a commitment cell into lines, keeping source order. Lines that are
/// empty once cleaned are dropped.
pub fn parse_commitments(cell_text: &str) -> Vec<Commitment> {
    cell_text
        .split('\n')
        .filter_map(|line| {
            let text = clean_commitment_text(line);
            (!text.is_empty()).then(|| Commitment::new(text, detect_fulfillment(line)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_glyph_is_fulfilled() {
        assert_eq!(detect_fulfillment("✅ Finish report"), Fulfillment::Fulfilled);
        assert_eq!(clean_commitment_text("✅ Finish report"), "Finish report");
    }

    #[test]
    fn cross_glyph_is_unfulfilled() {
        assert_eq!(detect_fulfillment("  ❌   Call the bank "), Fulfillment::Unfulfilled);
        assert_eq!(clean_commitment_text("  ❌   Call the bank "), "Call the bank");
    }

    #[test]
    fn lines_without_leading_glyph_are_unknown() {
        assert_eq!(detect_fulfillment("Go for a run ✅"), Fulfillment::Unknown);
        assert_eq!(clean_commitment_text("Go for a run ✅"), "Go for a run ✅");
        assert_eq!(detect_fulfillment(""), Fulfillment::Unknown);
    }

    #[test]
    fn only_one_glyph_is_stripped() {
        assert_eq!(clean_commitment_text("✅✅ twice"), "✅ twice");
        assert_eq!(clean_commitment_text("✅\u{FE0F} styled"), "styled");
    }

    #[test]
    fn cells_split_into_ordered_commitments() {
        let commitments = parse_commitments("✅ Ship feature\r\n\n❌ Write tests\n✅ \nRead a book");
        assert_eq!(
            commitments,
            vec![
                Commitment::new("Ship feature", Fulfillment::Fulfilled),
                Commitment::new("Write tests", Fulfillment::Unfulfilled),
                Commitment::new("Read a book", Fulfillment::Unknown),
            ]
        );
    }
}
