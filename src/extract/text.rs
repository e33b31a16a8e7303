/// Collapses all whitespace runs (including newlines) into single spaces and
/// trims the ends. Review text and field values are stored in this form so
/// they survive the trip through a one-line CSV cell.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized identity for free-text records: cleaned and case-folded, so
/// re-extractions of the same review collapse to one key.
pub fn normalize_key(text: &str) -> String {
    clean_text(text).to_lowercase()
}
