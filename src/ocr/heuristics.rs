//! Cheap checks on raw OCR output before it reaches the parser.

/// Returns true if the text contains a `DD:DD` group, the one feature every
/// supported clock format shares.
pub fn detect_clock_structure(text: &str) -> bool {
    text.as_bytes().windows(5).any(|w| {
        w[0].is_ascii_digit()
            && w[1].is_ascii_digit()
            && w[2] == b':'
            && w[3].is_ascii_digit()
            && w[4].is_ascii_digit()
    })
}

/// Trim and collapse whitespace (including line breaks) to single spaces.
///
/// Used for the OCR text kept in history, not for parsing.
pub fn clean_recognized_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
