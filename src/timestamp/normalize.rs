//! OCR text cleanup that runs before pattern matching.

/// Lower-case, drop anything outside `[a-z0-9:-/.]` and whitespace,
/// collapse whitespace runs to one space, trim the ends.
///
/// Removed characters are not replaced, so `14,30` becomes `1430`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, ':' | '-' | '/' | '.')) {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}
