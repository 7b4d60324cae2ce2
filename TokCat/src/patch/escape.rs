//! Escaping for inserted catalog text
//!
//! Only the characters XML requires are escaped. Trailing spaces are written
//! as `&#032;` references so that they survive tools which trim attribute
//! values and text nodes.

/// Numeric reference written for each trailing space
pub const SPACE_REFERENCE: &str = "&#032;";

/// Escape a value for a double-quoted attribute
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let escaped = escape_markup(value).replace('"', "&quot;");
    encode_trailing_spaces(&escaped)
}

/// Escape a value for a single-quoted attribute
#[must_use]
pub fn escape_attribute_single_quoted(value: &str) -> String {
    let escaped = escape_markup(value).replace('\'', "&apos;");
    encode_trailing_spaces(&escaped)
}

/// Escape a value for element text content
#[must_use]
pub fn escape_text(value: &str) -> String {
    encode_trailing_spaces(&escape_markup(value))
}

fn escape_markup(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Replace the run of trailing spaces with the same number of references.
///
/// Tabs and interior spaces are left alone.
#[must_use]
pub fn encode_trailing_spaces(value: &str) -> String {
    let kept = value.trim_end_matches(' ');
    let trailing = value.len() - kept.len();
    if trailing == 0 {
        return value.to_string();
    }
    let mut out = String::with_capacity(kept.len() + trailing * SPACE_REFERENCE.len());
    out.push_str(kept);
    for _ in 0..trailing {
        out.push_str(SPACE_REFERENCE);
    }
    out
}
