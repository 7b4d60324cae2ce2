//! CSV record splitting
//!
//! Follows the usual spreadsheet export dialect: comma separated, fields
//! optionally wrapped in double quotes, `""` inside a quoted field standing
//! for one quote. Quoted fields may contain commas and line breaks. Field
//! content is never trimmed.

/// Split CSV text into records of fields.
///
/// A leading UTF-8 BOM is dropped and blank lines produce no record.
#[must_use]
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line_has_content = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                line_has_content = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
                line_has_content = true;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if line_has_content {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                at_field_start = true;
                line_has_content = false;
            }
            _ => {
                field.push(c);
                at_field_start = false;
                line_has_content = true;
            }
        }
    }

    if line_has_content {
        record.push(field);
        records.push(record);
    }

    records
}
