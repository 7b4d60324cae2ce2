//! Token sheet (CSV) loading
//!
//! The sheet lists every token by its bytes together with readable names in
//! several languages. Only the bytes and the target-language column are used.
//!
//! # Columns
//!
//! ```csv
//! # of bytes,Byte 1,Byte 2,Readable Name (EN),Readable Name (FR)
//! 1,2A,,Voir,Voir
//! 2,BB,05,Store,Stocker
//! ```

mod records;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::settings::CatalogSettings;
use crate::types::TokenKey;

pub use records::parse_records;

/// Target-language strings keyed by token, in first-seen sheet order
pub type TargetStrings = IndexMap<TokenKey, String>;

/// Load the target-language column of a token sheet
pub fn load_target_strings<P: AsRef<Path>>(
    path: P,
    settings: &CatalogSettings,
) -> Result<TargetStrings> {
    let content = fs::read_to_string(path)?;
    parse_target_strings(&content, settings)
}

/// Parse the target-language column from CSV text.
///
/// Rows with an empty target string or an unparsable primary byte are
/// skipped. A later row for the same key replaces the earlier string.
pub fn parse_target_strings(content: &str, settings: &CatalogSettings) -> Result<TargetStrings> {
    let mut records = parse_records(content).into_iter();
    let mut strings = TargetStrings::new();

    let Some(header) = records.next() else {
        return Ok(strings);
    };

    let column = |name: &str| header.iter().position(|h| h == name);
    let byte1_col = column(&settings.byte1_column).ok_or_else(|| Error::MissingColumn {
        column: settings.byte1_column.clone(),
    })?;
    let target_col = column(&settings.target_column).ok_or_else(|| Error::MissingColumn {
        column: settings.target_column.clone(),
    })?;
    let byte2_col = column(&settings.byte2_column);
    let count_col = column(&settings.byte_count_column);

    for record in records {
        let cell = |idx: usize| record.get(idx).map_or("", String::as_str);

        // Leading/trailing spaces are part of the name
        let target = cell(target_col);
        if target.is_empty() {
            continue;
        }
        let Some(primary) = parse_byte(cell(byte1_col)) else {
            continue;
        };
        let secondary = byte2_col.and_then(|idx| parse_byte(cell(idx)));

        let key = TokenKey { primary, secondary };
        if let Some(count) = count_col.and_then(|idx| byte_count(cell(idx))) {
            if count != key.byte_len() {
                tracing::debug!("{key}: row says {count} bytes, keeping the bytes as parsed");
            }
        }
        if let Some(previous) = strings.insert(key, target.to_string()) {
            tracing::debug!("Duplicate sheet row for {key}: '{previous}' replaced");
        }
    }

    Ok(strings)
}

/// The byte-count hint, when it holds a plain 1 or 2
fn byte_count(field: &str) -> Option<usize> {
    field.trim().parse().ok().filter(|count| matches!(count, 1 | 2))
}

/// Parse a hexadecimal byte field.
///
/// Surrounding whitespace and a `$` or `0x` prefix are tolerated. Empty
/// fields and values above `FF` yield `None`.
#[must_use]
pub fn parse_byte(field: &str) -> Option<u8> {
    let field = field.trim();
    let digits = field
        .strip_prefix('$')
        .or_else(|| field.strip_prefix("0x"))
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    if digits.is_empty() {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}
