//! Token keys
//!
//! A token is identified by its byte encoding: one byte for ordinary tokens,
//! two bytes for tokens living in a `<two-byte>` group.

use std::fmt;

/// Byte-code key of a catalog token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKey {
    /// First byte (the group byte for two-byte tokens).
    pub primary: u8,
    /// Second byte, present only for two-byte tokens.
    pub secondary: Option<u8>,
}

impl TokenKey {
    /// Key of a single-byte token
    #[must_use]
    pub fn single(primary: u8) -> Self {
        Self { primary, secondary: None }
    }

    /// Key of a two-byte token
    #[must_use]
    pub fn double(primary: u8, secondary: u8) -> Self {
        Self { primary, secondary: Some(secondary) }
    }

    /// Whether this key addresses a token nested in a two-byte group
    #[must_use]
    pub fn is_two_byte(&self) -> bool {
        self.secondary.is_some()
    }

    /// Encoded length in bytes
    #[must_use]
    pub fn byte_len(&self) -> usize {
        if self.is_two_byte() { 2 } else { 1 }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.primary)?;
        if let Some(secondary) = self.secondary {
            write!(f, "{secondary:02X}")?;
        }
        Ok(())
    }
}

/// Catalog attribute form of a byte (`$2A`)
#[must_use]
pub fn catalog_value(byte: u8) -> String {
    format!("${byte:02X}")
}

/// Whether a catalog `value` attribute denotes `byte`.
///
/// Comparison is case-insensitive, so `$2a` and `$2A` both match.
#[must_use]
pub fn value_matches(value: &str, byte: u8) -> bool {
    value.eq_ignore_ascii_case(&catalog_value(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TokenKey::single(0x2A).to_string(), "2A");
        assert_eq!(TokenKey::double(0xBB, 0x0F).to_string(), "BB0F");
    }

    #[test]
    fn test_byte_len() {
        assert!(!TokenKey::single(0x2A).is_two_byte());
        assert_eq!(TokenKey::single(0x2A).byte_len(), 1);
        assert!(TokenKey::double(0xBB, 0x05).is_two_byte());
        assert_eq!(TokenKey::double(0xBB, 0x05).byte_len(), 2);
    }

    #[test]
    fn test_value_matches() {
        assert!(value_matches("$2A", 0x2A));
        assert!(value_matches("$2a", 0x2A));
        assert!(!value_matches("$2B", 0x2A));
        assert!(!value_matches("2A", 0x2A));
        assert!(value_matches("$05", 0x05));
    }
}
