//! Typed view of `<token>` elements

use super::document::Element;
use super::{ACCESSIBLE, CODE_ATTR, DISPLAY_ATTR, LANG, VALUE_ATTR, VARIANT, VERSION};

/// One `<lang>` entry of a version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedEntry {
    /// Language code (`code` attribute).
    pub language: String,
    /// Display name (`display` attribute), empty when absent.
    pub display: String,
    /// Text of the first `<accessible>` child, empty when absent.
    pub fallback: String,
    /// Texts of every `<accessible>` child.
    pub accessibles: Vec<String>,
    /// Texts of every `<variant>` child.
    pub variants: Vec<String>,
}

/// One `<version>` of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRecord {
    /// Language entries in document order.
    pub entries: Vec<LocalizedEntry>,
}

/// A `<token>` with its versions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenNode {
    /// Byte value attribute (`$HH`).
    pub value: String,
    /// Versions in document order.
    pub versions: Vec<VersionRecord>,
}

impl LocalizedEntry {
    /// Build from a `<lang>` element
    #[must_use]
    pub fn from_element(lang: &Element) -> Self {
        let accessibles: Vec<String> = lang.elements_named(ACCESSIBLE).map(Element::text).collect();
        Self {
            language: lang.attr(CODE_ATTR).unwrap_or_default().to_string(),
            display: lang.attr(DISPLAY_ATTR).unwrap_or_default().to_string(),
            fallback: accessibles.first().cloned().unwrap_or_default(),
            accessibles,
            variants: lang.elements_named(VARIANT).map(Element::text).collect(),
        }
    }

    /// Display if non-empty, otherwise the fallback text
    #[must_use]
    pub fn value(&self) -> &str {
        if self.display.is_empty() {
            &self.fallback
        } else {
            &self.display
        }
    }

    /// Case-insensitive language code comparison
    #[must_use]
    pub fn is_language(&self, code: &str) -> bool {
        self.language.eq_ignore_ascii_case(code)
    }
}

impl TokenNode {
    /// Build from a `<token>` element
    #[must_use]
    pub fn from_element(token: &Element) -> Self {
        Self {
            value: token.attr(VALUE_ATTR).unwrap_or_default().to_string(),
            versions: token
                .elements_named(VERSION)
                .map(|version| VersionRecord {
                    entries: version.elements_named(LANG).map(LocalizedEntry::from_element).collect(),
                })
                .collect(),
        }
    }

    /// All entries across versions, in document order
    pub fn entries(&self) -> impl Iterator<Item = &LocalizedEntry> {
        self.versions.iter().flat_map(|version| version.entries.iter())
    }

    /// Entries of one language across versions, in document order
    pub fn entries_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a LocalizedEntry> {
        self.entries().filter(move |entry| entry.is_language(code))
    }
}
