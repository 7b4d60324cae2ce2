//! Catalog and tabular settings
//!
//! Names of the columns, languages and elements the merge works with. Every
//! field has a default matching the TI-Toolkit token sheet, so an empty TOML
//! file (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Settings shared by the loader, the policy engine and the patch engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Name of the catalog root element.
    pub root_element: String,
    /// Reference language whose entries are never touched.
    pub canonical_language: String,
    /// Language being merged in.
    pub target_language: String,
    /// Header of the byte-count hint column (informational only).
    pub byte_count_column: String,
    /// Header of the primary byte column.
    pub byte1_column: String,
    /// Header of the secondary byte column.
    pub byte2_column: String,
    /// Header of the target-language display column.
    pub target_column: String,
    /// Indentation level used when none can be inferred from the document.
    pub indent_unit: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            root_element: "tokens".to_string(),
            canonical_language: "en".to_string(),
            target_language: "fr".to_string(),
            byte_count_column: "# of bytes".to_string(),
            byte1_column: "Byte 1".to_string(),
            byte2_column: "Byte 2".to_string(),
            target_column: target_column_for("fr"),
            indent_unit: "\t".to_string(),
        }
    }
}

impl CatalogSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Switch the target language.
    ///
    /// The target column follows the language unless it was customized away
    /// from the conventional `Readable Name (XX)` header.
    #[must_use]
    pub fn with_target_language(mut self, language: &str) -> Self {
        if self.target_column == target_column_for(&self.target_language) {
            self.target_column = target_column_for(language);
        }
        self.target_language = language.to_string();
        self
    }
}

/// Conventional display column header for a language code
fn target_column_for(language: &str) -> String {
    format!("Readable Name ({})", language.to_uppercase())
}
