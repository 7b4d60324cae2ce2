//! Error types for `TokCat`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `TokCat` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required input file does not exist.
    #[error("input not found: {path}")]
    InputNotFound {
        /// The missing file path.
        path: PathBuf,
    },

    /// The catalog could not be re-read right before patching.
    #[error("could not re-read {path} before writing: {source}")]
    Reread {
        /// The catalog path.
        path: PathBuf,
        /// What went wrong while re-reading.
        #[source]
        source: Box<Error>,
    },

    /// The temporary output file could not replace the destination.
    #[error("could not replace destination: {0}")]
    Persist(#[from] tempfile::PersistError),

    // ==================== Catalog Errors ====================
    /// The document root is not the expected catalog element.
    #[error("root element is <{found}>, expected <{expected}>")]
    UnrecognizedRoot {
        /// The root element name that was found.
        found: String,
        /// The root element name the settings require.
        expected: String,
    },

    /// The document has no root element at all.
    #[error("document has no root element")]
    EmptyDocument,

    /// Two planned text edits cover the same bytes.
    #[error("overlapping edits at byte {first} and byte {second}")]
    OverlappingEdits {
        /// Start of the earlier edit.
        first: usize,
        /// Start of the later edit.
        second: usize,
    },

    // ==================== Tabular Errors ====================
    /// A column required by the settings is absent from the CSV header.
    #[error("CSV header has no '{column}' column")]
    MissingColumn {
        /// The missing header name.
        column: String,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Settings file could not be parsed.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Missing inputs, an unrecognized root and a failed re-read are the
    /// fatal-input class and map to 2. Everything else maps to 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputNotFound { .. } | Self::UnrecognizedRoot { .. } | Self::Reread { .. } => 2,
            _ => 1,
        }
    }
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidSettings(err.to_string())
    }
}

/// A specialized Result type for `TokCat` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = Error::InputNotFound { path: PathBuf::from("a.csv") };
        assert_eq!(missing.exit_code(), 2);

        let root = Error::UnrecognizedRoot {
            found: "catalog".to_string(),
            expected: "tokens".to_string(),
        };
        assert_eq!(root.exit_code(), 2);

        let reread = Error::Reread {
            path: PathBuf::from("t.xml"),
            source: Box::new(Error::EmptyDocument),
        };
        assert_eq!(reread.exit_code(), 2);

        assert_eq!(Error::EmptyDocument.exit_code(), 1);
        assert_eq!(Error::MissingColumn { column: "Byte 1".to_string() }.exit_code(), 1);
    }
}
