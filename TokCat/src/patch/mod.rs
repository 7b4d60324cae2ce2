//! Byte-faithful catalog patching
//!
//! The catalog is edited as text. A [`TextIndex`] records where each token,
//! version and language entry sits in the raw document, and the planned
//! additions and updates become [`TextEdit`]s against those offsets. Comments,
//! entity spellings such as `&#032;` and formatting outside the edits are kept
//! exactly.

mod engine;
mod escape;
mod index;

pub use engine::{PatchReport, TextEdit, apply_edits, patch_catalog};
pub use escape::{
    SPACE_REFERENCE, encode_trailing_spaces, escape_attribute, escape_attribute_single_quoted,
    escape_text,
};
pub use index::{AttrSpan, ElementSpan, GroupSpan, LangSpan, TextIndex, TokenSpan, VersionSpan};
