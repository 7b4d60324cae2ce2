//! Token catalog XML
//!
//! The catalog is a `<tokens>` document:
//!
//! ```xml
//! <tokens>
//!     <token value="$2A">
//!         <version>
//!             <since>...</since>
//!             <lang code="en" display="View">
//!                 <accessible>View</accessible>
//!                 <variant>view</variant>
//!             </lang>
//!         </version>
//!     </token>
//!     <two-byte value="$BB">
//!         <token value="$05">...</token>
//!     </two-byte>
//! </tokens>
//! ```
//!
//! [`parse_catalog`] builds a generic element tree (the structural view used
//! for lookups). [`TokenNode`] is the typed view of one `<token>`. The tree can
//! be serialized again with [`serialize_catalog`], which re-escapes everything
//! and is therefore not byte-faithful.

mod document;
mod reader;
mod tokens;
mod writer;

pub use document::{CatalogDocument, Element, Node};
pub use reader::parse_catalog;
pub use tokens::{LocalizedEntry, TokenNode, VersionRecord};
pub use writer::serialize_catalog;

/// Single-byte token, or a token nested in a two-byte group
pub const TOKEN: &str = "token";
/// Group of two-byte tokens sharing their first byte
pub const TWO_BYTE: &str = "two-byte";
/// One revision of a token's definition
pub const VERSION: &str = "version";
/// Per-language names of a token
pub const LANG: &str = "lang";
/// Screen-reader friendly name, also the fallback display
pub const ACCESSIBLE: &str = "accessible";
/// Alternative spelling of a name
pub const VARIANT: &str = "variant";

/// Byte value attribute of `<token>` and `<two-byte>`
pub const VALUE_ATTR: &str = "value";
/// Language code attribute of `<lang>`
pub const CODE_ATTR: &str = "code";
/// Display name attribute of `<lang>`
pub const DISPLAY_ATTR: &str = "display";
