//! # TokCat
//!
//! Merges translated token names from a CSV token sheet into a TI-Toolkit
//! token catalog (`<tokens>` XML), without disturbing anything else in the
//! file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tokcat::merge::{MergeRequest, WriteOutcome, run_merge};
//!
//! let mut request = MergeRequest::new("programs_tokens.csv", "ti-toolkit-8x-tokens.xml");
//! request.in_place = true;
//!
//! let outcome = run_merge(&request)?;
//! println!("Added {}, updated {}", outcome.summary.added, outcome.summary.updated);
//! if let WriteOutcome::Patched { path, .. } = outcome.write {
//!     println!("Wrote {}", path.display());
//! }
//! # Ok::<(), tokcat::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`formats::tabular`] - token sheet loading
//! - [`formats::catalog`] - catalog element tree, reader and writer
//! - [`merge`] - lookup, merge decisions and the run workflow
//! - [`patch`] - text-preserving catalog edits
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `tokcat` command-line binary

pub mod error;
pub mod formats;
pub mod merge;
pub mod patch;
pub mod settings;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::catalog::{CatalogDocument, Element, TokenNode, parse_catalog, serialize_catalog};
    pub use crate::formats::tabular::{TargetStrings, load_target_strings};
    pub use crate::merge::{
        EditPlan, MergeOptions, MergeOutcome, MergeRequest, MergeSummary, WriteOutcome, plan_merge,
        run_merge,
    };
    pub use crate::patch::{PatchReport, patch_catalog};
    pub use crate::settings::CatalogSettings;
    pub use crate::types::TokenKey;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
