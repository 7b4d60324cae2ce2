//! Core types for merge planning
//!

use std::fmt;

use crate::types::TokenKey;

/// Options for merge planning
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Never overwrite an existing target-language entry
    pub only_missing: bool,
}

/// Why a key produced no edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target string equals what the canonical language already shows.
    MatchesCanonical,
    /// A target entry exists and only-missing mode is active.
    KeepExisting,
    /// The target entry already holds this string.
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchesCanonical => write!(f, "same as canonical"),
            Self::KeepExisting => write!(f, "existing entry kept"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Outcome of the policy for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Insert a new target entry in the last version.
    Add,
    /// Rewrite the existing target entry, which currently holds `current`.
    Update { current: String },
    /// Leave the token alone.
    Skip(SkipReason),
}

/// One planned edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit {
    pub key: TokenKey,
    /// Target-language string, exactly as loaded.
    pub text: String,
}

/// Edits to perform, in sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    pub additions: Vec<PlannedEdit>,
    pub updates: Vec<PlannedEdit>,
}

impl EditPlan {
    /// Whether the plan has nothing to do
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.updates.is_empty()
    }
}

/// Counts gathered while planning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Target-language strings loaded from the sheet.
    pub loaded: usize,
    /// Keys whose token was found in the catalog.
    pub processed: usize,
    /// Keys planned for addition.
    pub added: usize,
    /// Keys planned for update.
    pub updated: usize,
    /// Keys with no token in the catalog.
    pub missing: usize,
    /// The missing keys with their target string, in sheet order.
    pub missing_keys: Vec<(TokenKey, String)>,
}
