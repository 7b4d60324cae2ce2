//! Merging target-language names into the catalog
//!
//! [`plan_merge`] walks the sheet in order and decides, per key, whether the
//! catalog needs a new entry, an updated one, or nothing. [`run_merge`] drives
//! a whole run from files on disk to the written catalog.

pub mod apply;
pub mod matcher;
pub mod policy;
pub mod types;
pub mod workflow;

pub use apply::apply_plan_to_tree;
pub use matcher::{find_token, find_token_mut};
pub use policy::{decide, plan_merge, preferred_display};
pub use types::{Decision, EditPlan, MergeOptions, MergeSummary, PlannedEdit, SkipReason};
pub use workflow::{BackupOutcome, MergeOutcome, MergeRequest, WriteOutcome, run_merge};
