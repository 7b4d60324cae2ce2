//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! One complete merge run: load, plan, re-read, patch, back up, write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::apply::apply_plan_to_tree;
use super::policy::plan_merge;
use super::types::{EditPlan, MergeOptions, MergeSummary};
use crate::error::{Error, Result};
use crate::formats::catalog::{CatalogDocument, parse_catalog, serialize_catalog};
use crate::formats::tabular::load_target_strings;
use crate::patch::patch_catalog;
use crate::settings::CatalogSettings;

/// Inputs and write mode of a merge run
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub csv_path: PathBuf,
    pub xml_in: PathBuf,
    /// Write here instead of the input.
    pub xml_out: Option<PathBuf>,
    /// Rewrite the input when no output path is given.
    pub in_place: bool,
    /// Backup suffix for in-place writes; empty disables the backup.
    pub backup_suffix: String,
    pub dry_run: bool,
    /// Reserialize the whole tree instead of patching the text.
    pub unsafe_write: bool,
    pub options: MergeOptions,
    pub settings: CatalogSettings,
}

impl MergeRequest {
    /// Request with default settings and no destination (report only)
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(csv_path: P, xml_in: Q) -> Self {
        Self {
            csv_path: csv_path.into(),
            xml_in: xml_in.into(),
            xml_out: None,
            in_place: false,
            backup_suffix: ".bak".to_string(),
            dry_run: false,
            unsafe_write: false,
            options: MergeOptions::default(),
            settings: CatalogSettings::default(),
        }
    }

    fn destination(&self) -> Option<&Path> {
        self.xml_out
            .as_deref()
            .or_else(|| self.in_place.then_some(self.xml_in.as_path()))
    }
}

/// What happened to the destination file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Report only; no destination was requested or writing was disabled.
    DryRun,
    /// The plan was empty, nothing was written.
    NothingToWrite,
    /// The raw text was patched, every untouched byte kept.
    Patched {
        path: PathBuf,
        additions: usize,
        updates: usize,
        unlocated: usize,
    },
    /// The whole tree was reserialized.
    Reserialized { path: PathBuf, applied: usize },
}

/// State of the in-place backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    NotRequested,
    Written(PathBuf),
    /// The copy failed; the write went ahead anyway.
    Failed { path: PathBuf, message: String },
}

/// Result of a merge run
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub summary: MergeSummary,
    pub write: WriteOutcome,
    pub backup: BackupOutcome,
}

/// Run a merge
///
/// # Errors
/// Returns [`Error::InputNotFound`] for missing inputs, [`Error::UnrecognizedRoot`]
/// for a catalog with the wrong root, [`Error::Reread`] if the catalog cannot
/// be read again before writing, and IO or XML errors otherwise.
pub fn run_merge(request: &MergeRequest) -> Result<MergeOutcome> {
    for path in [&request.csv_path, &request.xml_in] {
        if !path.is_file() {
            return Err(Error::InputNotFound { path: path.clone() });
        }
    }
    let settings = &request.settings;

    let strings = load_target_strings(&request.csv_path, settings)?;
    tracing::info!(
        "Loaded {} {} entries from {}",
        strings.len(),
        settings.target_language,
        request.csv_path.display()
    );

    let (doc, _) = load_catalog(&request.xml_in, settings)?;

    let destination = match request.destination() {
        Some(path) if !request.dry_run => path.to_path_buf(),
        _ => {
            let (_, summary) = plan_merge(&doc.root, &strings, &request.options, settings);
            return Ok(MergeOutcome {
                summary,
                write: WriteOutcome::DryRun,
                backup: BackupOutcome::NotRequested,
            });
        }
    };

    // The file may have changed since it was first read
    let (mut fresh, text) = load_catalog(&request.xml_in, settings).map_err(|err| Error::Reread {
        path: request.xml_in.clone(),
        source: Box::new(err),
    })?;
    let (plan, summary) = plan_merge(&fresh.root, &strings, &request.options, settings);

    let rendered = if plan.is_empty() {
        None
    } else {
        render(request, &mut fresh, &text, &plan, &destination)?
    };
    let Some((content, write)) = rendered else {
        tracing::info!("Nothing to add or update");
        return Ok(MergeOutcome {
            summary,
            write: WriteOutcome::NothingToWrite,
            backup: BackupOutcome::NotRequested,
        });
    };

    let backup = if request.xml_out.is_none() && !request.backup_suffix.is_empty() {
        back_up(&request.xml_in, &request.backup_suffix)
    } else {
        BackupOutcome::NotRequested
    };

    write_atomic(&destination, &content)?;
    tracing::info!("Wrote {:?}", write);

    Ok(MergeOutcome { summary, write, backup })
}

/// Compute the output text, or `None` when no planned edit could be applied
fn render(
    request: &MergeRequest,
    doc: &mut CatalogDocument,
    text: &str,
    plan: &EditPlan,
    destination: &Path,
) -> Result<Option<(String, WriteOutcome)>> {
    if request.unsafe_write {
        let applied = apply_plan_to_tree(&mut doc.root, plan, &request.settings);
        if applied == 0 {
            return Ok(None);
        }
        let content = serialize_catalog(doc)?;
        return Ok(Some((content, WriteOutcome::Reserialized { path: destination.to_path_buf(), applied })));
    }

    let report = patch_catalog(text, plan, &request.settings)?;
    if report.additions + report.updates == 0 {
        return Ok(None);
    }
    let write = WriteOutcome::Patched {
        path: destination.to_path_buf(),
        additions: report.additions,
        updates: report.updates,
        unlocated: report.unlocated.len(),
    };
    Ok(Some((report.text, write)))
}

/// Read and parse the catalog, keeping its raw text
fn load_catalog(path: &Path, settings: &CatalogSettings) -> Result<(CatalogDocument, String)> {
    let text = fs::read_to_string(path)?;
    let doc = parse_catalog(&text)?;
    doc.expect_root(&settings.root_element)?;
    Ok((doc, text))
}

fn back_up(path: &Path, suffix: &str) -> BackupOutcome {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    let backup = PathBuf::from(name);

    match fs::copy(path, &backup) {
        Ok(_) => {
            tracing::info!("Backup written: {}", backup.display());
            BackupOutcome::Written(backup)
        }
        Err(err) => {
            tracing::warn!("Could not create backup {}: {}", backup.display(), err);
            BackupOutcome::Failed { path: backup, message: err.to_string() }
        }
    }
}

/// Replace `path` with `content` through a temporary file in the same directory.
///
/// A symlinked destination is followed, and an existing file keeps its
/// permissions.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    if let Ok(metadata) = fs::metadata(&target) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.persist(&target)?;
    Ok(())
}
