//! `TokCat` CLI - merge a token sheet into a token catalog

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::Error;
use crate::merge::{BackupOutcome, MergeOptions, MergeOutcome, MergeRequest, WriteOutcome, run_merge};
use crate::settings::CatalogSettings;

#[derive(Parser)]
#[command(name = "tokcat", version)]
#[command(about = "TokCat: merge translated token names into a TI-Toolkit token catalog", long_about = None)]
struct Cli {
    /// Token sheet (CSV)
    #[arg(long = "csv", default_value = "programs_tokens.csv")]
    csv_path: PathBuf,

    /// Catalog to read
    #[arg(long, default_value = "ti-toolkit-8x-tokens.xml")]
    xml_in: PathBuf,

    /// Write the merged catalog here
    #[arg(long)]
    xml_out: Option<PathBuf>,

    /// Rewrite the input catalog
    #[arg(long)]
    in_place: bool,

    /// Backup suffix for --in-place (empty to disable)
    #[arg(long = "backup", default_value = ".bak")]
    backup_suffix: String,

    /// Only add missing entries, never overwrite existing ones
    #[arg(long)]
    only_missing: bool,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Reserialize the whole catalog (normalizes entities such as &#032;)
    #[arg(long)]
    no_safe_write: bool,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target language code (overrides the settings)
    #[arg(long)]
    lang: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_request(self) -> anyhow::Result<MergeRequest> {
        let mut settings = match &self.config {
            Some(path) => CatalogSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => CatalogSettings::default(),
        };
        if let Some(lang) = &self.lang {
            settings = settings.with_target_language(lang);
        }

        Ok(MergeRequest {
            csv_path: self.csv_path,
            xml_in: self.xml_in,
            xml_out: self.xml_out,
            in_place: self.in_place,
            backup_suffix: self.backup_suffix,
            dry_run: self.dry_run,
            unsafe_write: self.no_safe_write,
            options: MergeOptions { only_missing: self.only_missing },
            settings,
        })
    }
}

/// Run the `TokCat` CLI
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            let code = err.downcast_ref::<Error>().map_or(1, Error::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let request = cli.into_request()?;
    let outcome = run_merge(&request)?;
    print_outcome(&request, &outcome);
    Ok(())
}

fn print_outcome(request: &MergeRequest, outcome: &MergeOutcome) {
    let summary = &outcome.summary;
    let language = request.settings.target_language.to_uppercase();

    println!("Loaded {} {language} entries from CSV", summary.loaded);
    println!(
        "Processed: {} tokens; Added {language}: {}; Updated {language}: {}; Missing in XML: {}",
        summary.processed, summary.added, summary.updated, summary.missing
    );
    for (key, text) in &summary.missing_keys {
        println!("  missing {key} ({text})");
    }

    match &outcome.backup {
        BackupOutcome::NotRequested => {}
        BackupOutcome::Written(path) => println!("Backup written: {}", path.display()),
        BackupOutcome::Failed { path, message } => {
            eprintln!("[WARN] Could not create backup {}: {message}", path.display());
        }
    }

    match &outcome.write {
        WriteOutcome::DryRun => {
            println!("Dry run: no files written. Use --in-place or --xml-out to write changes.");
        }
        WriteOutcome::NothingToWrite => {
            println!("Nothing to add or update; no file changes needed.");
        }
        WriteOutcome::Patched { path, additions, updates, unlocated } => {
            if *unlocated > 0 {
                eprintln!("[WARN] {unlocated} planned entries could not be placed in the catalog text");
            }
            println!(
                "Wrote (safe writer): {} (added {additions} {language} entries, updated {updates}; existing entities preserved)",
                path.display()
            );
        }
        WriteOutcome::Reserialized { path, applied } => {
            println!(
                "Wrote (standard serializer): {} ({applied} entries changed)",
                path.display()
            );
        }
    }
}
