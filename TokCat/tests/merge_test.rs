use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use tokcat::prelude::*;
use tokcat::merge::BackupOutcome;

const CATALOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!-- TI-84 token catalog -->
<tokens>
\t<token value=\"$2A\">
\t\t<version>
\t\t\t<lang code=\"en\" display=\"Voir\"><accessible>Voir</accessible></lang>
\t\t</version>
\t</token>
\t<token value=\"$3E\">
\t\t<version>
\t\t\t<lang code=\"en\" display=\"Disp&#032;\"><accessible>Disp&#032;</accessible></lang>
\t\t\t<lang code=\"fr\" display=\"Ancien\"><accessible>Ancien</accessible></lang>
\t\t</version>
\t</token>
\t<two-byte value=\"$2B\">
\t\t<token value=\"$05\">
\t\t\t<version>
\t\t\t\t<lang code=\"en\" display=\"Store\"><accessible>Store</accessible></lang>
\t\t\t</version>
\t\t</token>
\t</two-byte>
</tokens>
";

const SHEET: &str = "# of bytes,Byte 1,Byte 2,Readable Name (EN),Readable Name (FR)
1,2A,,Voir,Voir
2,2B,05,Store,\"Stocker \"
1,3E,,Disp ,Nouveau
1,7F,,Ghost,Fantôme
";

const STORE_EN: &str =
    "\t\t\t\t<lang code=\"en\" display=\"Store\"><accessible>Store</accessible></lang>\n";
const STORE_FR: &str =
    "\t\t\t\t<lang code=\"fr\" display=\"Stocker&#032;\"><accessible>Stocker&#032;</accessible></lang>\n";

/// Catalog text after a full merge of `SHEET`
fn merged_catalog() -> String {
    CATALOG
        .replace(STORE_EN, &format!("{STORE_EN}{STORE_FR}"))
        .replace(
            "<lang code=\"fr\" display=\"Ancien\"><accessible>Ancien</accessible>",
            "<lang code=\"fr\" display=\"Nouveau\"><accessible>Nouveau</accessible>",
        )
}

struct Fixture {
    _dir: TempDir,
    csv: PathBuf,
    xml: PathBuf,
}

impl Fixture {
    fn new(catalog: &str) -> Self {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("programs_tokens.csv");
        let xml = dir.path().join("tokens.xml");
        fs::write(&csv, SHEET).unwrap();
        fs::write(&xml, catalog).unwrap();
        Self { _dir: dir, csv, xml }
    }

    fn request(&self) -> MergeRequest {
        MergeRequest::new(&self.csv, &self.xml)
    }

    fn in_place(&self) -> MergeRequest {
        let mut request = self.request();
        request.in_place = true;
        request
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_patch_in_place() {
    let fixture = Fixture::new(CATALOG);
    let outcome = run_merge(&fixture.in_place()).unwrap();

    assert_eq!(outcome.summary.loaded, 4);
    assert_eq!(outcome.summary.processed, 3);
    assert_eq!(outcome.summary.added, 1);
    assert_eq!(outcome.summary.updated, 1);
    assert_eq!(outcome.summary.missing, 1);
    assert_eq!(
        outcome.summary.missing_keys,
        vec![(TokenKey::single(0x7F), "Fantôme".to_string())]
    );
    assert!(matches!(
        outcome.write,
        WriteOutcome::Patched { additions: 1, updates: 1, unlocated: 0, .. }
    ));

    // Everything outside the two edits is byte-identical, entities included
    assert_eq!(read(&fixture.xml), merged_catalog());
}

#[test]
fn test_second_run_is_noop() {
    let fixture = Fixture::new(CATALOG);
    run_merge(&fixture.in_place()).unwrap();
    let first = read(&fixture.xml);
    fs::remove_file(fixture.xml.with_extension("xml.bak")).unwrap();

    let outcome = run_merge(&fixture.in_place()).unwrap();
    assert_eq!(outcome.summary.added, 0);
    assert_eq!(outcome.summary.updated, 0);
    assert_eq!(outcome.write, WriteOutcome::NothingToWrite);
    assert_eq!(outcome.backup, BackupOutcome::NotRequested);
    assert_eq!(read(&fixture.xml), first);
    assert!(!fixture.xml.with_extension("xml.bak").exists());
}

#[test]
fn test_backup_keeps_original() {
    let fixture = Fixture::new(CATALOG);
    let outcome = run_merge(&fixture.in_place()).unwrap();

    let backup = fixture.xml.with_extension("xml.bak");
    assert_eq!(outcome.backup, BackupOutcome::Written(backup.clone()));
    assert_eq!(read(&backup), CATALOG);
}

#[test]
fn test_empty_backup_suffix() {
    let fixture = Fixture::new(CATALOG);
    let mut request = fixture.in_place();
    request.backup_suffix = String::new();
    let outcome = run_merge(&request).unwrap();

    assert_eq!(outcome.backup, BackupOutcome::NotRequested);
    assert!(!fixture.xml.with_extension("xml.bak").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let fixture = Fixture::new(CATALOG);

    let mut request = fixture.in_place();
    request.dry_run = true;
    let outcome = run_merge(&request).unwrap();
    assert_eq!(outcome.write, WriteOutcome::DryRun);
    assert_eq!(outcome.summary.added, 1);
    assert_eq!(outcome.summary.updated, 1);

    // No destination at all behaves the same
    let outcome = run_merge(&fixture.request()).unwrap();
    assert_eq!(outcome.write, WriteOutcome::DryRun);

    assert_eq!(read(&fixture.xml), CATALOG);
    assert!(!fixture.xml.with_extension("xml.bak").exists());
}

#[test]
fn test_only_missing_keeps_existing() {
    let fixture = Fixture::new(CATALOG);
    let mut request = fixture.in_place();
    request.options.only_missing = true;
    let outcome = run_merge(&request).unwrap();

    assert_eq!(outcome.summary.added, 1);
    assert_eq!(outcome.summary.updated, 0);
    assert_eq!(read(&fixture.xml), CATALOG.replace(STORE_EN, &format!("{STORE_EN}{STORE_FR}")));
}

#[test]
fn test_xml_out_leaves_input() {
    let fixture = Fixture::new(CATALOG);
    let out = fixture.xml.with_file_name("merged.xml");
    let mut request = fixture.request();
    request.xml_out = Some(out.clone());
    let outcome = run_merge(&request).unwrap();

    assert_eq!(outcome.backup, BackupOutcome::NotRequested);
    assert_eq!(read(&out), merged_catalog());
    assert_eq!(read(&fixture.xml), CATALOG);
}

#[test]
fn test_missing_input() {
    let fixture = Fixture::new(CATALOG);
    let mut request = fixture.request();
    request.csv_path = fixture.csv.with_file_name("absent.csv");

    let err = run_merge(&request).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_wrong_root() {
    let fixture = Fixture::new("<catalog><token value=\"$2A\"/></catalog>");
    let err = run_merge(&fixture.in_place()).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedRoot { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_malformed_catalog() {
    let fixture = Fixture::new("<tokens><token value=\"$2A\"></tokens>");
    let err = run_merge(&fixture.in_place()).unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_reserialize_normalizes_entities() {
    let fixture = Fixture::new(CATALOG);
    let mut request = fixture.in_place();
    request.unsafe_write = true;
    let outcome = run_merge(&request).unwrap();
    assert!(matches!(outcome.write, WriteOutcome::Reserialized { applied: 2, .. }));

    let written = read(&fixture.xml);
    assert!(!written.contains("&#032;"));
    assert!(written.contains("display=\"Nouveau\""));

    let doc = parse_catalog(&written).unwrap();
    let settings = CatalogSettings::default();
    let strings = load_target_strings(&fixture.csv, &settings).unwrap();
    let (plan, _) = plan_merge(&doc.root, &strings, &MergeOptions::default(), &settings);
    assert!(plan.is_empty());
}

#[cfg(unix)]
#[test]
fn test_in_place_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new(CATALOG);
    fs::set_permissions(&fixture.xml, fs::Permissions::from_mode(0o644)).unwrap();

    run_merge(&fixture.in_place()).unwrap();

    assert_eq!(read(&fixture.xml), merged_catalog());
    let mode = fs::metadata(&fixture.xml).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[cfg(unix)]
#[test]
fn test_in_place_through_symlink() {
    use std::os::unix::fs::symlink;

    let fixture = Fixture::new(CATALOG);
    let link = fixture.xml.with_file_name("linked.xml");
    symlink(&fixture.xml, &link).unwrap();

    let mut request = fixture.in_place();
    request.xml_in = link.clone();
    request.backup_suffix = String::new();
    run_merge(&request).unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(read(&fixture.xml), merged_catalog());
}
