//! End-to-end tests for the noty CLI.
//!
//! Tests invoke the `noty` binary as a subprocess against a temporary root.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SCRUBBED_ENV: &[&str] = &[
    "NOTY_ROOT",
    "NOTY_CONFIG",
    "NOTY_EDITOR",
    "NOTY_BACKUP_DIR",
    "NOTY_LOG",
    "path_root",
    "root_path",
    "text_editor",
    "EDITOR",
];

fn noty(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_noty"));
    for key in SCRUBBED_ENV {
        cmd.env_remove(key);
    }
    cmd.current_dir(root).env("NOTY_EDITOR", "true").arg("--root").arg(root);
    cmd
}

fn run(root: &Path, args: &[&str]) -> Output {
    noty(root).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn create(root: &Path, subject: &str) -> i64 {
    let output = run(root, &["--format", "json", "create", subject, "--no-launch"]);
    assert!(output.status.success(), "create failed: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["id"].as_i64().unwrap()
}

fn content_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(root.join("notes"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn e2e_no_command_prints_usage() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
    assert!(!dir.path().join("notes").exists(), "usage must not touch the root");
}

#[test]
fn e2e_two_commands_are_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["list", "delete", "0"]);
    assert!(!output.status.success());
}

#[test]
fn e2e_create_assigns_sequential_ids() {
    let dir = TempDir::new().unwrap();
    assert_eq!(create(dir.path(), "taxes"), 0);
    assert_eq!(create(dir.path(), "groceries"), 1);

    assert!(dir.path().join("utils").join("settings.json").is_file());
    assert_eq!(content_files(dir.path()).len(), 2);
    assert_eq!(fs::read_dir(dir.path().join("metadatas")).unwrap().count(), 2);
}

#[test]
fn e2e_create_text_output_and_editor_launch() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["create", "taxes"]);
    assert!(output.status.success(), "create failed: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "created note 0: taxes");
}

#[test]
fn e2e_duplicate_subject_fails() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = run(dir.path(), &["create", "taxes", "--no-launch"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("taxes"));
    assert_eq!(content_files(dir.path()).len(), 1);
}

#[test]
fn e2e_empty_subject_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["create", "", "--no-launch"]);
    assert!(!output.status.success());
}

#[test]
fn e2e_delete_then_list() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");
    create(dir.path(), "groceries");

    let output = run(dir.path(), &["delete", "0"]);
    assert!(output.status.success(), "delete failed: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "deleted note 0: taxes");

    let output = run(dir.path(), &["list"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "note id: 1, subject: groceries\n");

    // The subject is free again, but the id is not reused.
    assert_eq!(create(dir.path(), "taxes"), 2);
}

#[test]
fn e2e_delete_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = run(dir.path(), &["delete", "7"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains('7'));

    let output = run(dir.path(), &["list"]);
    assert_eq!(stdout(&output), "note id: 0, subject: taxes\n");
}

#[test]
fn e2e_list_json() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "b");
    create(dir.path(), "a");

    let output = run(dir.path(), &["--format", "json", "list"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let notes = value.as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["id"], 0);
    assert_eq!(notes[0]["subject"], "b");
    assert_eq!(notes[1]["subject"], "a");
}

#[test]
fn e2e_list_empty_repository() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["list"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn e2e_search_shows_match_with_context() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");
    create(dir.path(), "groceries");
    let files = content_files(dir.path());
    fs::write(&files[0], "intro\nfile the receipts\noutro\n").unwrap();
    fs::write(&files[1], "milk\neggs\n").unwrap();

    let output = run(dir.path(), &["search", "receipts"]);
    assert!(output.status.success(), "search failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "note id: 0, subject: taxes\n1-intro\n2:file the receipts\n3-outro\n\n"
    );
}

#[test]
fn e2e_search_with_huge_context() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");
    let files = content_files(dir.path());
    fs::write(&files[0], "a\nhit\nb\n").unwrap();

    let output = run(dir.path(), &["search", "hit", "-C", "100000000000"]);
    assert!(output.status.success(), "search failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "note id: 0, subject: taxes\n1-a\n2:hit\n3-b\n\n");
}

#[cfg(unix)]
#[test]
fn e2e_launch_runs_editor_on_content_file() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");
    let draft = dir.path().join("draft");
    fs::write(&draft, "written by the editor\n").unwrap();

    let editor = format!("cp {}", draft.display());
    let output = run(dir.path(), &["--editor", &editor, "launch", "0"]);
    assert!(output.status.success(), "launch failed: {}", stderr(&output));

    let files = content_files(dir.path());
    assert_eq!(fs::read_to_string(&files[0]).unwrap(), "written by the editor\n");
}

#[test]
fn e2e_launch_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = run(dir.path(), &["launch", "9"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to launch note 9"));
}

#[test]
fn e2e_search_no_match_prints_nothing() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = run(dir.path(), &["search", "absent"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn e2e_search_regex_json() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "log");
    let files = content_files(dir.path());
    fs::write(&files[0], "error 42\nok\nerror 7\n").unwrap();

    let output = run(
        dir.path(),
        &["--format", "json", "search", "--regex", r"error \d+", "-C", "0", "-m", "5"],
    );
    assert!(output.status.success(), "search failed: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lines = value[0]["matched_lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["number"], 1);
    assert_eq!(lines[1]["text"], "error 7");
}

#[test]
fn e2e_invalid_regex_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["search", "--regex", "("]);
    assert!(!output.status.success());
}

#[test]
fn e2e_check_reports_and_repairs_stale_subject() {
    let dir = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = run(dir.path(), &["check"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "repository is consistent");

    // Remove the note's files behind the repository's back.
    fs::remove_dir_all(dir.path().join("metadatas")).unwrap();
    fs::remove_dir_all(dir.path().join("notes")).unwrap();

    let output = run(dir.path(), &["check"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("stale subject (no note): taxes"));

    let output = run(dir.path(), &["--format", "json", "check", "--repair"]);
    assert!(output.status.success(), "repair failed: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["repaired"], true);

    // The subject is usable again; the counter kept its value.
    assert_eq!(create(dir.path(), "taxes"), 1);
}

#[test]
fn e2e_backup_dir_mirrors_stores() {
    let dir = TempDir::new().unwrap();
    let backup = TempDir::new().unwrap();
    create(dir.path(), "taxes");

    let output = noty(dir.path())
        .env("NOTY_BACKUP_DIR", backup.path())
        .arg("list")
        .output()
        .unwrap();
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    assert!(backup.path().join("utils").join("settings.json").is_file());
    assert_eq!(fs::read_dir(backup.path().join("notes")).unwrap().count(), 1);
}

#[test]
fn e2e_completions() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("noty"));
}
