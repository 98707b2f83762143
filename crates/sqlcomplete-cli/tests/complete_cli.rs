//! CLI integration tests for the completion command.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::{tempdir, TempDir};

const CATALOG: &str = r#"{
    "currentDatabase": "shop",
    "databases": ["shop", "archive"],
    "schemas": {
        "shop": {
            "tables": {"customers": ["id", "name", "email"], "invoices": ["id", "total"]},
            "views": {"open_invoices": ["id"]}
        }
    },
    "users": ["'admin'@'%'"]
}"#;

fn write_catalog() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG).expect("write catalog");
    (dir, path)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlcomplete"))
        .args(args)
        .output()
        .expect("run CLI")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn completes_tables_after_from() {
    let (_dir, catalog) = write_catalog();
    let output = run(&[
        "--catalog",
        path_arg(&catalog),
        "--casing",
        "lower",
        "SELECT * FROM cu|",
    ]);

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "customers\ttable\n");
}

#[test]
fn completes_columns_before_from() {
    let (_dir, catalog) = write_catalog();
    let output = run(&[
        "--catalog",
        path_arg(&catalog),
        "--casing",
        "lower",
        "SELECT em| FROM customers",
    ]);

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.lines().next() == Some("email\tcolumn"),
        "Should rank the email column first: {stdout}"
    );
}

#[test]
fn json_output() {
    let (_dir, catalog) = write_catalog();
    let output = run(&[
        "--catalog",
        path_arg(&catalog),
        "-f",
        "json",
        "--compact",
        "--casing",
        "lower",
        "USE arc|",
    ]);

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        r#"[{"text":"archive","replaceFromOffset":-3,"category":"database","schemaContext":"shop"}]"#
    );
}

#[test]
fn no_smart_prefix_matches_everything() {
    let output = run(&["--no-smart", "--casing", "upper", "sel"]);

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "SELECT\n");
}

#[test]
fn settings_file_is_applied() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("settings.json");
    std::fs::write(&config, r#"{"keywordCasing": "lower"}"#).expect("write settings");

    let output = run(&["--config", path_arg(&config), "SEL"]);

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "select\tkeyword\n");
}

#[test]
fn reads_sql_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sqlcomplete"))
        .args(["--casing", "upper"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"SELECT * FROM customers ORDER \n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for CLI");

    assert!(output.status.success(), "CLI should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "BY\tkeyword\n");
}

#[test]
fn missing_catalog_is_a_config_error() {
    let output = run(&["--catalog", "/nonexistent/catalog.json", "SELECT |"]);

    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to read catalog file"),
        "Should explain the failure: {stderr}"
    );
}

#[test]
fn invalid_catalog_is_a_config_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{\"databases\": 3}").expect("write catalog");

    let output = run(&["--catalog", path_arg(&path), "SELECT |"]);

    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid catalog file"), "stderr: {stderr}");
}
