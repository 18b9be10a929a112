/*
 * cli_tests.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! End-to-end tests of the `gsb` binary over the fixture templates.

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn gsb(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gsb"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run gsb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const STORAGE_EXPANSION: &str = "\
fn reset_flag(storage: &mut Storage) { storage.flag = false; }
fn reset_count(storage: &mut Storage) { storage.count = 0; }
fn bump_count(storage: &mut Storage) { storage.count = 10; }
";

#[test]
fn test_expand_decl() {
    let path = fixture("storage.gsb");
    let output = gsb(&["expand", path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), STORAGE_EXPANSION);
}

#[test]
fn test_expand_str_mode() {
    let path = fixture("greeting.gsb");
    let output = gsb(&["expand", "--mode", "str", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\"Hello, Alice!\\nHello, Bob!\"\n");
}

#[test]
fn test_expand_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.rs");
    let path = fixture("storage.gsb");
    let output = gsb(&[
        "expand",
        path.to_str().unwrap(),
        "-o",
        target.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), STORAGE_EXPANSION);
}

#[test]
fn test_check_ok() {
    let path = fixture("storage.gsb");
    let output = gsb(&["check", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("storage.gsb: ok\n"));
}

#[test]
fn test_check_reports_invalid_element() {
    let path = fixture("invalid_element.gsb");
    let output = gsb(&["check", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let text = stderr(&output);
    assert!(text.contains("GSB-4"), "stderr: {text}");
    assert!(text.contains("only string literals and gsb control-flow macros"));
}

#[test]
fn test_expand_reports_diagnostics_as_json() {
    let path = fixture("closure_body.gsb");
    let output = gsb(&["expand", "--format", "json", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["code"], "GSB-1");
    assert_eq!(entries[0]["diagnostic"]["kind"], "must_use_body_block_form");
    assert_eq!(
        entries[0]["help"],
        "move the closure out of the argument list into a trailing block"
    );
    // The closure starts after `gsb_for_each!(["a", "b"], `.
    assert_eq!(entries[0]["range"]["start"]["column"], 26);
}

#[test]
fn test_check_json_when_clean() {
    let path = fixture("greeting.gsb");
    let output = gsb(&["check", "--format", "json", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "[]\n");
}

#[test]
fn test_expansion_that_is_not_rust() {
    let path = fixture("not_rust.gsb");
    let output = gsb(&["expand", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("expanded template is not valid Rust"));

    // The same text is fine as a string.
    let output = gsb(&["expand", "--mode", "str", path.to_str().unwrap()]);
    assert!(output.status.success());
}

#[test]
fn test_missing_file() {
    let output = gsb(&["check", "does-not-exist.gsb"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to read template"));
}
