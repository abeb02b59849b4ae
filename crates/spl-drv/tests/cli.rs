//! End-to-end tests driving the `splc` binary itself: spawn the real
//! binary against a scratch file and assert on stdout/exit code rather
//! than calling library functions directly.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn splc() -> Command {
    Command::new(PathBuf::from(env!("CARGO_BIN_EXE_splc")))
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn minimal_program_compiles_cleanly() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "hello.spl", "glob { } proc { } func { } main { var { } halt }");

    splc().arg(&src).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn check_scopes_reports_acceptance_on_a_clean_program() {
    let dir = TempDir::new().unwrap();
    let src = write_source(
        &dir,
        "clean.spl",
        "glob { count } proc { } func { } main { var { } count = 1; halt }",
    );

    splc()
        .arg(&src)
        .arg("--check-scopes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Variable Naming and Function Naming accepted"));
}

#[test]
fn check_scopes_reports_cross_category_clash() {
    let dir = TempDir::new().unwrap();
    let src = write_source(
        &dir,
        "clash.spl",
        "glob { dup } proc { dup() { local { } halt } } func { } main { var { } halt }",
    );

    splc()
        .arg(&src)
        .arg("--check-scopes")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Naming error(s):"));
}

#[test]
fn type_check_passes_on_a_well_typed_program() {
    let dir = TempDir::new().unwrap();
    let src = write_source(
        &dir,
        "typed.spl",
        "glob { total } proc { } func { } main { var { } total = 1; halt }",
    );

    splc()
        .arg(&src)
        .arg("--type-check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type checking passed"));
}

#[test]
fn undeclared_variable_is_a_naming_error_before_type_checking_runs() {
    let dir = TempDir::new().unwrap();
    let src = write_source(
        &dir,
        "undeclared.spl",
        "glob { } proc { } func { } main { var { } x = 1; halt }",
    );

    splc()
        .arg(&src)
        .arg("--type-check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ndeclared"));
}

#[test]
fn emit_basic_writes_a_numbered_listing_next_to_the_source() {
    let dir = TempDir::new().unwrap();
    let src = write_source(
        &dir,
        "rich.spl",
        "glob { i } proc { } func { } main { var { } i = 3; while ( i > 0 ) { print i; i = ( i minus 1 ) } halt }",
    );

    splc().arg(&src).arg("--emit-basic").assert().success();

    let out = dir.path().join("rich.bas");
    let text = std::fs::read_to_string(out).expect("expected rich.bas to be written");
    assert!(text.starts_with("10 "));
    assert!(text.contains("GOTO"));
}

#[test]
fn emit_basic_honors_the_out_override() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "simple.spl", "glob { } proc { } func { } main { var { } halt }");
    let custom_out = dir.path().join("custom.bas");

    splc()
        .arg(&src)
        .arg("--emit-basic")
        .arg("--out")
        .arg(&custom_out)
        .assert()
        .success();

    assert!(custom_out.exists());
    let text = std::fs::read_to_string(&custom_out).unwrap();
    assert_eq!(text.trim(), "10 STOP");
}

#[test]
fn syntax_error_exits_with_diagnostics_code() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "broken.spl", "glob { } proc { } func { } main { var { } x = }");

    splc().arg(&src).assert().code(1);
}

#[test]
fn missing_input_file_is_an_internal_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does_not_exist.spl");

    splc().arg(&missing).assert().code(2);
}

#[test]
fn print_ast_emits_the_program_tree() {
    let dir = TempDir::new().unwrap();
    let src = write_source(&dir, "ast.spl", "glob { } proc { } func { } main { var { } halt }");

    splc()
        .arg(&src)
        .arg("--print-ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("Program"));
}
