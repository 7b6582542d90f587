//! Integration tests for the `field` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the dump, get,
//! and keys subcommands through the actual binary, over stdin and fixture files.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

fn field() -> Command {
    Command::cargo_bin("field").unwrap()
}

fn get(path: &str, coerce: &str) -> assert_cmd::assert::Assert {
    field()
        .args(["get", path, "--as", coerce, "-i", sample_json_path()])
        .assert()
}

// ─────────────────────────────────────────────────────────────────────────────
// Dump subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dump_stdin_to_stdout() {
    field()
        .arg("dump")
        .write_stdin(r#"{"a":1,"b":[-2]}"#)
        .assert()
        .success()
        .stdout(concat!(
            r#"{"type":"map","map_value":{"#,
            r#""a":{"type":"uint","value":1},"#,
            r#""b":{"type":"array","array_value":[{"type":"int","value":-2}]}"#,
            "}}\n"
        ));
}

#[test]
fn dump_pretty_from_file_is_valid_json() {
    let output = field()
        .args(["dump", "--pretty", "-i", sample_json_path()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.lines().count() > 1);
    let dump: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(dump["type"], "map");
    assert_eq!(dump["map_value"]["age"]["type"], "uint");
    assert_eq!(dump["map_value"]["empty"]["type"], "nil");
}

#[test]
fn dump_invalid_json_fails() {
    field()
        .arg("dump")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode JSON input"));
}

#[test]
fn dump_of_bare_null_fails() {
    field()
        .arg("dump")
        .write_stdin("null")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to dump document"))
        .stderr(predicate::str::contains("type == nil"));
}

#[test]
fn missing_input_file_fails() {
    field()
        .args(["dump", "-i", "/nonexistent/field-cli-input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Get subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_coerces_scalars() {
    get("name", "string").success().stdout("张三\n");
    get("age", "int").success().stdout("123\n");
    get("int_maps.int", "int").success().stdout("-1\n");
    get("arr.3", "float").success().stdout("123.22\n");
    get("int_maps.zzz.boo2", "bool").success().stdout("true\n");
    get("age", "string").success().stdout("123\n");
}

#[test]
fn get_defaults_to_subtree_dump() {
    field()
        .args(["get", "int_maps.zzz.Uints.2", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout("{\"type\":\"uint\",\"value\":2020}\n");
}

#[test]
fn get_reads_stdin() {
    field()
        .args(["get", "list.1", "--as", "uint"])
        .write_stdin(r#"{"list":[10,20]}"#)
        .assert()
        .success()
        .stdout("20\n");
}

#[test]
fn get_missing_path_fails_with_prefix() {
    get("arr.9", "json")
        .failure()
        .stderr(predicate::str::contains("Failed to navigate path: arr.9"))
        .stderr(predicate::str::contains("path [arr.9] does not exist"));
}

#[test]
fn get_past_scalar_fails() {
    get("name.first", "string")
        .failure()
        .stderr(predicate::str::contains("cannot be navigated: reached string"));
}

#[test]
fn get_bad_coercion_fails() {
    get("name", "int")
        .failure()
        .stderr(predicate::str::contains("Failed to read value at path: name"))
        .stderr(predicate::str::contains("string cannot convert int64"));
}

#[test]
fn get_rejects_unknown_coercion() {
    get("age", "decimal")
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Keys subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn keys_of_root_map() {
    field()
        .args(["keys", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout("age\narr\nempty\nint_maps\nname\n");
}

#[test]
fn keys_of_nested_array_are_indices() {
    field()
        .args(["keys", "int_maps.zzz.Uints", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout("0\n1\n2\n3\n");
}

#[test]
fn keys_of_scalar_fails() {
    field()
        .args(["keys", "age", "-i", sample_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("holds a uint, which has no keys"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global flags
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbose_logs_to_stderr() {
    field()
        .args(["-v", "keys"])
        .write_stdin(r#"{"k":1}"#)
        .assert()
        .success()
        .stdout("k\n")
        .stderr(predicate::str::contains("decoding input"));
}

#[test]
fn quiet_by_default() {
    field()
        .arg("keys")
        .env_remove("RUST_LOG")
        .write_stdin(r#"{"k":1}"#)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn help_flag_shows_usage() {
    field()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("keys"));
}

#[test]
fn unknown_subcommand_fails() {
    field()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
