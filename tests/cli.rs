use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to a fixture file
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Create a command for running the yyt binary with a clean environment
fn yyt_cmd() -> Command {
    let mut cmd = Command::cargo_bin("yyt").expect("Failed to find yyt binary");
    cmd.env_remove("YYT_OUT_FORMAT")
        .env_remove("YYT_IN_FORMAT")
        .env_remove("YYT_LOG");
    cmd
}

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json output")
}

#[test]
fn merges_files_in_order() {
    let assert = yyt_cmd()
        .arg(fixture("data.yaml"))
        .arg(fixture("data2.yaml"))
        .arg("--out-format")
        .arg("json")
        .assert()
        .success();

    let merged = parse_json(&assert.get_output().stdout);
    assert_eq!(
        merged,
        json!({
            "version": "2.0",
            "object": {
                "member1": "A2",
                "member2": "B1",
                "member3": "C2",
                "array": ["item1", "item2", "item1", "item3"]
            }
        })
    );
}

#[test]
fn yaml_output_starts_with_document_marker() {
    yyt_cmd()
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("member1: A1"));
}

#[test]
fn selects_node_by_path() {
    yyt_cmd()
        .arg("--node")
        .arg("object/array/1")
        .arg("-f")
        .arg("raw")
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("item2\n");
}

#[test]
fn selects_node_after_merge() {
    yyt_cmd()
        .args(["-n", "object/array", "-f", "json"])
        .arg(fixture("data.yaml"))
        .arg(fixture("data2.yaml"))
        .assert()
        .success()
        .stdout("[\"item1\",\"item2\",\"item1\",\"item3\"]\n");
}

#[test]
fn mixes_yaml_and_json_inputs() {
    let assert = yyt_cmd()
        .args(["-n", "object", "-f", "json"])
        .arg(fixture("data.yaml"))
        .arg(fixture("override.json"))
        .assert()
        .success();

    let object = parse_json(&assert.get_output().stdout);
    assert_eq!(object["member2"], json!("B3"));
    assert_eq!(object["extra"], json!([1, 2]));
    assert_eq!(object["member1"], json!("A1"));
}

#[test]
fn type_mismatch_fails_with_document_name() {
    yyt_cmd()
        .arg(fixture("data.yaml"))
        .arg(fixture("unmergeable.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unmergeable.yaml"))
        .stderr(predicate::str::contains("/object/array"));
}

#[test]
fn missing_key_fails() {
    yyt_cmd()
        .args(["--no-color", "-n", "object/missing"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("key `missing` not found"));
}

#[test]
fn out_of_bounds_index_fails() {
    yyt_cmd()
        .args(["-n", "object/array/56"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

#[test]
fn invalid_index_fails() {
    yyt_cmd()
        .args(["-n", "object/array/xyz"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid sequence index `xyz`"));
}

#[test]
fn reads_stdin_when_no_file_given() {
    yyt_cmd()
        .args(["-n", "a/b", "-f", "raw"])
        .write_stdin("a:\n  b: from-stdin\n")
        .assert()
        .success()
        .stdout("from-stdin\n");
}

#[test]
fn multi_document_stream_is_merged() {
    yyt_cmd()
        .args(["-f", "json"])
        .write_stdin("a: 1\nl: [x]\n---\na: 2\nl: [y]\n")
        .assert()
        .success()
        .stdout("{\"a\":2,\"l\":[\"x\",\"y\"]}\n");
}

#[test]
fn empty_input_is_an_error() {
    yyt_cmd()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no document to process"));
}

#[test]
fn exec_renders_template() {
    yyt_cmd()
        .args(["-e", "version={{ .version }} first={{ .object.array.0 }}"])
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("version=1.0 first=item1");
}

#[test]
fn exec_uses_selected_node_as_context() {
    yyt_cmd()
        .args(["-n", "object", "-e", "{{ .member2 }}"])
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("B1");
}

#[test]
fn execfile_renders_template_file() {
    yyt_cmd()
        .arg("--execfile")
        .arg(fixture("greeting.tmpl"))
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("A1 / item1\n");
}

#[test]
fn template_with_unknown_path_fails() {
    yyt_cmd()
        .args(["-e", "{{ .nope }}"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("{{ .nope }}"));
}

#[test]
fn writes_to_out_file() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("merged.json");

    yyt_cmd()
        .arg("--out")
        .arg(&out)
        .args(["-f", "json", "--pretty"])
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("  \"version\": \"1.0\""));
}

#[test]
fn failed_render_leaves_out_file_untouched() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("keep.yaml");
    fs::write(&out, "precious: data\n").unwrap();

    yyt_cmd()
        .arg("--out")
        .arg(&out)
        .args(["-e", "{{ .nope }}"])
        .write_stdin("a: 1\n")
        .assert()
        .failure()
        .code(1);

    assert_eq!(fs::read_to_string(&out).unwrap(), "precious: data\n");
}

#[test]
fn yaml_merge_keys_are_expanded() {
    let assert = yyt_cmd()
        .args(["-n", "derived", "-f", "json"])
        .write_stdin("base: &b {x: 1}\nderived:\n  <<: *b\n  y: 2\n")
        .assert()
        .success();

    let derived = parse_json(&assert.get_output().stdout);
    assert_eq!(derived, json!({"x": 1, "y": 2}));
}

#[test]
fn out_format_from_environment() {
    yyt_cmd()
        .env("YYT_OUT_FORMAT", "json")
        .args(["-n", "version"])
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("\"1.0\"\n");
}

#[test]
fn unknown_out_format_fails() {
    yyt_cmd()
        .args(["-f", "xml"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn missing_file_fails() {
    let temp = tempdir().unwrap();
    yyt_cmd()
        .arg(temp.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading"));
}

#[test]
fn malformed_yaml_fails() {
    let temp = tempdir().unwrap();
    let bad = temp.path().join("bad.yaml");
    fs::write(&bad, "a: [1, 2\n").unwrap();

    yyt_cmd()
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error unmarshalling"));
}

#[test]
fn exec_and_execfile_conflict() {
    yyt_cmd()
        .args(["-e", "x", "--execfile", "t.tmpl"])
        .arg(fixture("data.yaml"))
        .assert()
        .failure()
        .code(2);
}

#[test]
fn verbose_logs_to_stderr_only() {
    yyt_cmd()
        .args(["-v", "--no-color", "-n", "version", "-f", "raw"])
        .arg(fixture("data.yaml"))
        .assert()
        .success()
        .stdout("1.0\n")
        .stderr(predicate::str::contains("merging document"));
}
