use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn minstatic(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("minstatic"));
    cmd.env_remove("MINSTATIC_CACHE_ROOT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

fn dir_names(root: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn uri_embeds_existing_generation() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("1467089473")).unwrap();

    let assert = minstatic(temp.path())
        .arg("uri")
        .arg("/min/static/")
        .arg("?b=min/foo&f=hello.js")
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "uri");
    assert_eq!(items[0]["generation"], "1467089473");
    assert_eq!(
        items[0]["uri"],
        "/min/static/1467089473/b=min/foo&f=hello.js"
    );
}

#[test]
fn uri_creates_generation_when_missing() {
    let temp = tempdir().unwrap();

    let assert = minstatic(temp.path())
        .args(["--format", "raw", "uri", "/min/static", "f=a.js"])
        .assert()
        .success();

    let names = dir_names(temp.path());
    assert_eq!(names.len(), 1);
    assert!(names[0].bytes().all(|b| b.is_ascii_digit()));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(stdout.trim(), format!("/min/static/{}/f=a.js", names[0]));
}

#[test]
fn generation_without_create_prints_nothing() {
    let temp = tempdir().unwrap();

    minstatic(temp.path())
        .arg("generation")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dir_names(temp.path()).is_empty());
}

#[test]
fn generation_create_is_idempotent() {
    let temp = tempdir().unwrap();

    let first = minstatic(temp.path())
        .args(["generation", "--create"])
        .assert()
        .success();
    let items = parse_jsonl(&first.get_output().stdout);
    assert_eq!(items[0]["meta"]["created"], true);
    let id = items[0]["generation"].as_str().unwrap().to_string();

    let second = minstatic(temp.path())
        .args(["generation", "--create"])
        .assert()
        .success();
    let items = parse_jsonl(&second.get_output().stdout);
    assert_eq!(items[0]["generation"], id.as_str());
    assert_eq!(items[0]["meta"]["created"], false);

    assert_eq!(dir_names(temp.path()), vec![id]);
}

#[test]
fn flush_removes_generation_tree() {
    let temp = tempdir().unwrap();
    let generation = temp.path().join("1467089473");
    fs::create_dir_all(generation.join("nested/deeper")).unwrap();
    fs::write(generation.join("b=min&f=a.js"), "cached").unwrap();
    fs::write(generation.join("nested/deeper/x.css"), "cached").unwrap();

    let assert = minstatic(temp.path()).arg("flush").assert().success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "flush");
    assert_eq!(items[0]["generation"], "1467089473");
    assert!(dir_names(temp.path()).is_empty());
}

#[test]
fn flush_on_empty_root_is_noop() {
    let temp = tempdir().unwrap();

    minstatic(temp.path())
        .arg("flush")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn parse_outputs_params_and_canonical_query() {
    let temp = tempdir().unwrap();

    let assert = minstatic(temp.path())
        .args(["parse", "z=.css&f=a.js"])
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "query");
    assert_eq!(items[0]["data"]["params"]["f"], "a.js");
    assert_eq!(items[0]["data"]["params"]["z"], ".css");
    assert_eq!(items[0]["data"]["canonical"], "f=a.js&z=.css");
}

#[test]
fn parse_rejects_invalid_extension() {
    let temp = tempdir().unwrap();

    let assert = minstatic(temp.path())
        .args(["parse", "z=.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Query rejected"));

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "error");
    assert_eq!(items[0]["errors"][0]["code"], "invalid_extension");
}

#[test]
fn parse_rejects_unknown_key_without_touching_disk() {
    let temp = tempdir().unwrap();

    minstatic(temp.path())
        .args(["parse", "x=1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown_key"));

    assert!(dir_names(temp.path()).is_empty());
}

#[test]
fn missing_root_fails() {
    let temp = tempdir().unwrap();

    minstatic(&temp.path().join("missing"))
        .args(["uri", "/min/static", "f=a.js"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\":\"read_root\""))
        .stderr(predicate::str::contains("Failed to build cache URI"));
}

#[test]
fn generation_create_reports_existing_as_not_created() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("1467089473")).unwrap();

    let assert = minstatic(temp.path())
        .args(["generation", "--create"])
        .assert()
        .success();

    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["generation"], "1467089473");
    assert_eq!(items[0]["meta"]["created"], false);
}
