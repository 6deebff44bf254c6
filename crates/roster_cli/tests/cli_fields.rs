use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn feed_path() -> String {
    workspace_root()
        .join("tests/fixtures/feed.json")
        .to_string_lossy()
        .to_string()
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_roster-decode"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run roster-decode CLI")
}

#[test]
fn cli_prints_outline_with_summary() {
    let path = feed_path();
    let output = run_cli(&[&path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap_or_default();
    assert_eq!(
        first,
        "English roster: 2 factions, 3 sectors, 5 units, 8 loadouts"
    );
    assert!(stdout.contains("1 incidents (see --incidents)"));
    assert!(stdout.contains("PanOceania [1]"));
    assert!(stdout.contains("GUIJIA"));
}

#[test]
fn cli_json_is_machine_readable() {
    let path = feed_path();
    let output = run_cli(&["--json", &path]);
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["language"], "en");
    assert_eq!(value["summary"]["duo_bonds"], 1);
    assert_eq!(value["factions"][1]["name"], "Yu Jing");
}

#[test]
fn cli_prints_single_unit() {
    let path = feed_path();
    let output = run_cli(&["--unit", "230", "--verbose", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("TRINITY"));
    assert!(stdout.contains("Duo #232: 231 + 241"));
}

#[test]
fn cli_unit_json_matches_render() {
    let path = feed_path();
    let output = run_cli(&["--unit", "520", "--json", &path]);
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["ics_name"], "ZHANSHI");
    assert_eq!(value["groups"][0]["stats"]["bs"], Value::Null);
}

#[test]
fn cli_restricts_outline_to_one_faction() {
    let path = feed_path();
    let output = run_cli(&["--faction", "3", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Yu Jing [3]"));
    assert!(!stdout.contains("PanOceania"));
}

#[test]
fn cli_lists_incidents() {
    let path = feed_path();
    let output = run_cli(&["--incidents", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("coordinate=11 kind=malformed_record"));
}

#[test]
fn cli_unknown_unit_exits_with_selection_error() {
    let path = feed_path();
    let output = run_cli(&["--unit", "4242", &path]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no unit with id 4242"));
}

#[test]
fn cli_missing_language_exits_with_parse_error() {
    let path = feed_path();
    let output = run_cli(&["--lang", "fr", &path]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_missing_file_exits_with_read_error() {
    let missing = workspace_root().join("tests/fixtures/does-not-exist.json");
    let missing = missing.to_string_lossy().to_string();
    let output = run_cli(&[&missing]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error reading"));
}

#[test]
fn cli_rejects_unknown_language_code() {
    let path = feed_path();
    let output = run_cli(&["--lang", "de", &path]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid language 'de'"));
}
