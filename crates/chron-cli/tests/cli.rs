//! E2E tests for the `chron` binary: output modes, config resolution, input
//! files, and error reporting.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn chron_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("chron"));
    cmd.current_dir(dir);
    cmd.env("CHRON_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn json_output(dir: &Path, args: &[&str]) -> Value {
    let output = chron_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("chron should not crash");
    assert!(
        output.status.success(),
        "chron {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// chron libraries
// ---------------------------------------------------------------------------

#[test]
fn libraries_json_has_summary_fields() {
    let dir = TempDir::new().unwrap();
    let json = json_output(dir.path(), &["libraries", "--count", "200", "--seed", "5"]);

    assert_eq!(json["seed"], 5);
    assert_eq!(json["games"], 200);
    assert!(json["duplicates"].is_u64());
    assert!(json["library_count"].as_u64().unwrap() >= 1);
    assert!(json["length_histogram"].is_object());
    assert!(json["longest"].as_array().is_some_and(|l| !l.is_empty()));
}

#[test]
fn libraries_are_reproducible_per_seed() {
    let dir = TempDir::new().unwrap();
    let first = json_output(dir.path(), &["libraries", "--count", "150", "--seed", "11"]);
    let second = json_output(dir.path(), &["libraries", "--count", "150", "--seed", "11"]);
    assert_eq!(first, second);
}

#[test]
fn libraries_text_mode_when_piped() {
    let dir = TempDir::new().unwrap();
    chron_cmd(dir.path())
        .args(["libraries", "--count", "50", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("libraries seed=1 games=50 "))
        .stdout(predicate::str::contains("length len="));
}

#[test]
fn format_env_var_selects_mode() {
    let dir = TempDir::new().unwrap();
    chron_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["libraries", "--count", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chronicle Libraries"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn project_config_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("chron.toml"),
        "[generate]\nseed = 9\ncount = 40\n",
    )
    .unwrap();

    let json = json_output(dir.path(), &["libraries"]);
    assert_eq!(json["seed"], 9);
    assert_eq!(json["games"], 40);

    let json = json_output(dir.path(), &["libraries", "--count", "25"]);
    assert_eq!(json["seed"], 9);
    assert_eq!(json["games"], 25);
}

#[test]
fn broken_config_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("chron.toml"), "[generate\nseed = ").unwrap();

    chron_cmd(dir.path())
        .args(["libraries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E4001]"))
        .stderr(predicate::str::contains("chron.toml"));
}

#[test]
fn missing_config_path_fails() {
    let dir = TempDir::new().unwrap();
    chron_cmd(dir.path())
        .args(["game", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ---------------------------------------------------------------------------
// chron bnet
// ---------------------------------------------------------------------------

#[test]
fn bnet_sample_library_json() {
    let dir = TempDir::new().unwrap();
    let json = json_output(dir.path(), &["bnet", "--memory-time", "2", "--min-freq", "2"]);

    assert_eq!(json["chronicles"], 4);
    assert_eq!(json["high_frequency_arrows"], 10);
    assert_eq!(json["undefined_entries"], 6);
    assert_eq!(
        json["network"]["structure"]["nodes"].as_array().map(Vec::len),
        Some(9)
    );
    let x2 = &json["network"]["cpts"]["X2"]["rows"][0]["entry"];
    assert_eq!(x2["kind"], "counts");
    assert_eq!(x2["values"], serde_json::json!([1, 3]));
    assert!(json.get("dot").is_none());
}

#[test]
fn bnet_text_report_and_dot() {
    let dir = TempDir::new().unwrap();
    chron_cmd(dir.path())
        .args(["bnet", "--dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node: X6"))
        .stdout(predicate::str::contains("parents: [O3, X8, X4]"))
        .stdout(predicate::str::contains("O3 -> X6 [label=3];"))
        .stdout(predicate::str::contains("X2_0 -> O5_0;"));
}

#[test]
fn bnet_reads_input_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, r#"[["A","B","C"],["A","B"],["B","C"],["A","C"]]"#).unwrap();

    let json = json_output(
        dir.path(),
        &["bnet", "--input", "library.json", "--memory-time", "1", "--min-freq", "2"],
    );
    assert_eq!(json["chronicles"], 4);
    let kept: Vec<&Value> = json["arrow_frequencies"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["count"].as_u64() >= Some(2))
        .collect();
    assert_eq!(kept.len(), 2);
}

#[test]
fn bnet_rejects_repeated_frames() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), r#"[["A","B","A"]]"#).unwrap();

    chron_cmd(dir.path())
        .args(["bnet", "--input", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn bnet_rejects_empty_library() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("empty.json"), "[]").unwrap();

    let output = chron_cmd(dir.path())
        .args(["bnet", "--input", "empty.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E2005");
}

#[test]
fn bnet_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), r#"{"not": "a list"}"#).unwrap();

    chron_cmd(dir.path())
        .args(["bnet", "--input", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1003]"));
}

// ---------------------------------------------------------------------------
// chron game
// ---------------------------------------------------------------------------

#[test]
fn game_prints_latex_tables() {
    let dir = TempDir::new().unwrap();
    let json = json_output(dir.path(), &["game", "--seed", "21", "--count", "3"]);

    let games = json["games"].as_array().unwrap();
    assert_eq!(games.len(), 3);
    for game in games {
        let latex = game["latex"].as_str().unwrap();
        assert!(latex.starts_with(r"\setlength\arrayrulewidth{2pt}\begin{tabular}{c|c|c}"));
        assert!(game["moves"].as_array().unwrap().len() >= 5);
    }
    assert!(
        json["table_latex"]
            .as_str()
            .unwrap()
            .starts_with(r"\begin{tabular}{ccc}")
    );
}

#[test]
fn game_zero_count_fails() {
    let dir = TempDir::new().unwrap();
    chron_cmd(dir.path())
        .args(["game", "--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count must be > 0"));
}
