use crate::{fixture_path, json_stdout, repograph};
use predicates::prelude::*;
use std::fs;

#[test]
fn detect_go_manifest() {
    let home = tempfile::tempdir().unwrap();
    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        fixture_path("go_module").to_str().unwrap(),
    ]));
    assert_eq!(detection["language"], "go");
    assert_eq!(detection["method"], "manifest-match");
    assert_eq!(detection["confidence"].as_f64(), Some(0.8));
    assert_eq!(detection["evidence"]["kind"], "manifests");
    assert_eq!(detection["evidence"]["data"], serde_json::json!(["go.mod"]));
}

#[test]
fn detect_stats_outrank_manifests() {
    let home = tempfile::tempdir().unwrap();
    let stats = home.path().join("languages.json");
    fs::write(&stats, r#"{"Python": 900, "TypeScript": 100}"#).unwrap();

    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        fixture_path("ts_app").to_str().unwrap(),
        "--stats",
        stats.to_str().unwrap(),
    ]));
    assert_eq!(detection["language"], "python");
    assert_eq!(detection["method"], "provider-statistics");
    assert_eq!(detection["confidence"].as_f64(), Some(0.9));
}

#[test]
fn detect_unregistered_stats_language_falls_through() {
    let home = tempfile::tempdir().unwrap();
    let stats = home.path().join("languages.json");
    fs::write(&stats, r#"{"Haskell": 5000}"#).unwrap();

    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        fixture_path("ts_app").to_str().unwrap(),
        "--stats",
        stats.to_str().unwrap(),
    ]));
    assert_eq!(detection["language"], "javascript");
    assert_eq!(detection["method"], "manifest-match");
}

#[test]
fn detect_manual_override() {
    let home = tempfile::tempdir().unwrap();
    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        fixture_path("go_module").to_str().unwrap(),
        "--lang",
        "TypeScript",
    ]));
    assert_eq!(detection["language"], "javascript");
    assert_eq!(detection["method"], "manual-override");
    assert_eq!(detection["confidence"].as_f64(), Some(1.0));
}

#[test]
fn detect_env_language() {
    let home = tempfile::tempdir().unwrap();
    let detection = json_stdout(
        repograph(home.path())
            .env("REPOGRAPH_LANG", "ruby")
            .args(["detect", fixture_path("ts_app").to_str().unwrap()]),
    );
    assert_eq!(detection["language"], "ruby");
    assert_eq!(detection["method"], "manual-override");
}

#[test]
fn detect_empty_repository_falls_back_to_javascript() {
    let home = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        repo.path().to_str().unwrap(),
    ]));
    assert_eq!(detection["language"], "javascript");
    assert_eq!(detection["method"], "extension-count");
    assert_eq!(detection["confidence"].as_f64(), Some(0.3));
    assert!(detection.get("evidence").is_none());
}

#[test]
fn detect_extension_counts() {
    let home = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    for name in ["a.rb", "b.rb", "c.py"] {
        fs::write(repo.path().join(name), "").unwrap();
    }
    let detection = json_stdout(repograph(home.path()).args([
        "detect",
        repo.path().to_str().unwrap(),
    ]));
    assert_eq!(detection["language"], "ruby");
    assert_eq!(detection["method"], "extension-count");
}

#[test]
fn detect_unreadable_stats_file_fails() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args([
            "detect",
            fixture_path("ts_app").to_str().unwrap(),
            "--stats",
            "/no/such/languages.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read stats file"));
}
