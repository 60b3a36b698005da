use crate::repograph;
use predicates::prelude::*;

#[test]
fn languages_text_lists_builtins() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .current_dir(home.path())
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("javascript"))
        .stdout(predicate::str::contains("csharp"))
        .stdout(predicate::str::contains("JavaScript/TypeScript"));
}

#[test]
fn languages_json_marks_parsers() {
    let home = tempfile::tempdir().unwrap();
    let output = repograph(home.path())
        .current_dir(home.path())
        .args(["languages", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["id"], "javascript");
    assert_eq!(rows[0]["parser"], true);
    assert_eq!(rows[1]["id"], "python");
    assert_eq!(rows[1]["parser"], true);
    assert_eq!(rows[2]["parser"], false);
}

#[test]
fn languages_include_configured_profiles() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(".repograph.toml"),
        "[[languages]]\nid = \"elixir\"\nname = \"Elixir\"\nextensions = [\"ex\", \"exs\"]\n",
    )
    .unwrap();
    repograph(home.path())
        .current_dir(home.path())
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("elixir"))
        .stdout(predicate::str::contains("ex, exs"));
}
