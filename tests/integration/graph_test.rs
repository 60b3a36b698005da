use crate::{fixture_path, json_stdout, repograph};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

fn edge_pairs(report: &Value) -> Vec<(String, String)> {
    report["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["source"].as_str().unwrap().to_string(),
                e["target"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn pair(source: &str, target: &str) -> (String, String) {
    (source.to_string(), target.to_string())
}

#[test]
fn graph_typescript_fixture_json() {
    let home = tempfile::tempdir().unwrap();
    let report = json_stdout(repograph(home.path()).args([
        "graph",
        fixture_path("ts_app").to_str().unwrap(),
        "--quiet",
    ]));

    assert_eq!(report["metadata"]["language"], "javascript");
    assert_eq!(report["metadata"]["method"], "manifest-match");
    assert_eq!(report["metadata"]["confidence"].as_f64(), Some(0.8));
    assert_eq!(report["nodes"].as_array().unwrap().len(), 4);

    let edges = edge_pairs(&report);
    assert_eq!(
        edges,
        vec![
            pair("src/components/App.tsx", "src/components/Button.tsx"),
            pair("src/components/App.tsx", "src/lib/format.ts"),
            pair("src/index.ts", "src/components/App.tsx"),
            pair("src/index.ts", "src/lib/format.ts"),
        ]
    );
    // import + re-export of the same module
    assert_eq!(report["edges"][0]["weight"], 2);
    assert_eq!(report["edges"][0]["lines"], serde_json::json!([1, 3]));
}

#[test]
fn graph_never_includes_vendored_files() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args(["graph", fixture_path("ts_app").to_str().unwrap(), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn graph_python_fixture_json() {
    let home = tempfile::tempdir().unwrap();
    let report = json_stdout(repograph(home.path()).args([
        "graph",
        fixture_path("python_pkg").to_str().unwrap(),
        "--quiet",
    ]));

    assert_eq!(report["metadata"]["language"], "python");
    assert_eq!(report["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(
        edge_pairs(&report),
        vec![
            pair("pkg/__init__.py", "pkg/core.py"),
            pair("pkg/core.py", "pkg/helpers.py"),
            pair("pkg/core.py", "pkg/sub/__init__.py"),
            pair("pkg/sub/worker.py", "pkg/helpers.py"),
        ]
    );
    assert_eq!(report["stats"]["isolated_nodes"], 0);
}

#[test]
fn graph_dot_output() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args([
            "graph",
            fixture_path("ts_app").to_str().unwrap(),
            "--format",
            "dot",
            "--quiet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph dependencies"))
        .stdout(predicate::str::contains(
            "\"src/components/App.tsx\" -> \"src/components/Button.tsx\" [label=\"2 refs\"];",
        ))
        .stdout(predicate::str::contains(
            "\"src/index.ts\" -> \"src/lib/format.ts\";",
        ));
}

#[test]
fn graph_text_output() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args([
            "graph",
            fixture_path("python_pkg").to_str().unwrap(),
            "--format",
            "text",
            "--quiet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Repograph Report"))
        .stdout(predicate::str::contains("Language:   Python (python, manifest-match"))
        .stdout(predicate::str::contains("Most Imported"));
}

#[test]
fn graph_go_repository_falls_back_with_warning() {
    let home = tempfile::tempdir().unwrap();
    let report = json_stdout(repograph(home.path()).args([
        "graph",
        fixture_path("go_module").to_str().unwrap(),
        "--quiet",
    ]));
    assert_eq!(report["metadata"]["language"], "go");
    assert_eq!(report["nodes"][0]["path"], "main.go");
    let warnings = report["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().contains("No import parser for 'go'")));
}

#[test]
fn graph_dot_prints_warnings_to_stderr() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args([
            "graph",
            fixture_path("go_module").to_str().unwrap(),
            "--format",
            "dot",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: No import parser for 'go'"));
}

#[test]
fn graph_max_files_and_excludes() {
    let home = tempfile::tempdir().unwrap();
    let report = json_stdout(repograph(home.path()).args([
        "graph",
        fixture_path("ts_app").to_str().unwrap(),
        "--exclude",
        "src/lib/**",
        "--max-files",
        "2",
        "--quiet",
    ]));
    let paths: Vec<&str> = report["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["src/components/App.tsx", "src/components/Button.tsx"]);
    assert_eq!(report["metadata"]["files_analyzed"], 2);
}

#[test]
fn graph_lang_override_with_no_matching_files_warns() {
    let home = tempfile::tempdir().unwrap();
    let report = json_stdout(repograph(home.path()).args([
        "graph",
        fixture_path("ts_app").to_str().unwrap(),
        "--lang",
        "py",
        "--quiet",
    ]));
    assert_eq!(report["metadata"]["language"], "python");
    assert_eq!(report["metadata"]["method"], "manual-override");
    assert!(report["nodes"].as_array().unwrap().is_empty());
    assert!(report["warnings"][0]
        .as_str()
        .unwrap()
        .contains("No Python source files found"));
}

#[test]
fn graph_reads_project_config_and_env() {
    let home = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    fs::write(repo.path().join("a.py"), "import b\n").unwrap();
    fs::write(repo.path().join("b.py"), "").unwrap();
    fs::write(repo.path().join("c.js"), "").unwrap();
    fs::write(
        repo.path().join(".repograph.toml"),
        "[defaults]\nlang = \"python\"\n",
    )
    .unwrap();

    let report = json_stdout(
        repograph(home.path())
            .env("REPOGRAPH_MAX_FILE_BYTES", "4")
            .args(["graph", repo.path().to_str().unwrap(), "--quiet"]),
    );
    assert_eq!(report["metadata"]["method"], "manual-override");
    // a.py is over the byte cap, so its import is never read
    assert!(report["edges"].as_array().unwrap().is_empty());
    assert_eq!(report["metadata"]["files_skipped"], 1);
    assert_eq!(report["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn graph_missing_path_fails() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args(["graph", "/no/such/repository", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Repository not found"));
}

#[test]
fn graph_invalid_exclude_glob_fails() {
    let home = tempfile::tempdir().unwrap();
    repograph(home.path())
        .args([
            "graph",
            fixture_path("ts_app").to_str().unwrap(),
            "--exclude",
            "src/[",
            "--quiet",
        ])
        .assert()
        .failure();
}

#[test]
fn graph_bad_config_fails() {
    let home = tempfile::tempdir().unwrap();
    let repo = tempfile::tempdir().unwrap();
    fs::write(repo.path().join(".repograph.toml"), "[limits\nmax_files = ").unwrap();
    repograph(home.path())
        .args(["graph", repo.path().to_str().unwrap(), "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}
