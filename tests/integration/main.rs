mod detect_test;
mod graph_test;
mod languages_test;

use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary with user-level config isolated to `config_home`.
pub fn repograph(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repograph").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("REPOGRAPH_LANG")
        .env_remove("REPOGRAPH_MAX_FILES")
        .env_remove("REPOGRAPH_MAX_FILE_BYTES");
    cmd
}

pub fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
