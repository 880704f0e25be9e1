#![forbid(unsafe_code)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn config_show_resolves_env() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("mgstat").unwrap();
    cmd.current_dir(dir.path()).env_remove("MGSTAT_CONFIG")
        .arg("config").arg("show")
        .env("MGSTAT_RESULTS_DIR", "/srv/results")
        .env("MGSTAT_LOG_LEVEL", "debug");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"results_dir\": \"/srv/results\""))
        .stdout(predicate::str::contains("\"log_level\": \"debug\""))
        .stdout(predicate::str::contains("aeong_statistics.csv"));
}

#[test]
fn config_show_rejects_bad_level() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("mgstat").unwrap();
    cmd.current_dir(dir.path()).env_remove("MGSTAT_CONFIG")
        .arg("config").arg("show")
        .env("MGSTAT_LOG_LEVEL", "loud");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid log_level"));
}

#[test]
fn write_template_creates_loadable_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mgstat.toml");
    let mut cmd = Command::cargo_bin("mgstat").unwrap();
    cmd.arg("config").arg("write-template").arg("--path").arg(&path);
    cmd.assert().success();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[query]"));
    let cfg = mgstat_core::MgstatConfig::load_from_file(&path).unwrap();
    assert_eq!(cfg, mgstat_core::MgstatConfig::default());
}

#[test]
fn write_template_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mgstat.toml");
    std::fs::write(&path, "keep").unwrap();
    let mut cmd = Command::cargo_bin("mgstat").unwrap();
    cmd.arg("config").arg("write-template").arg("--path").arg(&path);
    cmd.assert().code(2);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");
}

#[test]
fn config_file_is_picked_up_from_working_dir() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("mgstat.toml"), "results_dir = \"/from/file\"\n[target]\nmodel = \"other\"\n").unwrap();
    let mut cmd = Command::cargo_bin("mgstat").unwrap();
    cmd.current_dir(dir.path()).env_remove("MGSTAT_CONFIG").env_remove("MGSTAT_RESULTS_DIR").env_remove("MGSTAT_LOG_LEVEL")
        .arg("config").arg("show");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"results_dir\": \"/from/file\""))
        .stdout(predicate::str::contains("\"model\": \"other\""));
}
