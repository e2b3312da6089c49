//! Behavioral specifications for the tl CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes. Anything long-running (steady-state
//! tailing) is covered by the engine's unit tests instead; here the
//! `--once` mode keeps every invocation bounded.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn tl() -> Command {
    Command::cargo_bin("tl").unwrap()
}

// ==================== cli surface ====================

#[test]
fn help_lists_the_commands() {
    tl().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("follow"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn follow_requires_at_least_one_source() {
    tl().arg("follow").assert().failure();
}

// ==================== follow ====================

#[test]
fn follow_once_from_start_emits_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alpha").unwrap();
    writeln!(file, "beta").unwrap();

    tl().arg("follow")
        .arg(file.path())
        .args(["--once", "--from-start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"));
}

#[test]
fn follow_once_without_from_start_emits_nothing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "already there").unwrap();

    tl().arg("follow")
        .arg(file.path())
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn follow_honors_a_small_batch_size() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..5 {
        writeln!(file, "line{i}").unwrap();
    }

    tl().arg("follow")
        .arg(file.path())
        .args(["--once", "--from-start", "--batch-size", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("line0"))
        .stdout(predicate::str::contains("line4"));
}

#[test]
fn follow_rejects_an_unsupported_encoding() {
    let file = tempfile::NamedTempFile::new().unwrap();

    tl().arg("follow")
        .arg(file.path())
        .args(["--once", "--encoding", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported encoding"));
}

#[test]
fn follow_reports_a_missing_file_inline() {
    tl().args(["follow", "/no/such/file.log", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error opening file"));
}

// ==================== run ====================

#[test]
fn run_fails_on_a_missing_config() {
    tl().args(["run", "/no/such/config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

#[test]
fn run_fails_on_a_config_without_targets() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tl.toml");
    std::fs::write(&config, "tree = \"etc/tree.cfg\"\n").unwrap();

    tl().arg("run")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no targets"));
}

#[test]
fn run_fails_on_unknown_config_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tl.toml");
    std::fs::write(&config, "[[target]]\nsource = \"/tmp/a\"\nbogus = 1\n").unwrap();

    tl().arg("run")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
