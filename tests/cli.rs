use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn summary_lists_every_instance() {
    let assets = tempdir().expect("temp assets dir");
    let mut cmd = Command::cargo_bin("countertop").expect("binary exists");
    cmd.arg("--assets").arg(assets.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded scene with 9 instances (4 point lights)"))
        .stdout(contains(" - grater-body (grater, "))
        .stdout(contains("cheesegrater.png"))
        .stdout(contains(" - salt-top (salt-cylinder, "))
        .stdout(contains("LidTexture.png"));
}

#[test]
fn help_prints_usage() {
    let mut cmd = Command::cargo_bin("countertop").expect("binary exists");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Usage: countertop"));
}

#[test]
fn unknown_flag_exits_with_usage() {
    let mut cmd = Command::cargo_bin("countertop").expect("binary exists");
    cmd.arg("--fullscreen");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("Unknown argument: --fullscreen"))
        .stderr(contains("Usage: countertop"));
}

#[test]
fn frame_count_must_be_a_number() {
    let mut cmd = Command::cargo_bin("countertop").expect("binary exists");
    cmd.args(["--frames", "ten", "--summary-only"]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid value for --frames: ten"));
}
