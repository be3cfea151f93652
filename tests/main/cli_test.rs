//! CLI surface tests via the built binary.

use assert_cmd::Command;

#[test]
fn help_lists_primary_subcommands() {
    let mut cmd = Command::cargo_bin("standin").expect("binary should exist");
    let output = cmd.arg("--help").output().expect("help should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start"));
    assert!(stdout.contains("reply"));
}

#[test]
fn version_flag_prints_version() {
    let mut cmd = Command::cargo_bin("standin").expect("binary should exist");
    let output = cmd.arg("--version").output().expect("version should run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("standin").expect("binary should exist");
    let output = cmd.arg("definitely-not-a-command").output().expect("should run");
    assert!(!output.status.success());
}
