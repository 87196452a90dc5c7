use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tikzmill").unwrap()
}

#[test]
fn help_flag_prints_usage_with_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flatten"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn flatten_subcommand_help() {
    cmd()
        .args(["flatten", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn extract_subcommand_help() {
    cmd()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--id"));
}

#[test]
fn batch_subcommand_help() {
    cmd()
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DIR"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn missing_subcommand_fails() {
    cmd().assert().failure();
}

#[test]
fn invalid_format_rejected() {
    cmd()
        .args(["extract", "x.tex", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
