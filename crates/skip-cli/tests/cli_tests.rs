//! Integration tests for the `skipdays` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to exercise the resolve, check, and
//! holidays subcommands through the actual binary.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn skipdays() -> Command {
    let mut cmd = Command::cargo_bin("skipdays").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// resolve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_with_inline_blocked_lines() {
    skipdays()
        .args([
            "resolve",
            "--start",
            "2011-07-01",
            "--days",
            "30",
            "-b",
            "Independence Day",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("end:     2011-08-01"))
        .stdout(predicate::str::contains("skipped: 1"))
        .stdout(predicate::str::contains("  2011-07-04"));
}

#[test]
fn resolve_with_blocked_file_groups_runs() {
    skipdays()
        .args(["resolve", "-s", "7/1/2011", "-n", "30", "--blocked-file"])
        .arg(fixture("july.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("end:     2011-08-16"))
        .stdout(predicate::str::contains("skipped: 16"))
        .stdout(predicate::str::contains("2011-07-02 to 2011-07-04"));
}

#[test]
fn resolve_reads_blocked_lines_from_stdin() {
    skipdays()
        .args(["resolve", "--start", "2011-07-01", "--days", "30", "--blocked-file", "-"])
        .write_stdin("RRULE:FREQ=WEEKLY;BYDAY=SA,SU\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("end:     2011-08-12"));
}

#[test]
fn resolve_json_output() {
    let output = skipdays()
        .args(["resolve", "--start", "2011-07-01", "--days", "30", "--json"])
        .args(["-b", "Independence Day"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["start"], "2011-07-01");
    assert_eq!(value["end"], "2011-08-01");
    assert_eq!(value["days"], 30);
    assert_eq!(value["skipped"], serde_json::json!(["2011-07-04"]));
    assert_eq!(value["bad_formats"], serde_json::json!({}));
}

#[test]
fn resolve_from_config_file() {
    skipdays()
        .args(["resolve", "--days", "30", "--config"])
        .arg(fixture("options.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("start:   2011-07-01"))
        .stdout(predicate::str::contains("end:     2011-08-16"));
}

#[test]
fn start_flag_overrides_config_start() {
    skipdays()
        .args(["resolve", "--days", "0", "--start", "2011-07-05", "--config"])
        .arg(fixture("options.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("end:     2011-07-05"));
}

#[test]
fn resolve_warns_about_unrecognized_lines_but_succeeds() {
    skipdays()
        .args(["resolve", "--start", "2011-07-01", "--days", "30"])
        .args(["-b", "Independence Day", "-b", "someday soon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("end:     2011-08-01"))
        .stderr(predicate::str::contains("someday soon"));
}

#[test]
fn resolve_defaults_to_today() {
    skipdays()
        .args(["resolve", "--days", "0", "--timezone", "UTC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: 0"));
}

#[test]
fn negative_days_fails() {
    skipdays()
        .args(["resolve", "--start", "2011-07-01", "--days", "-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must provide integer >= 0"));
}

#[test]
fn invalid_start_date_fails() {
    skipdays()
        .args(["resolve", "--start", "someday", "--days", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid start date"));
}

#[test]
fn unknown_timezone_fails() {
    skipdays()
        .args(["resolve", "--days", "3", "--timezone", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time zone"));
}

#[test]
fn non_object_config_fails() {
    let path = std::env::temp_dir().join("skipdays-test-array-config.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    skipdays()
        .args(["resolve", "--days", "3", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("options must be a key/value mapping"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_blocked_file_fails() {
    skipdays()
        .args(["resolve", "--start", "2011-07-01", "--days", "3"])
        .args(["--blocked-file", "/nonexistent/path/blocked.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check and holidays
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_clean_file_succeeds() {
    skipdays()
        .args(["check", "-i"])
        .arg(fixture("july.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("recognized: 3"))
        .stdout(predicate::str::contains("unrecognized: 0"));
}

#[test]
fn check_reports_bad_lines_and_exits_nonzero() {
    skipdays()
        .args(["check", "-i"])
        .arg(fixture("mixed.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("recognized: 1"))
        .stdout(predicate::str::contains("unrecognized: 2"))
        .stdout(predicate::str::contains("not a real date"))
        .stdout(predicate::str::contains("RRULE:FREQ=SOMETIMES"));
}

#[test]
fn check_reads_stdin() {
    skipdays()
        .arg("check")
        .write_stdin("Labor Day\n12/25\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("recognized: 2"));
}

#[test]
fn holidays_lists_known_names() {
    skipdays()
        .arg("holidays")
        .assert()
        .success()
        .stdout(predicate::str::contains("Independence Day"))
        .stdout(predicate::str::contains("Thanksgiving"))
        .stdout(predicate::str::contains("Labor Day"));
}

#[test]
fn no_subcommand_fails_with_usage() {
    skipdays()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
