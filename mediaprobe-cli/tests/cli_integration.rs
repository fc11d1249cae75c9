use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

const MISSING_LIBRARY: &str = "/surely/this/does/not/exist/libmediainfo.so";

// Helper function to get the path to the compiled binary
fn mediaprobe_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mediaprobe").expect("Failed to find mediaprobe binary");
    cmd.env_remove("MEDIAPROBE_LIBRARY").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    mediaprobe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("info").and(contains("check")));
}

#[test]
fn test_check_with_missing_library_fails() {
    mediaprobe_cmd()
        .args(["check", "--library", MISSING_LIBRARY])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Error:").and(contains("unavailable")));
}

#[test]
fn test_library_from_environment() {
    mediaprobe_cmd()
        .env("MEDIAPROBE_LIBRARY", MISSING_LIBRARY)
        .arg("check")
        .assert()
        .failure()
        .stderr(contains(MISSING_LIBRARY));
}

#[test]
fn test_info_with_missing_library_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("input.mkv");
    std::fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .arg("info")
        .arg(&input)
        .args(["--library", MISSING_LIBRARY])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("MediaInfo library unavailable"));

    Ok(())
}

#[test]
fn test_invalid_parse_speed_is_rejected_before_loading() {
    mediaprobe_cmd()
        .args(["info", "a.mkv", "--parse-speed", "3", "--library", MISSING_LIBRARY])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("parse_speed"));
}

#[test]
fn test_malformed_option_is_a_usage_error() {
    mediaprobe_cmd()
        .args(["info", "a.mkv", "--option", "novalue"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("NAME=VALUE"));
}

#[test]
fn test_unknown_format_is_a_usage_error() {
    mediaprobe_cmd()
        .args(["info", "a.mkv", "--format", "yaml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
#[ignore = "requires libmediainfo"]
fn test_info_parameter_prints_file_size() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("input.bin");
    std::fs::write(&input, vec![0u8; 2048])?;

    mediaprobe_cmd()
        .arg("info")
        .arg(&input)
        .args(["--parameter", "General;%FileSize%"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2048\n"));

    Ok(())
}

#[test]
#[ignore = "requires libmediainfo"]
fn test_info_missing_file_reports_not_found() {
    mediaprobe_cmd()
        .args(["info", "/surely/this/does/not/exist.mkv"])
        .assert()
        .failure()
        .stderr(contains("File not found"));
}
