//! Integration tests for the `xpibuild` binary.
//!
//! These cover the argument surface and failure exit paths; successful
//! builds are exercised in xpibuild-core against a fixture repository.

#![allow(non_snake_case)]

use std::process::Command;
use tempfile::TempDir;

fn xpibuild() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xpibuild"))
}

#[test]
fn help___lists_options_and_examples() {
    let output = xpibuild().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--branch",
        "--channel",
        "--xpi-suffix",
        "--rdf-suffix",
        "--xpi-dir",
        "--build-suffix",
        "--repo-url",
        "--tmp-dir",
        "--build-dir",
    ] {
        assert!(stdout.contains(flag), "missing {flag}");
    }
    assert!(stdout.contains("Example: xpibuild -b 4.0 -x 4.0.1"));
}

#[test]
fn missing_build_dir___exits_non_zero_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let build_dir = temp_dir.path().join("absent");

    let output = xpibuild()
        .arg("--build-dir")
        .arg(&build_dir)
        .arg("--tmp-dir")
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Build failed"), "{stderr}");
    assert!(stderr.contains("directory not found"), "{stderr}");
}

#[test]
fn unreadable_config___exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();

    let output = xpibuild()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "{stderr}");
}

#[test]
fn unknown_flag___exits_with_usage_error() {
    let output = xpibuild().arg("--no-such-flag").output().unwrap();

    assert_eq!(output.status.code(), Some(2));
}
