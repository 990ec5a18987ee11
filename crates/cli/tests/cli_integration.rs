//! CLI integration tests: spawn the `accounts` binary and check exit codes
//! and output.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use accounts_domain::IdentityDeriver;

fn accounts() -> Command {
    let mut cmd = cargo_bin_cmd!("accounts");
    for key in [
        "ACCOUNTS_PORT",
        "ACCOUNTS_API_KEY",
        "ACCOUNTS_LOG_FORMAT",
        "ACCOUNTS_RATE_LIMIT",
        "INTERNAL_API_KEY",
        "DISABLE_IXBRL_VALIDATION",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    accounts()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("derive-id"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn derive_id_prints_store_key() {
    let expected = IdentityDeriver::new().derive("ca-123", "small-full");
    accounts()
        .args(["derive-id", "ca-123", "small-full"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected));
}

#[test]
fn derive_id_json_output() {
    let output = accounts()
        .args(["--output", "json", "derive-id", "ca-123", "approval"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resource_name"], "approval");
    assert_eq!(json["id"], IdentityDeriver::new().derive("ca-123", "approval"));
}

#[test]
fn derive_id_rejects_empty_arguments() {
    accounts()
        .args(["derive-id", "", "small-full"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn check_config_redacts_secrets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accounts.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9090
api_key = "inbound-secret"

[services]
internal_api_key = "outbound-secret"
"#,
    )
    .unwrap();

    accounts()
        .args(["check-config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 9090"))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("inbound-secret").not())
        .stdout(predicate::str::contains("outbound-secret").not());
}

#[test]
fn check_config_applies_environment() {
    let output = accounts()
        .args(["--output", "json", "check-config"])
        .env("DISABLE_IXBRL_VALIDATION", "true")
        .env("ACCOUNTS_RATE_LIMIT", "5")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["filing"]["ixbrl_validation_enabled"], false);
    assert_eq!(json["server"]["rate_limit"], 5);
    assert_eq!(json["server"]["port"], 8080);
}

#[test]
fn malformed_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[server\nport = ").unwrap();

    accounts()
        .args(["check-config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn missing_config_file_fails() {
    accounts()
        .args(["check-config", "--config", "/nonexistent/accounts.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
