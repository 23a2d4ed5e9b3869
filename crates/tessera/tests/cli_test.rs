//! Integration tests for the `tessera` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `tessera` binary with env isolation.
///
/// Clears all `TESSERA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tessera_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tessera");
    cmd.env("HOME", "/tmp/tessera-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tessera-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/tessera-cli-test-nonexistent")
        .env_remove("TESSERA_PROFILE")
        .env_remove("TESSERA_SERVER")
        .env_remove("TESSERA_OUTPUT")
        .env_remove("TESSERA_INSECURE")
        .env_remove("TESSERA_TIMEOUT")
        .env_remove("TESSERA_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = tessera_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tessera_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("digital business cards")
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("cards"))
            .and(predicate::str::contains("banners")),
    );
}

#[test]
fn test_version_flag() {
    tessera_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tessera"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tessera_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tessera_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = tessera_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_cards_list_without_config() {
    tessera_cmd()
        .args(["cards", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("server"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_cards_list_with_server_but_no_session() {
    // With --server but no cached tokens the command fails fast with a
    // sign-in hint, before any network traffic.
    let output = tessera_cmd()
        .args(["--server", "https://cards.example.com", "cards", "list"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("login") || text.contains("signed in"),
        "Expected sign-in hint:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = tessera_cmd()
        .args(["--profile", "nonexistent", "whoami"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("nonexistent") || text.contains("profile"),
        "Expected profile error:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = tessera_cmd()
        .args(["--output", "invalid", "cards", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_config_show_without_config_file() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    tessera_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_path_prints_a_path() {
    tessera_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_cards_subcommands_exist() {
    tessera_cmd()
        .args(["cards", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("upload-image")),
        );
}

#[test]
fn test_users_subcommands_exist() {
    tessera_cmd()
        .args(["users", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("register"))
                .and(predicate::str::contains("update"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    tessera_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles")),
        );
}
