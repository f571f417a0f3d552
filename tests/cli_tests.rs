//! CLI integration tests

use predicates::prelude::*;
use std::process::Command;

fn note_scribe_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_note-scribe"))
}

#[test]
fn help_output() {
    assert_cmd::Command::cargo_bin("note-scribe")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown notes"))
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--asr-url"))
        .stdout(predicate::str::contains("--timestamps"))
        .stdout(predicate::str::contains("--language"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn version_output() {
    assert_cmd::Command::cargo_bin("note-scribe")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("note-scribe"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_note_is_a_usage_error() {
    assert_cmd::Command::cargo_bin("note-scribe")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No note given"));
}

#[test]
fn note_without_media_links_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let note = dir.path().join("empty.md");
    std::fs::write(&note, "# A note with no media\n[[other-note]]\n").unwrap();

    let output = note_scribe_bin()
        .arg(note.to_str().unwrap())
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No transcribable files"),
        "got: {}",
        stderr
    );
}

#[test]
fn missing_note_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();

    let output = note_scribe_bin()
        .arg(dir.path().join("absent.md").to_str().unwrap())
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn config_path_command() {
    let output = note_scribe_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("note-scribe"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_get_unknown_key() {
    let output = note_scribe_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let output = note_scribe_bin()
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn config_set_invalid_backend() {
    let dir = tempfile::tempdir().unwrap();
    let output = note_scribe_bin()
        .args(["config", "set", "backend", "carrier-pigeon"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid backend") || stderr.contains("whisper-asr"),
        "got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_timestamp_format() {
    let dir = tempfile::tempdir().unwrap();
    let output = note_scribe_bin()
        .args(["config", "set", "timestamp_format", "H:m"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn config_set_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let set = note_scribe_bin()
        .args(["config", "set", "language", "en"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(
        set.status.success(),
        "set failed: {}",
        String::from_utf8_lossy(&set.stderr)
    );

    let get = note_scribe_bin()
        .args(["config", "get", "language"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    let stdout = String::from_utf8_lossy(&get.stdout);
    assert_eq!(stdout.trim(), "en");
}

#[test]
fn config_set_asr_urls_list() {
    let dir = tempfile::tempdir().unwrap();

    let set = note_scribe_bin()
        .args([
            "config",
            "set",
            "asr_urls",
            "http://a:9000,http://b:9000",
        ])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let get = note_scribe_bin()
        .args(["config", "get", "asr_urls"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&get.stdout);
    assert_eq!(stdout.trim(), "http://a:9000,http://b:9000");
}

#[test]
fn config_token_is_masked_on_get() {
    let dir = tempfile::tempdir().unwrap();

    note_scribe_bin()
        .args(["config", "set", "cloud.access_token", "abcdefghijklmnop"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    let get = note_scribe_bin()
        .args(["config", "get", "cloud.access_token"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&get.stdout);
    assert_eq!(stdout.trim(), "abcd...mnop");
}

#[test]
fn config_init_then_list() {
    let dir = tempfile::tempdir().unwrap();

    let init = note_scribe_bin()
        .args(["config", "init"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(
        init.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&init.stderr)
    );

    let list = note_scribe_bin()
        .args(["config", "list"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(list.status.success());
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("backend"));
    assert!(stdout.contains("whisper-asr"));
    assert!(stdout.contains("asr_urls"));

    // Re-init must refuse to overwrite
    let again = note_scribe_bin()
        .args(["config", "init"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(!again.status.success());
}
