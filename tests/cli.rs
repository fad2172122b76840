//! End-to-end tests of the `mandala` binary in offline mode.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config and environment.
fn mandala(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mandala").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("MANDALA_API_URL")
        .env_remove("MANDALA_OFFLINE")
        .env_remove("MANDALA_OUTPUT")
        .env_remove("MANDALA_JSON")
        .env_remove("MANDALA_CONFIG")
        .env_remove("MANDALA_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn grids_lists_builtin_ids() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "grids", "-o", "compact"])
        .assert()
        .success()
        .stdout("1\n2\n3\n4\n5\n6\n7\n8\n9\n");
}

#[test]
fn grids_needs_review_filter() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "grids", "--needs-review", "-o", "compact"])
        .assert()
        .success()
        .stdout("2\n6\n8\n9\n");
}

#[test]
fn show_json_has_board_and_detail() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "show", "2", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"board\"").and(predicate::str::contains("\"detail\"")));
}

#[test]
fn show_unknown_grid_is_not_found() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "show", "42"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Grid not found: #42"));
}

#[test]
fn search_by_source() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "search", "coach-sync", "-o", "compact"])
        .assert()
        .success()
        .stdout("seg-co1\n");
}

#[test]
fn search_with_no_match_prints_nothing() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "search", "zzz-no-such-thing", "-o", "compact"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn log_falls_back_to_default_history() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "log", "seg-aw1", "-o", "compact"])
        .assert()
        .success()
        .stdout("inserted\nmerged\n");
}

#[test]
fn ingest_dry_run_splits_blocks() {
    let home = TempDir::new().unwrap();
    let output = mandala(&home)
        .args(["ingest", "--dry-run", "--source", "standup"])
        .write_stdin("first block\n\n\nsecond\nblock\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("manual-") && lines[0].ends_with("-0\tfirst block"));
    assert!(lines[1].ends_with("-1\tsecond block"));
}

#[test]
fn ingest_blank_stdin_is_rejected() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "ingest"])
        .write_stdin("   \n\n")
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Paste transcript text"));
}

#[test]
fn ingest_missing_file_is_not_found() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nope.txt");
    mandala(&home)
        .args(["--offline", "ingest"])
        .arg(&missing)
        .assert()
        .failure()
        .code(3);
}

#[test]
fn ingest_offline_reports_api_error() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--offline", "ingest"])
        .write_stdin("something worth filing")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn config_init_then_path() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("mandala.toml");
    let path_str = path.to_str().unwrap();

    mandala(&home)
        .args(["--config", path_str, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    mandala(&home)
        .args(["--config", path_str, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    mandala(&home)
        .args(["--config", path_str, "config", "init", "--force"])
        .assert()
        .success();

    mandala(&home)
        .args(["--config", path_str, "config", "path", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exists\":true"));
}

#[test]
fn config_show_reflects_api_url_flag() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["--api-url", "http://board.test/api", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://board.test/api"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    mandala(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mandala"));
}
