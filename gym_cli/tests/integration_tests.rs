//! Integration tests for the gym-buddy binary.
//!
//! These tests verify end-to-end behavior including:
//! - Starting, resuming and switching workouts
//! - Set updates persisted across invocations
//! - Finishing, repeating and exporting history
//! - Rest countdown feedback

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI pointed at `data_dir`, isolated from user config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gym-buddy"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn snapshot(data_dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(data_dir.join("gym-buddy-redux-state"))
        .expect("Failed to read snapshot");
    serde_json::from_str(&raw).expect("Snapshot is not JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("gym-buddy"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength workout session tracker"));
}

#[test]
fn test_plans_lists_catalog() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("plans")
        .assert()
        .success()
        .stdout(predicate::str::contains("workout-upper-body"))
        .stdout(predicate::str::contains("workout-lower-body"))
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_status_without_workout() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workout in progress"));

    // Nothing to persist yet
    assert!(!temp_dir.path().join("gym-buddy-redux-state").exists());
}

#[test]
fn test_start_writes_snapshot() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "workout-upper-body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started Upper Body Strength"))
        .stdout(predicate::str::contains("0/10 sets (0%)"));

    let state = snapshot(data_dir);
    assert_eq!(state["isActive"], true);
    assert_eq!(state["currentWorkout"]["id"], "workout-upper-body");
    assert_eq!(
        state["activeWorkouts"]["workout-upper-body"]["exercises"][0]["setDetails"]
            .as_array()
            .unwrap()
            .len(),
        4
    );
    assert!(state["startTime"].is_i64());
}

#[test]
fn test_unknown_plan_fails() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["start", "workout-cardio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown workout plan"));
}

#[test]
fn test_toggle_persists_across_runs() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();

    cli(data_dir)
        .args(["toggle", "upper-ex-1", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest 1:30 before the next set"));

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/10 sets (10%)"));

    let state = snapshot(data_dir);
    assert_eq!(
        state["currentWorkout"]["exercises"][0]["setDetails"][0]["isCompleted"],
        true
    );
}

#[test]
fn test_weight_then_toggle_counts_volume() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir)
        .args(["weight", "upper-ex-1", "1", "145"])
        .assert()
        .success();
    cli(data_dir)
        .args(["toggle", "upper-ex-1", "1"])
        .assert()
        .success();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Volume: 1160"));
}

#[test]
fn test_non_finite_weight_rejected_and_state_kept() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).arg("finish").assert().success();
    cli(data_dir).args(["start", "workout-lower-body"]).assert().success();
    cli(data_dir).args(["toggle", "lower-ex-1", "1"]).assert().success();

    for bad in ["inf", "NaN"] {
        cli(data_dir)
            .args(["weight", "lower-ex-1", "2", bad])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a finite weight"));
    }

    let state = snapshot(data_dir);
    assert_eq!(state["workoutHistory"].as_array().unwrap().len(), 1);
    assert_eq!(state["currentWorkout"]["id"], "workout-lower-body");
    assert_eq!(
        state["currentWorkout"]["exercises"][0]["setDetails"][0]["isCompleted"],
        true
    );
}

#[test]
fn test_missing_set_is_reported_not_fatal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["toggle", "upper-ex-1", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No set 1 on 'upper-ex-1'"));

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir)
        .args(["reps", "upper-ex-1", "9", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No set 9"));
}

#[test]
fn test_set_zero_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["toggle", "upper-ex-1", "0"])
        .assert()
        .failure();
}

#[test]
fn test_switching_keeps_both_active() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).args(["toggle", "upper-ex-1", "1"]).assert().success();
    cli(data_dir).args(["start", "workout-lower-body"]).assert().success();

    cli(data_dir)
        .arg("active")
        .assert()
        .success()
        .stdout(predicate::str::contains("* workout-lower-body"))
        .stdout(predicate::str::contains("  workout-upper-body  Upper Body Strength  10%"));

    cli(data_dir)
        .args(["start", "workout-upper-body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resumed Upper Body Strength"))
        .stdout(predicate::str::contains("1/10 sets"));
}

#[test]
fn test_finish_and_repeat() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).args(["toggle", "upper-ex-2", "1"]).assert().success();

    cli(data_dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged as workout-upper-body-"))
        .stderr(predicate::str::contains(
            "Great job! You completed 1 sets today!",
        ));

    let state = snapshot(data_dir);
    assert_eq!(state["isActive"], false);
    assert!(state["currentWorkout"].is_null());
    let history_id = state["workoutHistory"][0]["id"].as_str().unwrap().to_string();

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains(history_id.as_str()))
        .stdout(predicate::str::contains("1/10 sets (10%)"));

    cli(data_dir)
        .args(["repeat", history_id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    let state = snapshot(data_dir);
    assert_eq!(state["currentWorkout"]["id"], history_id.as_str());
    assert_eq!(state["workoutHistory"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cancel_leaves_history_alone() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-lower-body"]).assert().success();
    cli(data_dir)
        .arg("cancel")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout cancelled"));

    let state = snapshot(data_dir);
    assert!(state["currentWorkout"].is_null());
    assert_eq!(state["activeWorkouts"], serde_json::json!({}));
    assert_eq!(state["workoutHistory"], serde_json::json!([]));

    cli(data_dir)
        .arg("cancel")
        .assert()
        .success()
        .stderr(predicate::str::contains("No workout in progress"));
}

#[test]
fn test_reset_parked_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).args(["start", "workout-lower-body"]).assert().success();
    cli(data_dir)
        .args(["reset", "workout-upper-body"])
        .assert()
        .success();

    let state = snapshot(data_dir);
    assert!(state["activeWorkouts"].get("workout-upper-body").is_none());
    assert_eq!(state["currentWorkout"]["id"], "workout-lower-body");
}

#[test]
fn test_export_history_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let csv_path = data_dir.join("export").join("sets.csv");

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).args(["toggle", "upper-ex-1", "1"]).assert().success();
    cli(data_dir).args(["toggle", "upper-ex-1", "2"]).assert().success();
    cli(data_dir).arg("finish").assert().success();

    cli(data_dir)
        .arg("history")
        .arg("--export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 sets"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.contains("Bench Press,0,135.0,lbs,8"));

    // A second export replaces the file rather than adding to it
    cli(data_dir)
        .arg("history")
        .arg("--export")
        .arg(&csv_path)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&csv_path).unwrap(), contents);
}

#[test]
fn test_clear_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir).arg("finish").assert().success();
    cli(data_dir)
        .arg("clear-history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 workouts"));

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No finished workouts"));
}

#[test]
fn test_rest_countdown_notifies() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["--tick-ms", "5", "rest", "3"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest 0:01"))
        .stdout(predicate::str::contains("Rest complete"))
        .stderr(predicate::str::contains("Rest Time Over! Time to get back to work!"));
}

#[test]
fn test_toggle_wait_runs_rest() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).args(["start", "workout-upper-body"]).assert().success();
    cli(data_dir)
        .args(["--tick-ms", "1", "toggle", "upper-ex-3", "1", "--wait"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest complete"))
        .stderr(predicate::str::contains("Rest Time Over!"));
}

#[test]
fn test_zero_rest_returns_immediately() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["rest", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rest needed"));
}

#[test]
fn test_prefs_defaults_and_update() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("view: activity"))
        .stdout(predicate::str::contains("theme: dark"));

    cli(data_dir)
        .args(["prefs", "--view", "workout", "--theme", "light"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(data_dir.join("gym-buddy-current-view")).unwrap(),
        "workout"
    );
    cli(data_dir)
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("theme: light"));

    cli(data_dir)
        .args(["prefs", "--theme", "sepia"])
        .assert()
        .failure();
}

#[test]
fn test_coalesced_config_still_persists() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let config_dir = data_dir.join("config").join("gym-buddy");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[persistence]\ncoalesce_ms = 60000\n",
    )
    .unwrap();

    cli(data_dir).args(["start", "workout-lower-body"]).assert().success();
    cli(data_dir).args(["toggle", "lower-ex-1", "1"]).assert().success();
    cli(data_dir).args(["toggle", "lower-ex-1", "2"]).assert().success();

    // Pending snapshots are flushed when the process exits
    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("2/13 sets"));
}
