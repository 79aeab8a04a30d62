//! Integration tests for the `sd` CLI.
//!
//! Each test creates a temp board directory, runs `sd` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `sd` binary.
fn sd_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("sd");
    path
}

/// Create a minimal test board in the given directory.
fn create_test_board(root: &Path) {
    let stride_dir = root.join("stride");
    fs::create_dir_all(stride_dir.join("attachments")).unwrap();

    fs::write(
        stride_dir.join("config.toml"),
        r#"[board]
name = "Test Board"

[user]
name = "Dana"
"#,
    )
    .unwrap();

    fs::write(
        stride_dir.join("board.json"),
        r#"{
  "schema": 1,
  "activities": [
    {
      "id": "rtu-replacement",
      "name": "RTU Replacement",
      "description": "Fleet-wide unit replacement",
      "start": {"year": 2025, "quarter": 1},
      "target": {"year": 2025, "quarter": 4},
      "status": "On Track",
      "progress": 15,
      "sub_items": [
        {"name": "Technical Specifications", "progress": 20, "completed": false,
         "target": {"year": 2025, "quarter": 2}},
        {"name": "Pilot Installation", "progress": 10, "completed": false,
         "target": {"year": 2025, "quarter": 3}}
      ],
      "notes": [],
      "issues": []
    },
    {
      "id": "operator-training",
      "name": "Operator Training",
      "target": {"year": 2025, "quarter": 3},
      "status": "Not Started",
      "progress": 0,
      "sub_items": [],
      "notes": [],
      "issues": []
    }
  ]
}
"#,
    )
    .unwrap();
}

/// Run `sd` with the given args in the given directory, returning (stdout, stderr, success).
fn run_sd(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sd_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run sd");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `sd` expecting success, return stdout.
fn run_sd_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_sd(dir, args);
    if !success {
        panic!(
            "sd {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_board() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_sd_ok(tmp.path(), &["init", "--name", "Network Upgrades"]);
    assert!(out.contains("Network Upgrades"));
    assert!(tmp.path().join("stride/board.json").exists());
    assert!(tmp.path().join("stride/config.toml").exists());
    assert!(tmp.path().join("stride/attachments").is_dir());
}

#[test]
fn test_init_refuses_existing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_stdout, stderr, success) = run_sd(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_init_sample_board_lists() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_sd_ok(tmp.path(), &["init", "--sample"]);

    let out = run_sd_ok(tmp.path(), &["list"]);
    assert!(out.contains("platform-migration"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["list"]);
    assert!(out.contains("rtu-replacement"));
    assert!(out.contains("operator-training"));
    assert!(out.contains("Q4-2025"));
}

#[test]
fn test_list_json_derives_aggregate() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    // [20, 10] → 15, regardless of the stored value
    assert_eq!(arr[0]["id"], "rtu-replacement");
    assert_eq!(arr[0]["progress"], 15);
    assert_eq!(arr[0]["sub_items"], 2);
}

#[test]
fn test_list_status_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["list", "--status", "not-started"]);
    assert!(out.contains("operator-training"));
    assert!(!out.contains("rtu-replacement"));
}

#[test]
fn test_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["show", "rtu-replacement"]);
    assert!(out.contains("RTU Replacement"));
    assert!(out.contains("Technical Specifications"));
}

#[test]
fn test_show_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_stdout, stderr, success) = run_sd(tmp.path(), &["show", "ghost"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_stats_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["on_track"], 1);
    assert_eq!(parsed["not_started"], 1);
    // effective: [15, 0] → 8
    assert_eq!(parsed["overall_progress"], 8);
}

#[test]
fn test_check_clean_board() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["check", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["valid"], true);
}

#[test]
fn test_check_duplicate_id_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    // Hand-edit a duplicate id in
    let path = tmp.path().join("stride/board.json");
    let mut raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let dup = raw["activities"][0].clone();
    raw["activities"].as_array_mut().unwrap().push(dup);
    fs::write(&path, serde_json::to_string_pretty(&raw).unwrap()).unwrap();

    let (_stdout, stderr, success) = run_sd(tmp.path(), &["check"]);
    assert!(!success);
    assert!(stderr.contains("error"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_activity() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(
        tmp.path(),
        &["add", "Remote Odorization", "--target", "Q4-2025"],
    );
    assert!(out.contains("remote-odorization"));

    let out = run_sd_ok(tmp.path(), &["show", "remote-odorization", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["status"], "Not Started");
    assert_eq!(parsed["progress"], 0);
    assert_eq!(parsed["target"]["year"], 2025);
}

#[test]
fn test_sub_progress_recomputes_aggregate() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(
        tmp.path(),
        &["sub", "progress", "rtu-replacement", "Pilot Installation", "50"],
    );

    let out = run_sd_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    // [20, 50] → 35
    assert_eq!(parsed[0]["progress"], 35);
}

#[test]
fn test_progress_rejected_on_parent() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_stdout, stderr, success) = run_sd(tmp.path(), &["progress", "rtu-replacement", "60"]);
    assert!(!success);
    assert!(stderr.contains("derived"));
}

#[test]
fn test_progress_on_leaf() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(tmp.path(), &["progress", "operator-training", "60"]);
    let out = run_sd_ok(tmp.path(), &["show", "operator-training", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["progress"], 60);
}

#[test]
fn test_note_add_uses_configured_author() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(tmp.path(), &["note", "add", "operator-training", "Kickoff scheduled"]);

    let out = run_sd_ok(tmp.path(), &["show", "operator-training", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let notes = parsed["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["author"], "Dana");
    assert_eq!(notes[0]["edited"], false);
}

#[test]
fn test_note_edit_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(tmp.path(), &["note", "add", "operator-training", "v1"]);
    let out = run_sd_ok(tmp.path(), &["show", "operator-training", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let note_id = parsed["notes"][0]["id"].as_str().unwrap().to_string();

    run_sd_ok(tmp.path(), &["note", "edit", "operator-training", &note_id, "v2"]);
    let out = run_sd_ok(tmp.path(), &["show", "operator-training", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["notes"][0]["content"], "v2");
    assert_eq!(parsed["notes"][0]["edited"], true);

    run_sd_ok(tmp.path(), &["note", "rm", "operator-training", &note_id]);
    let out = run_sd_ok(tmp.path(), &["show", "operator-training", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(parsed["notes"].as_array().unwrap().is_empty());
}

#[test]
fn test_issue_lifecycle() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(
        tmp.path(),
        &["issue", "add", "rtu-replacement", "Vendor slipping", "--severity", "high"],
    );

    let out = run_sd_ok(tmp.path(), &["show", "rtu-replacement", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let issue = &parsed["issues"][0];
    assert_eq!(issue["status"], "Open");
    assert_eq!(issue["severity"], "High");
    let issue_id = issue["id"].as_str().unwrap().to_string();

    run_sd_ok(
        tmp.path(),
        &["issue", "status", "rtu-replacement", &issue_id, "resolved"],
    );
    let out = run_sd_ok(tmp.path(), &["show", "rtu-replacement", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["issues"][0]["status"], "Resolved");
}

#[test]
fn test_mutation_to_unknown_activity_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let before = fs::read_to_string(tmp.path().join("stride/board.json")).unwrap();
    let (_stdout, stderr, success) = run_sd(tmp.path(), &["target", "ghost", "Q4-2025"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
    // tree untouched on failure
    let after = fs::read_to_string(tmp.path().join("stride/board.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_invalid_quarter_label() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let (_stdout, stderr, success) = run_sd(tmp.path(), &["target", "operator-training", "Q5-2025"]);
    assert!(!success);
    assert!(stderr.contains("quarter"));
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[test]
fn test_attach_add_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let file = tmp.path().join("specs.pdf");
    fs::write(&file, b"fake pdf").unwrap();

    run_sd_ok(tmp.path(), &["attach", "add", "rtu-replacement", file.to_str().unwrap()]);

    let out = run_sd_ok(tmp.path(), &["show", "rtu-replacement", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let att = &parsed["attachments"][0];
    assert_eq!(att["name"], "specs.pdf");
    let url = att["url"].as_str().unwrap();
    assert!(tmp.path().join("stride").join(url).exists());
    let att_id = att["id"].as_str().unwrap().to_string();

    run_sd_ok(tmp.path(), &["attach", "rm", "rtu-replacement", &att_id]);
    assert!(!tmp.path().join("stride").join(url).exists());
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn test_report_save_load_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    run_sd_ok(tmp.path(), &["report", "save", "--name", "checkpoint"]);

    // Mutate the live board after saving
    run_sd_ok(
        tmp.path(),
        &["sub", "progress", "rtu-replacement", "Pilot Installation", "90"],
    );

    let out = run_sd_ok(tmp.path(), &["report", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["name"], "checkpoint");
    let report_id = parsed[0]["id"].as_str().unwrap().to_string();

    run_sd_ok(tmp.path(), &["report", "load", &report_id]);

    // The pre-save progress is back
    let out = run_sd_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["progress"], 15);
}

#[test]
fn test_report_export() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out_path = tmp.path().join("report.json");
    run_sd_ok(
        tmp.path(),
        &["report", "export", "--out", out_path.to_str().unwrap()],
    );

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert!(doc["generated"].is_string());
    let activities = doc["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["name"], "RTU Replacement");
    assert!(activities[0]["sub_items"].as_array().unwrap().len() == 2);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_user_show_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_board(tmp.path());

    let out = run_sd_ok(tmp.path(), &["user"]);
    assert_eq!(out.trim(), "Dana");

    run_sd_ok(tmp.path(), &["user", "Alex"]);
    let out = run_sd_ok(tmp.path(), &["user"]);
    assert_eq!(out.trim(), "Alex");
}

#[test]
fn test_board_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let board_root = tmp.path().join("project");
    fs::create_dir_all(&board_root).unwrap();
    create_test_board(&board_root);

    let elsewhere = tmp.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();

    let out = run_sd_ok(&elsewhere, &["-C", board_root.to_str().unwrap(), "list"]);
    assert!(out.contains("rtu-replacement"));
}
