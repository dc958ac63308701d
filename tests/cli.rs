#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        fs::write(dir.path().join("config.toml"), "").expect("write config");
        Self { dir }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("TASKFLOW_LOG")
            .arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).output().expect("run");
        assert!(
            output.status.success(),
            "expected success for {:?}: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn stored_tasks(&self) -> Vec<Value> {
        let content = fs::read_to_string(self.data_dir().join("todos")).expect("read todos");
        serde_json::from_str::<Value>(&content)
            .expect("parse todos")
            .as_array()
            .expect("todos is an array")
            .clone()
    }
}

// ─── tasks ─────────────────────────────────────────────────────────

#[test]
fn add_persists_task_at_top() {
    let env = TestEnv::new();
    env.run_ok(&["add", "First"]);
    env.run_ok(&["add", "Second", "-p", "high", "-t", "work", "--due", "2030-01-01"]);

    let tasks = env.stored_tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Second");
    assert_eq!(tasks[0]["priority"], "high");
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["tags"], serde_json::json!(["work"]));
    assert!(tasks[0]["dueDate"].is_string());
    assert!(tasks[0]["completedAt"].is_null());
    assert_eq!(tasks[1]["title"], "First");
}

#[test]
fn add_rejects_empty_title() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be empty"));
}

#[test]
fn list_applies_filters() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Water plants"]);
    env.run_ok(&["add", "File taxes", "-s", "in-progress"]);

    let stdout = env.run_ok(&["list", "--status", "in-progress"]);
    assert!(stdout.contains("File taxes"));
    assert!(!stdout.contains("Water plants"));

    let stdout = env.run_ok(&["list", "--search", "WATER"]);
    assert!(stdout.contains("Water plants"));
    assert!(!stdout.contains("File taxes"));
}

#[test]
fn done_sets_completed_at() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Laundry"]);

    let stdout = env.run_ok(&["done", "laundry"]);
    assert!(stdout.contains("Task completed: Laundry"));

    let tasks = env.stored_tasks();
    assert_eq!(tasks[0]["status"], "completed");
    assert!(tasks[0]["completedAt"].is_string());
}

#[test]
fn edit_back_from_completed_clears_completed_at() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Report"]);
    env.run_ok(&["done", "report"]);
    env.run_ok(&["edit", "report", "--status", "pending"]);

    let tasks = env.stored_tasks();
    assert_eq!(tasks[0]["status"], "pending");
    assert!(tasks[0]["completedAt"].is_null());
}

#[test]
fn ambiguous_reference_lists_candidates() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Buy milk"]);
    env.run_ok(&["add", "Buy bread"]);

    env.cmd()
        .args(["delete", "buy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"))
        .stderr(predicate::str::contains("Buy milk"))
        .stderr(predicate::str::contains("Buy bread"));
    assert_eq!(env.stored_tasks().len(), 2);
}

#[test]
fn clear_completed_and_move() {
    let env = TestEnv::new();
    env.run_ok(&["add", "c"]);
    env.run_ok(&["add", "b"]);
    env.run_ok(&["add", "a"]);
    env.run_ok(&["done", "b"]);
    env.run_ok(&["clear-completed"]);
    env.run_ok(&["move", "a", "2"]);

    let titles: Vec<_> = env
        .stored_tasks()
        .iter()
        .map(|t| t["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["c", "a"]);
}

#[test]
fn stats_json() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Open", "-p", "high"]);
    env.run_ok(&["add", "Closed"]);
    env.run_ok(&["done", "closed"]);

    let stdout = env.run_ok(&["stats", "--json"]);
    let stats: Value = serde_json::from_str(&stdout).expect("stats json");
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["highPriority"], 1);
}

// ─── session ───────────────────────────────────────────────────────

#[test]
fn shell_keeps_undo_history_for_the_session() {
    let env = TestEnv::new();

    env.cmd()
        .arg("shell")
        .write_stdin("add \"Walk the dog\"\ndelete dog\nundo\nlist\nredo\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Undone"))
        .stdout(predicate::str::contains("Walk the dog"))
        .stdout(predicate::str::contains("Redone"));

    assert!(env.stored_tasks().is_empty());
}

#[test]
fn shell_reports_errors_and_keeps_going() {
    let env = TestEnv::new();

    env.cmd()
        .arg("shell")
        .write_stdin("done nothing\nadd Survivor\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"));

    assert_eq!(env.stored_tasks()[0]["title"], "Survivor");
}

#[test]
fn one_shot_undo_has_no_history() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Stays"]);

    let stdout = env.run_ok(&["undo"]);
    assert!(stdout.contains("Nothing to undo"));
    assert_eq!(env.stored_tasks().len(), 1);
}

// ─── transfer ──────────────────────────────────────────────────────

#[test]
fn export_then_import_round_trips() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Keep", "-t", "x"]);
    env.run_ok(&["export", "-o", "backup.json"]);
    let exported = fs::read_to_string(env.dir.path().join("backup.json")).expect("export");

    env.run_ok(&["add", "Discard"]);
    let stdout = env.run_ok(&["import", "backup.json"]);
    assert!(stdout.contains("Imported 1 tasks"));

    env.run_ok(&["export", "-o", "again.json"]);
    let again = fs::read_to_string(env.dir.path().join("again.json")).expect("export");
    assert_eq!(again, exported);
}

#[test]
fn export_defaults_to_dated_file_name() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Something"]);

    let stdout = env.run_ok(&["export"]);
    assert!(stdout.contains("taskflow-export-"));

    let exported = fs::read_dir(env.dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            name.starts_with("taskflow-export-") && name.ends_with(".json")
        });
    assert!(exported);
}

#[test]
fn import_of_non_array_fails_without_changes() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Untouched"]);
    fs::write(env.dir.path().join("bad.json"), r#"{"todos": []}"#).expect("write");

    env.cmd()
        .args(["import", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));

    assert_eq!(env.stored_tasks()[0]["title"], "Untouched");
}

#[test]
fn corrupted_store_starts_empty() {
    let env = TestEnv::new();
    fs::create_dir_all(env.data_dir()).expect("mkdir");
    fs::write(env.data_dir().join("todos"), "not json").expect("write");

    let stdout = env.run_ok(&["list"]);
    assert!(stdout.contains("No tasks yet"));
}

// ─── preferences ───────────────────────────────────────────────────

#[test]
fn accent_is_persisted_as_plain_string() {
    let env = TestEnv::new();
    env.run_ok(&["accent", "teal"]);

    let saved = fs::read_to_string(env.data_dir().join("accent")).expect("read accent");
    assert_eq!(saved, "teal");

    env.cmd().args(["accent", "beige"]).assert().failure();
}

#[test]
fn reset_requires_confirmation() {
    let env = TestEnv::new();
    env.run_ok(&["add", "Precious"]);

    env.cmd()
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    assert_eq!(env.stored_tasks().len(), 1);

    env.run_ok(&["reset", "--yes"]);
    assert!(!env.data_dir().join("todos").exists());
}
