#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn devhooks(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("devhooks").unwrap();
    cmd.current_dir(dir.path())
        .env("DEVHOOKS_ROOT", dir.path())
        .env_remove("DEVHOOKS_RULES")
        .env_remove("RUST_LOG");
    cmd
}

const RULES: &str = r#"{
    "globalSettings": { "enableAutoActivation": true },
    "rules": {
        "table-design": {
            "priority": "high",
            "reminder": "R1",
            "promptTriggers": { "keywords": ["table"], "intentPatterns": ["(broken"] }
        },
        "al-development-core": { "priority": "critical", "reminder": "R0" }
    }
}"#;

fn write_rules(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(".claude/hooks/config/skill-rules.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn task_folder(dir: &TempDir, name: &str) -> PathBuf {
    let folder = dir.path().join(".claude/active-tasks").join(name);
    std::fs::create_dir_all(&folder).unwrap();
    folder
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ---------------------------------------------------------------------------
// devhooks prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_wraps_structured_envelope() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);
    let prompt = "create a new table for customers";

    let out = devhooks(&dir)
        .arg("prompt")
        .write_stdin(format!(r#"{{"session_id":"abc","prompt":"{prompt}"}}"#))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("CRITICAL INSTRUCTION"));
    assert!(out.contains("Active skills: al-development-core, table-design"));
    assert!(out.ends_with(&format!("USER REQUEST:\n{prompt}")));
}

#[test]
fn prompt_accepts_raw_text() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);

    devhooks(&dir)
        .arg("prompt")
        .write_stdin("explain this codeunit\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("USER REQUEST:\nexplain this codeunit"))
        .stdout(predicate::str::contains("Active skills: al-development-core\n"));
}

#[test]
fn prompt_passes_through_when_disabled() {
    let dir = TempDir::new().unwrap();
    write_rules(
        &dir,
        r#"{ "globalSettings": { "enableAutoActivation": false }, "rules": {} }"#,
    );

    devhooks(&dir)
        .arg("prompt")
        .write_stdin(r#"{"prompt":"create a table"}"#)
        .assert()
        .success()
        .stdout("create a table");
}

#[test]
fn prompt_passes_through_without_rules_file() {
    let dir = TempDir::new().unwrap();

    devhooks(&dir)
        .arg("prompt")
        .write_stdin("create a table")
        .assert()
        .success()
        .stdout("create a table")
        .stderr(predicate::str::contains("failed to load skill rules"));
}

#[test]
fn prompt_passes_through_malformed_rules() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, "{ this is not json");

    devhooks(&dir)
        .arg("prompt")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("hello");
}

#[test]
fn prompt_echoes_invalid_utf8_unchanged() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);
    let input = vec![b't', b'a', 0xff, b'e'];

    devhooks(&dir)
        .arg("prompt")
        .write_stdin(input.clone())
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn prompt_honours_rules_flag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(
        &path,
        "globalSettings:\n  enableAutoActivation: true\n  baseRule: core\nrules:\n  core:\n    priority: low\n",
    )
    .unwrap();

    devhooks(&dir)
        .args(["--rules", path.to_str().unwrap(), "prompt"])
        .write_stdin("anything")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active skills: core"));
}

// ---------------------------------------------------------------------------
// devhooks session-end
// ---------------------------------------------------------------------------

#[test]
fn session_end_updates_active_task_docs() {
    let dir = TempDir::new().unwrap();
    let folder = task_folder(&dir, "customer-rating");
    std::fs::write(folder.join("tasks.md"), "- [ ] Implement customer table\n").unwrap();
    std::fs::write(folder.join("context.md"), "# Context\n").unwrap();
    std::fs::write(
        dir.path().join("Rating.Table.al"),
        "table 50100 \"Customer Rating\" { }",
    )
    .unwrap();

    devhooks(&dir)
        .args([
            "session-end",
            "--file",
            "Rating.Table.al",
            "--narrative",
            "Successfully implemented customer table validation",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Objects captured: 1"))
        .stdout(predicate::str::contains("Tasks closed: 1"))
        .stdout(predicate::str::contains("customer-rating/"));

    let tasks = read(&folder.join("tasks.md"));
    assert!(tasks.starts_with("- [x] Implement customer table"));
    assert_eq!(tasks.matches("_Last auto-updated:").count(), 1);
    assert!(read(&folder.join("context.md")).contains("- Table 50100 \"Customer Rating\""));
}

#[test]
fn session_end_reads_json_from_stdin() {
    let dir = TempDir::new().unwrap();
    let folder = task_folder(&dir, "t1");
    std::fs::write(folder.join("tasks.md"), "- [ ] Fix the posting bug").unwrap();

    let out = devhooks(&dir)
        .args(["--json", "session-end", "--stdin"])
        .write_stdin(r#"{"editedFiles": [], "conversationText": "Fixed the posting bug."}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(report["tasks_toggled"], 1);
    assert_eq!(report["completions"][0], "the posting bug");
    assert!(read(&folder.join("tasks.md")).starts_with("- [x] Fix the posting bug"));
}

#[test]
fn session_end_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let folder = task_folder(&dir, "t1");
    std::fs::write(folder.join("tasks.md"), "- [ ] Fix the posting bug").unwrap();

    devhooks(&dir)
        .args(["session-end", "--dry-run", "--narrative", "Fixed the posting bug."])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert_eq!(read(&folder.join("tasks.md")), "- [ ] Fix the posting bug");
}

#[test]
fn session_end_without_active_task_is_silent() {
    let dir = TempDir::new().unwrap();

    devhooks(&dir)
        .args(["session-end", "--narrative", "Implemented everything"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn session_end_bad_stdin_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    task_folder(&dir, "t1");

    devhooks(&dir)
        .args(["session-end", "--stdin"])
        .write_stdin("not json")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"));
}

// ---------------------------------------------------------------------------
// devhooks rules
// ---------------------------------------------------------------------------

#[test]
fn rules_list_shows_configuration_order() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);

    devhooks(&dir)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("table-design"))
        .stdout(predicate::str::contains("al-development-core (base)"));
}

#[test]
fn rules_check_fails_on_malformed_pattern() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);

    devhooks(&dir)
        .args(["rules", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] table-design"));
}

#[test]
fn rules_match_orders_by_priority() {
    let dir = TempDir::new().unwrap();
    write_rules(&dir, RULES);

    devhooks(&dir)
        .args(["rules", "match", "add", "a", "table"])
        .assert()
        .success()
        .stdout("al-development-core (rank 0)\ntable-design (rank 1)\n");
}

// ---------------------------------------------------------------------------
// devhooks active-task
// ---------------------------------------------------------------------------

#[test]
fn active_task_reports_folder_or_none() {
    let dir = TempDir::new().unwrap();

    devhooks(&dir)
        .arg("active-task")
        .assert()
        .success()
        .stdout("No active task.\n");

    task_folder(&dir, "only-task");
    devhooks(&dir)
        .arg("active-task")
        .assert()
        .success()
        .stdout(predicate::str::contains("only-task"));
}
