//! The `relhook` binary

use std::fs;
use std::process::{Command, Stdio};
use tempfile::TempDir;

use relhook::models::change::RelationChangeBatch;

use super::helpers::{db_event, hook_log, logging_charm, relhook_bin, write_feed};

fn relhook(dir: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(relhook_bin())
        .args(args)
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("RELHOOK_CONTEXT")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run relhook")
}

#[test]
fn test_plan_prints_hook_sequence() {
    let dir = TempDir::new().unwrap();
    let feed = write_feed(
        dir.path(),
        &[
            db_event(RelationChangeBatch::new().change("mysql/0", 1)),
            db_event(RelationChangeBatch::new().depart("mysql/0")),
        ],
    );

    let output = relhook(&dir, &["plan", "--events", feed.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let joined = stdout.find("db-relation-joined").unwrap();
    let changed = stdout.find("db-relation-changed").unwrap();
    let departed = stdout.find("db-relation-departed").unwrap();
    assert!(joined < changed && changed < departed);
}

#[test]
fn test_run_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let charm = logging_charm("db");
    let journal = dir.path().join("journal.jsonl");
    fs::write(
        dir.path().join("relhook.toml"),
        format!(
            "unit = \"wordpress/0\"\ncharm_dir = \"{}\"\njournal = \"{}\"\n\n[[relations]]\nname = \"db\"\nid = 0\n",
            charm.path().display(),
            journal.display()
        ),
    )
    .unwrap();
    let feed = write_feed(
        dir.path(),
        &[db_event(RelationChangeBatch::new().change("mysql/0", 1))],
    );

    let output = relhook(&dir, &["run", "--events", feed.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        hook_log(charm.path()),
        vec!["joined mysql/0 [mysql/0]", "changed mysql/0 [mysql/0]"]
    );

    let output = relhook(&dir, &["journal", "--last", "1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("db-relation-changed"));
    assert!(!stdout.contains("db-relation-joined"));
}

#[test]
fn test_run_rejects_undeclared_relation() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("relhook.toml"),
        "[[relations]]\nname = \"website\"\nid = 1\n",
    )
    .unwrap();
    let feed = write_feed(
        dir.path(),
        &[db_event(RelationChangeBatch::new().change("mysql/0", 1))],
    );

    let output = relhook(&dir, &["run", "--events", feed.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not declared"));
}

#[test]
fn test_relation_tools_need_a_hook_context() {
    let dir = TempDir::new().unwrap();
    let output = relhook(&dir, &["relation-list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("RELHOOK_CONTEXT is not set"));
}
