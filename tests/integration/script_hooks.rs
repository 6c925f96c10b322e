//! Hooks run as real scripts from a temporary charm directory

use std::time::Duration;
use tempfile::TempDir;

use relhook::models::change::RelationChangeBatch;
use relhook::models::relation::RelationId;
use relhook::orchestrator::{read_journal, JournalOutcome, ScriptRunner, Uniter};

use super::helpers::{db_event, hook_log, logging_charm, write_hook};

fn script_uniter(charm: &TempDir) -> Uniter<ScriptRunner> {
    let runner = ScriptRunner::new(charm.path().to_path_buf(), "wordpress/0".to_string())
        .with_timeout(Duration::from_secs(30));
    Uniter::new(runner)
}

#[test]
fn test_hooks_see_relation_members() {
    let charm = logging_charm("db");
    let mut uniter = script_uniter(&charm);

    let summary = uniter
        .run(vec![
            Ok(db_event(RelationChangeBatch::new().change("mysql/0", 1))),
            Ok(db_event(RelationChangeBatch::new().change("mysql/1", 1))),
            Ok(db_event(RelationChangeBatch::new().depart("mysql/0"))),
        ])
        .unwrap();

    assert_eq!(
        hook_log(charm.path()),
        vec![
            "joined mysql/0 [mysql/0]",
            "changed mysql/0 [mysql/0]",
            "joined mysql/1 [mysql/0,mysql/1]",
            "changed mysql/1 [mysql/0,mysql/1]",
            "departed mysql/0 [mysql/1]",
        ]
    );
    assert_eq!(summary.hooks_run, 5);
    assert_eq!(summary.hooks_missing, 0);
}

#[test]
fn test_missing_hooks_are_skipped_and_journaled() {
    let charm = TempDir::new().unwrap();
    let journal = charm.path().join("state").join("journal.jsonl");
    write_hook(charm.path(), "db-relation-joined", "exit 0");

    let mut uniter = script_uniter(&charm).with_journal(journal.clone());
    let summary = uniter
        .run(vec![Ok(db_event(
            RelationChangeBatch::new().change("mysql/0", 1),
        ))])
        .unwrap();

    assert_eq!(summary.hooks_run, 1);
    assert_eq!(summary.hooks_missing, 1);

    let entries = read_journal(&journal, None).unwrap();
    let outcomes: Vec<(String, JournalOutcome)> = entries
        .into_iter()
        .map(|entry| (entry.hook, entry.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("db-relation-joined".to_string(), JournalOutcome::Ok),
            ("db-relation-changed".to_string(), JournalOutcome::Missing),
        ]
    );
}

#[test]
fn test_failing_hook_stops_the_run() {
    let charm = TempDir::new().unwrap();
    let journal = charm.path().join("journal.jsonl");
    write_hook(charm.path(), "db-relation-joined", "echo 'no database' >&2\nexit 1");

    let mut uniter = script_uniter(&charm).with_journal(journal.clone());
    let err = uniter
        .run(vec![
            Ok(db_event(RelationChangeBatch::new().change("mysql/0", 1))),
            Ok(db_event(RelationChangeBatch::new().change("mysql/1", 1))),
        ])
        .unwrap_err();

    assert!(err.to_string().contains("db-relation-joined failed"));

    let entries = read_journal(&journal, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, JournalOutcome::Failed);
    assert_eq!(entries[0].exit_code, Some(1));

    // The second event was never applied
    let queue = uniter.queue(&RelationId::new("db", 0)).unwrap();
    assert!(queue.record("mysql/1").is_none());
    assert_eq!(queue.in_flight().map(|e| e.unit.as_str()), Some("mysql/0"));
}

#[test]
fn test_relation_get_reads_remote_settings() {
    let charm = TempDir::new().unwrap();
    write_hook(
        charm.path(),
        "db-relation-changed",
        &format!(
            "\"{}\" relation-get host >> \"$RELHOOK_CHARM_DIR/hosts.log\"",
            super::helpers::relhook_bin()
        ),
    );

    let mut uniter = script_uniter(&charm);
    uniter
        .run(vec![
            Ok(db_event(RelationChangeBatch::new().change_with(
                "mysql/0",
                1,
                [("host".to_string(), serde_json::json!("10.0.0.1"))]
                    .into_iter()
                    .collect(),
            ))),
            Ok(db_event(RelationChangeBatch::new().change_with(
                "mysql/0",
                2,
                [("host".to_string(), serde_json::json!("10.0.0.9"))]
                    .into_iter()
                    .collect(),
            ))),
        ])
        .unwrap();

    let hosts = std::fs::read_to_string(charm.path().join("hosts.log")).unwrap();
    assert_eq!(hosts.lines().collect::<Vec<_>>(), vec!["10.0.0.1", "10.0.0.9"]);
}
