//! Feed text in, hook sequence out, through the uniter with a recording runner

use std::io::Cursor;

use relhook::feed::EventFeed;
use relhook::models::hook::HookKind;
use relhook::models::relation::RelationId;
use relhook::orchestrator::runner::RecordedHook;
use relhook::orchestrator::{RecordingRunner, Uniter};
use serde_json::json;

fn plan(feed: &str) -> Vec<RecordedHook> {
    let mut uniter = Uniter::new(RecordingRunner::new());
    uniter
        .run(EventFeed::new(Cursor::new(feed.to_string())))
        .expect("Feed should run");
    uniter.into_runner().into_hooks()
}

fn describe(hooks: &[RecordedHook]) -> Vec<String> {
    hooks
        .iter()
        .map(|hook| format!("{} {}", hook.hook_name(), hook.invocation.unit))
        .collect()
}

#[test]
fn test_join_change_depart_with_settings() {
    let hooks = plan(
        r#"
# two database units come up
{"relation": "db:0", "changed": {"mysql/0": {"version": 1, "settings": {"host": "10.0.0.1"}}, "mysql/1": {"version": 1, "settings": {"host": "10.0.0.2"}}}}
{"relation": "db:0", "departed": ["mysql/0"]}
"#,
    );

    assert_eq!(
        describe(&hooks),
        vec![
            "db-relation-joined mysql/0",
            "db-relation-changed mysql/0",
            "db-relation-joined mysql/1",
            "db-relation-changed mysql/1",
            "db-relation-departed mysql/0",
        ]
    );

    // mysql/1 has not joined yet when mysql/0's hooks run
    assert_eq!(hooks[0].invocation.member_names(), vec!["mysql/0"]);
    assert_eq!(
        hooks[1].invocation.members["mysql/0"].get("host"),
        Some(&json!("10.0.0.1"))
    );

    let departed = &hooks[4].invocation;
    assert_eq!(departed.kind, HookKind::Departed);
    assert_eq!(departed.member_names(), vec!["mysql/1"]);
    assert_eq!(
        departed.members["mysql/1"].get("host"),
        Some(&json!("10.0.0.2"))
    );
}

#[test]
fn test_unit_joining_and_departing_in_one_batch_runs_nothing() {
    let hooks = plan(
        r#"{"relation": "db:0", "changed": {"mysql/0": {"version": 1}}, "departed": ["mysql/0"]}"#,
    );
    assert!(hooks.is_empty());
}

#[test]
fn test_departure_queues_behind_earlier_join() {
    let hooks = plan(
        r#"
{"relation": "db:0", "changed": {"mysql/0": {"version": 12}}}
{"relation": "db:0", "departed": ["mysql/0"], "changed": {"mysql/1": {"version": 1}}}
"#,
    );

    // Changed units are applied before departed ones
    assert_eq!(
        describe(&hooks),
        vec![
            "db-relation-joined mysql/0",
            "db-relation-changed mysql/0",
            "db-relation-joined mysql/1",
            "db-relation-changed mysql/1",
            "db-relation-departed mysql/0",
        ]
    );
}

#[test]
fn test_relations_are_independent() {
    let hooks = plan(
        r#"
{"relation": "website:1", "changed": {"haproxy/0": {"version": 3}}}
{"relation": "db:0", "changed": {"mysql/0": {"version": 1}}}
{"relation": "website:1", "departed": ["haproxy/0"]}
"#,
    );

    let website = RelationId::new("website", 1);
    let per_relation: Vec<String> = hooks
        .iter()
        .filter(|hook| hook.relation == website)
        .map(|hook| hook.invocation.kind.to_string())
        .collect();
    assert_eq!(per_relation, vec!["joined", "changed", "departed"]);
    assert_eq!(hooks.len(), 5);
    assert!(hooks
        .iter()
        .filter(|hook| hook.relation.name == "db")
        .all(|hook| hook.invocation.member_names() == vec!["mysql/0"]));
}

#[test]
fn test_malformed_line_names_its_number() {
    let mut uniter = Uniter::new(RecordingRunner::new());
    let err = uniter
        .run(EventFeed::new(Cursor::new(
            "{\"relation\": \"db:0\", \"changed\": {\"mysql/0\": {\"version\": 1}}}\n{oops\n".to_string(),
        )))
        .unwrap_err();

    assert!(format!("{err:#}").contains("Feed line 2 is malformed"));
    assert_eq!(uniter.runner().hooks().len(), 2);
}
