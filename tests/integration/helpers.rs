//! Shared helpers for building charm directories and feeds

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use relhook::feed::RelationEvent;
use relhook::models::change::RelationChangeBatch;
use relhook::models::relation::RelationId;

/// Path of the built `relhook` binary.
pub fn relhook_bin() -> &'static str {
    env!("CARGO_BIN_EXE_relhook")
}

/// Create an executable hook script in `<charm_dir>/hooks/`.
pub fn write_hook(charm_dir: &Path, hook_name: &str, body: &str) {
    let hooks_dir = charm_dir.join("hooks");
    fs::create_dir_all(&hooks_dir).expect("Failed to create hooks dir");
    let path = hooks_dir.join(hook_name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write hook");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make hook executable");
}

/// A charm whose joined/changed/departed hooks for `relation` append
/// `<kind> <remote unit> [<comma-separated relation-list output>]` to `hooks.log`.
pub fn logging_charm(relation: &str) -> TempDir {
    let charm = TempDir::new().expect("Failed to create charm dir");
    let body = format!(
        "members=$(\"{}\" relation-list | paste -sd, -)\n\
         echo \"$RELHOOK_HOOK_KIND $RELHOOK_REMOTE_UNIT [$members]\" >> \"$RELHOOK_CHARM_DIR/hooks.log\"",
        relhook_bin()
    );
    for kind in ["joined", "changed", "departed"] {
        write_hook(
            charm.path(),
            &format!("{relation}-relation-{kind}"),
            &body,
        );
    }
    charm
}

/// Lines written by the hooks of a [`logging_charm`].
pub fn hook_log(charm_dir: &Path) -> Vec<String> {
    let path = charm_dir.join("hooks.log");
    if !path.exists() {
        return Vec::new();
    }
    fs::read_to_string(path)
        .expect("Failed to read hook log")
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Write `events` to a JSONL feed file inside `dir`.
pub fn write_feed(dir: &Path, events: &[RelationEvent]) -> PathBuf {
    let path = dir.join("events.jsonl");
    let lines: Vec<String> = events
        .iter()
        .map(|event| event.to_json_line().expect("Failed to serialize event"))
        .collect();
    fs::write(&path, lines.join("\n") + "\n").expect("Failed to write feed");
    path
}

pub fn db_event(batch: RelationChangeBatch) -> RelationEvent {
    RelationEvent::new(RelationId::new("db", 0), batch)
}
