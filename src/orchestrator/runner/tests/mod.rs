
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::models::hook::{HookInvocation, HookKind};
use crate::models::settings::{Members, UnitSettings};

/// Write an executable hook script into `<charm_dir>/hooks/`.
pub(super) fn write_hook(charm_dir: &Path, hook_name: &str, body: &str) {
    let hooks_dir = charm_dir.join("hooks");
    fs::create_dir_all(&hooks_dir).unwrap();
    let path = hooks_dir.join(hook_name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

pub(super) fn invocation(kind: HookKind, unit: &str, members: &[(&str, i64)]) -> HookInvocation {
    let members: Members = members
        .iter()
        .map(|(name, version)| (name.to_string(), UnitSettings::new(*version)))
        .collect();
    HookInvocation {
        kind,
        unit: unit.to_string(),
        members,
    }
}
