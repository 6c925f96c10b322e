//! `relhook relation-list` and `relhook relation-get`, run from inside a
//! relation hook.

use anyhow::Result;

use crate::context::HookContext;

pub fn list() -> Result<()> {
    let context = HookContext::from_env()?;
    for unit in context.relation_list() {
        println!("{unit}");
    }
    Ok(())
}

pub fn get(unit: Option<&str>, key: Option<&str>) -> Result<()> {
    let context = HookContext::from_env()?;
    let value = context.relation_get(unit, key)?;
    println!("{}", render_value(&value)?);
    Ok(())
}

/// Strings print bare so hooks can use them directly in shell; anything
/// else prints as JSON.
fn render_value(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string_pretty(other)?),
    }
}
