//! Runs charm hook scripts as child processes

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use super::result::{HookOutcome, HookResult};
use super::HookRunner;
use crate::config::DEFAULT_HOOK_TIMEOUT_SECS;
use crate::context::{HookContext, CONTEXT_ENV};
use crate::models::hook::HookInvocation;
use crate::models::relation::RelationId;

/// Timeout for collecting output from child process pipes
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum captured output per stream (1MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const ETXTBSY: i32 = 26;
const SPAWN_RETRIES: u32 = 5;

/// Runs `<charm_dir>/hooks/<relation>-relation-<kind>` for each hook.
///
/// The script runs in `charm_dir` with these variables set:
/// `RELHOOK_UNIT_NAME`, `RELHOOK_CHARM_DIR`, `RELHOOK_RELATION`,
/// `RELHOOK_RELATION_ID`, `RELHOOK_REMOTE_UNIT`, `RELHOOK_HOOK_KIND` and
/// `RELHOOK_CONTEXT`.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    charm_dir: PathBuf,
    unit_name: String,
    timeout: Duration,
}

impl ScriptRunner {
    pub fn new(charm_dir: PathBuf, unit_name: String) -> Self {
        Self {
            charm_dir,
            unit_name,
            timeout: Duration::from_secs(DEFAULT_HOOK_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn hook_path(&self, hook_name: &str) -> PathBuf {
        self.charm_dir.join("hooks").join(hook_name)
    }

    fn spawn(
        &self,
        script: &Path,
        relation: &RelationId,
        invocation: &HookInvocation,
        context_path: &Path,
    ) -> Result<Child> {
        let mut attempts = 0;
        loop {
            match self.command(script, relation, invocation, context_path).spawn() {
                Err(err) if err.raw_os_error() == Some(ETXTBSY) && attempts < SPAWN_RETRIES => {
                    // Another thread forked while the script was open for writing
                    attempts += 1;
                    thread::sleep(Duration::from_millis(20));
                }
                result => {
                    return result
                        .with_context(|| format!("Failed to spawn hook: {}", script.display()))
                }
            }
        }
    }

    fn command(
        &self,
        script: &Path,
        relation: &RelationId,
        invocation: &HookInvocation,
        context_path: &Path,
    ) -> Command {
        let mut command = Command::new(script);
        command
            .current_dir(&self.charm_dir)
            .env("RELHOOK_UNIT_NAME", &self.unit_name)
            .env("RELHOOK_CHARM_DIR", &self.charm_dir)
            .env("RELHOOK_RELATION", &relation.name)
            .env("RELHOOK_RELATION_ID", relation.to_string())
            .env("RELHOOK_REMOTE_UNIT", &invocation.unit)
            .env("RELHOOK_HOOK_KIND", invocation.kind.to_string())
            .env(CONTEXT_ENV, context_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl HookRunner for ScriptRunner {
    fn run(&mut self, relation: &RelationId, invocation: &HookInvocation) -> Result<HookOutcome> {
        let hook_name = invocation.kind.hook_name(&relation.name);
        let script = self.hook_path(&hook_name);

        if !script.is_file() {
            warn!(hook = %hook_name, remote_unit = %invocation.unit, "Skipped missing hook");
            return Ok(HookOutcome::Missing { hook_name });
        }

        // Kept alive until the hook exits
        let context_file = tempfile::Builder::new()
            .prefix("relhook-context-")
            .suffix(".json")
            .tempfile()
            .context("Failed to create hook context file")?;
        HookContext::new(relation, invocation).write_to(context_file.path())?;

        info!(hook = %hook_name, relation = %relation, remote_unit = %invocation.unit, "Running hook");
        let start = Instant::now();
        let mut child = self.spawn(&script, relation, invocation, context_file.path())?;

        // Drain both pipes while waiting so a chatty hook cannot block on a
        // full pipe buffer
        let stdout_rx = drain_in_background(child.stdout.take());
        let stderr_rx = drain_in_background(child.stderr.take());

        let wait_result = child
            .wait_timeout(self.timeout)
            .with_context(|| format!("Failed to wait for hook: {hook_name}"))?;

        if wait_result.is_none() {
            kill_child_process(&mut child);
        }

        let duration = start.elapsed();
        let stdout = stdout_rx
            .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
            .unwrap_or_else(|_| "[output collection timed out]".to_string());
        let stderr = stderr_rx
            .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
            .unwrap_or_else(|_| "[output collection timed out]".to_string());

        let result = match wait_result {
            Some(status) => HookResult::new(
                hook_name,
                status.success(),
                stdout,
                stderr,
                status.code(),
                duration,
                false,
            ),
            None => {
                warn!(hook = %hook_name, timeout_secs = self.timeout.as_secs(), "Hook timed out");
                HookResult::new(
                    hook_name,
                    false,
                    stdout,
                    format!(
                        "{}\n[Hook killed after {}s timeout]",
                        stderr,
                        self.timeout.as_secs()
                    ),
                    None,
                    duration,
                    true,
                )
            }
        };

        debug!(summary = %result.summary(), "Hook finished");
        Ok(HookOutcome::Ran(result))
    }
}

fn drain_in_background<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_stream_to_string(stream));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

/// Read a stream to string, keeping at most `MAX_OUTPUT_SIZE` bytes.
///
/// Data past the limit is drained and discarded so the child never sees a
/// broken pipe.
fn read_stream_to_string<R: Read>(mut stream: R) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let remaining = MAX_OUTPUT_SIZE.saturating_sub(buf.len());
                let to_copy = n.min(remaining);
                buf.extend_from_slice(&chunk[..to_copy]);
                truncated |= to_copy < n;
            }
            Err(_) => {
                if buf.is_empty() {
                    return "[error reading output]".to_string();
                }
                break;
            }
        }
    }

    if truncated {
        buf.extend_from_slice(b"\n[output truncated at 1MB]");
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn kill_child_process(child: &mut Child) {
    // The process may already have exited
    let _ = child.kill();
    let _ = child.wait();
}
