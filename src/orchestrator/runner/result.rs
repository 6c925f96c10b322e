//! Result types for hook execution

use std::time::Duration;

/// Result of running one hook script
#[derive(Debug, Clone)]
pub struct HookResult {
    pub hook_name: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
    /// Whether the hook was killed for exceeding its timeout
    pub timed_out: bool,
}

impl HookResult {
    pub fn new(
        hook_name: String,
        success: bool,
        stdout: String,
        stderr: String,
        exit_code: Option<i32>,
        duration: Duration,
        timed_out: bool,
    ) -> Self {
        Self {
            hook_name,
            success,
            stdout,
            stderr,
            exit_code,
            duration,
            timed_out,
        }
    }

    /// A successful run with no output, for runners that do not spawn anything.
    pub fn succeeded(hook_name: String) -> Self {
        Self::new(
            hook_name,
            true,
            String::new(),
            String::new(),
            Some(0),
            Duration::ZERO,
            false,
        )
    }

    pub fn summary(&self) -> String {
        let status = if self.timed_out {
            "TIMEOUT"
        } else if self.success {
            "OK"
        } else {
            "FAILED"
        };
        format!(
            "{} - {} ({}ms, exit code: {:?})",
            status,
            self.hook_name,
            self.duration.as_millis(),
            self.exit_code
        )
    }
}

/// What happened when a hook was requested
#[derive(Debug, Clone)]
pub enum HookOutcome {
    /// The script ran (successfully or not)
    Ran(HookResult),
    /// The charm has no script for this hook; treated as success
    Missing { hook_name: String },
}

impl HookOutcome {
    pub fn hook_name(&self) -> &str {
        match self {
            HookOutcome::Ran(result) => &result.hook_name,
            HookOutcome::Missing { hook_name } => hook_name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, HookOutcome::Ran(result) if !result.success)
    }

    pub fn duration(&self) -> Duration {
        match self {
            HookOutcome::Ran(result) => result.duration,
            HookOutcome::Missing { .. } => Duration::ZERO,
        }
    }
}
