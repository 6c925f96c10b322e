//! Hook execution: the uniter loop, hook runners and the hook journal.

pub mod journal;
pub mod runner;
pub mod uniter;

pub use journal::{read_journal, JournalEntry, JournalOutcome};
pub use runner::{HookOutcome, HookResult, HookRunner, RecordingRunner, ScriptRunner};
pub use uniter::{RunSummary, Uniter};
