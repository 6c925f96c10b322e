//! Integration tests for relhook
//!
//! These drive the public API and the `relhook` binary end to end: feeds
//! are parsed from JSONL, hooks run as real scripts in a temporary charm
//! directory, and hook tools read the context the runner hands them.

pub mod cli;
pub mod feed_to_hooks;
pub mod helpers;
pub mod script_hooks;
