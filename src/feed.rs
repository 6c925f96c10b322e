//! Relation change feed.
//!
//! A feed is newline-delimited JSON, one relation event per line:
//!
//! ```text
//! {"relation": "db:0", "changed": {"mysql/0": {"version": 3, "settings": {"host": "10.0.0.2"}}}}
//! {"relation": "db:0", "departed": ["mysql/1"]}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::models::change::RelationChangeBatch;
use crate::models::relation::RelationId;

/// One batch of changes for one relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEvent {
    pub relation: RelationId,
    #[serde(flatten)]
    pub batch: RelationChangeBatch,
}

impl RelationEvent {
    pub fn new(relation: RelationId, batch: RelationChangeBatch) -> Self {
        Self { relation, batch }
    }

    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize relation event")
    }
}

/// Parse one feed line. Returns `None` for blank and comment lines.
pub fn parse_event_line(line: &str) -> Result<Option<RelationEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let event = serde_json::from_str(trimmed).context("Invalid relation event")?;
    Ok(Some(event))
}

/// Iterator over the events of a feed.
pub struct EventFeed<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> EventFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for EventFeed<R> {
    type Item = Result<RelationEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_number += 1;

            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => match parse_event_line(&line) {
                    Ok(Some(event)) => return Some(Ok(event)),
                    Ok(None) => continue,
                    Err(e) => {
                        return Some(Err(
                            e.context(format!("Feed line {} is malformed", self.line_number))
                        ))
                    }
                },
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e)
                        .context(format!("Failed to read feed line {}", self.line_number))))
                }
            }
        }
    }
}

/// Open a feed file, or standard input when `source` is `-`.
pub fn open_feed(source: &str) -> Result<EventFeed<Box<dyn BufRead>>> {
    let reader: Box<dyn BufRead> = if source == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let path = Path::new(source);
        let file = File::open(path)
            .with_context(|| format!("Failed to open event feed: {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    Ok(EventFeed::new(reader))
}
