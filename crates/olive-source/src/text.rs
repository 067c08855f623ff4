//! Plain-text ancestry format.
//!
//! Records look like commit object headers, one header per line, with a
//! blank line between records:
//!
//! ```text
//! commit r3
//! parent r2
//! parent feature-1
//! committer Jane Doe <jane@example.com>
//! timestamp 1700000000 3600
//! message Merge feature work
//! ```
//!
//! `parent` may repeat and keeps its order. Lines starting with `#` are
//! comments. A parent that never gets its own `commit` record is a ghost.

use std::collections::HashSet;
use std::path::Path;

use crate::{RevisionId, RevisionMeta, SourceError};

/// One parsed `commit` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRecord {
    pub id: RevisionId,
    pub parents: Vec<RevisionId>,
    pub meta: Option<RevisionMeta>,
}

impl RevisionRecord {
    pub fn new(id: impl Into<RevisionId>, parents: Vec<RevisionId>) -> Self {
        Self {
            id: id.into(),
            parents,
            meta: None,
        }
    }
}

/// Parse every record in `input`, in file order.
pub fn parse_records(input: &str) -> Result<Vec<RevisionRecord>, SourceError> {
    let mut records = Vec::new();
    let mut seen: HashSet<RevisionId> = HashSet::new();
    let mut current: Option<RevisionRecord> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        // Indentation carries no meaning.
        let line = raw.trim();

        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if let Some(record) = current.take() {
                records.push(record);
            }
            continue;
        }

        let (keyword, value) = match line.split_once(' ') {
            Some((k, v)) => (k, v.trim()),
            None => (line, ""),
        };

        if keyword == "commit" {
            if value.is_empty() {
                return Err(parse_error(line_no, "commit without an id"));
            }
            if let Some(record) = current.take() {
                records.push(record);
            }
            let id = RevisionId::from(value);
            if !seen.insert(id.clone()) {
                return Err(parse_error(line_no, format!("duplicate commit {}", id)));
            }
            current = Some(RevisionRecord::new(id, Vec::new()));
            continue;
        }

        let record = current
            .as_mut()
            .ok_or_else(|| parse_error(line_no, format!("'{}' outside a commit record", keyword)))?;

        match keyword {
            "parent" => {
                if value.is_empty() {
                    return Err(parse_error(line_no, "parent without an id"));
                }
                record.parents.push(RevisionId::from(value));
            }
            "committer" => {
                record.meta.get_or_insert_with(RevisionMeta::default).committer = value.to_owned();
            }
            "message" => {
                record.meta.get_or_insert_with(RevisionMeta::default).message = value.to_owned();
            }
            "timestamp" => {
                let (timestamp, timezone) = parse_timestamp(value)
                    .ok_or_else(|| parse_error(line_no, format!("bad timestamp '{}'", value)))?;
                let meta = record.meta.get_or_insert_with(RevisionMeta::default);
                meta.timestamp = timestamp;
                meta.timezone = timezone;
            }
            other => return Err(parse_error(line_no, format!("unknown header '{}'", other))),
        }
    }

    if let Some(record) = current.take() {
        records.push(record);
    }
    Ok(records)
}

/// Read and parse a file in the text format.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RevisionRecord>, SourceError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_records(&content)
}

fn parse_timestamp(value: &str) -> Option<(i64, i32)> {
    let mut parts = value.split_whitespace();
    let timestamp = parts.next()?.parse().ok()?;
    let timezone = match parts.next() {
        Some(tz) => tz.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((timestamp, timezone))
}

fn parse_error(line: usize, message: impl Into<String>) -> SourceError {
    SourceError::Parse {
        line,
        message: message.into(),
    }
}
