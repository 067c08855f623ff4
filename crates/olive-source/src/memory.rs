use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::text::{self, RevisionRecord};
use crate::{Ancestry, RevisionGraphSource, RevisionId, RevisionMeta, SourceError};

/// A revision store held entirely in memory.
///
/// Useful for tests, for the CLI, and for callers that already pulled
/// history out of a repository and want to lay it out repeatedly.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    parents: HashMap<RevisionId, Vec<RevisionId>>,
    meta: HashMap<RevisionId, RevisionMeta>,
    ghosts: HashSet<RevisionId>,
    /// Revisions in insertion order; the first one is the default start.
    order: Vec<RevisionId>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed text records.
    pub fn from_records(records: impl IntoIterator<Item = RevisionRecord>) -> Self {
        let mut source = Self::new();
        for record in records {
            source.add_revision(record.id, record.parents, record.meta);
        }
        source
    }

    /// Parse the text format.
    pub fn from_text(input: &str) -> Result<Self, SourceError> {
        Ok(Self::from_records(text::parse_records(input)?))
    }

    /// Read a file in the text format.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Ok(Self::from_records(text::read_records(path)?))
    }

    /// Add or replace a revision.
    pub fn add_revision(
        &mut self,
        id: impl Into<RevisionId>,
        parents: Vec<RevisionId>,
        meta: Option<RevisionMeta>,
    ) {
        let id = id.into();
        self.ghosts.remove(&id);
        if !self.parents.contains_key(&id) {
            self.order.push(id.clone());
        }
        match meta {
            Some(meta) => {
                self.meta.insert(id.clone(), meta);
            }
            None => {
                self.meta.remove(&id);
            }
        }
        self.parents.insert(id, parents);
    }

    /// Declare an id as a known ghost.
    pub fn add_ghost(&mut self, id: impl Into<RevisionId>) {
        let id = id.into();
        if !self.parents.contains_key(&id) {
            self.ghosts.insert(id);
        }
    }

    /// The first revision added, used as the default layout start.
    pub fn first(&self) -> Option<&RevisionId> {
        self.order.first()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl RevisionGraphSource for InMemorySource {
    fn get_ancestry(&self, start: &RevisionId) -> Result<Ancestry, SourceError> {
        if !self.parents.contains_key(start) {
            return Err(SourceError::RevisionNotFound(start.clone()));
        }

        let mut ancestry = Ancestry::new();
        let mut visited: HashSet<&RevisionId> = HashSet::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.parents.get(id) {
                Some(parents) => {
                    ancestry.insert(id.clone(), parents.clone());
                    for parent in parents {
                        if !visited.contains(parent) {
                            stack.push(parent);
                        }
                    }
                }
                None => {
                    if self.ghosts.contains(id) {
                        log::trace!("known ghost {}", id.short());
                    }
                    ancestry.insert_ghost(id.clone());
                }
            }
        }

        Ok(ancestry)
    }

    fn get_revision(&self, id: &RevisionId) -> Result<Option<RevisionMeta>, SourceError> {
        if !self.parents.contains_key(id) {
            return Ok(None);
        }
        Ok(Some(self.meta.get(id).cloned().unwrap_or_default()))
    }
}
