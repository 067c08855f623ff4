use std::collections::{HashMap, HashSet};

use crate::RevisionId;

/// The parents map reachable from some starting revision.
///
/// Every key is a resolvable revision. Ghosts (ids that are referenced as a
/// parent but have no data) are either listed explicitly or simply absent
/// from the map; both are treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    parents: HashMap<RevisionId, Vec<RevisionId>>,
    ghosts: HashSet<RevisionId>,
}

impl Ancestry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolvable revision and its ordered parents.
    ///
    /// Re-inserting an id replaces its parents; an id previously recorded as
    /// a ghost stops being one.
    pub fn insert(&mut self, id: RevisionId, parents: Vec<RevisionId>) {
        self.ghosts.remove(&id);
        self.parents.insert(id, parents);
    }

    /// Record an id known to be unresolvable.
    pub fn insert_ghost(&mut self, id: RevisionId) {
        if !self.parents.contains_key(&id) {
            self.ghosts.insert(id);
        }
    }

    /// Fold another ancestry into this one, e.g. to combine the histories of
    /// several heads. Resolvable entries win over ghost marks.
    pub fn merge(&mut self, other: Ancestry) {
        for (id, parents) in other.parents {
            self.insert(id, parents);
        }
        for ghost in other.ghosts {
            self.insert_ghost(ghost);
        }
    }

    /// Ordered parents of a resolvable revision.
    pub fn parents_of(&self, id: &str) -> Option<&[RevisionId]> {
        self.parents.get(id).map(Vec::as_slice)
    }

    /// Whether the id resolves to a full revision.
    pub fn contains(&self, id: &str) -> bool {
        self.parents.contains_key(id)
    }

    /// Whether the id is referenced somewhere but cannot be resolved.
    pub fn is_ghost(&self, id: &str) -> bool {
        !self.parents.contains_key(id)
    }

    /// Whether the source reported the id as a ghost, as opposed to a parent
    /// that is merely missing from the map.
    pub fn is_reported_ghost(&self, id: &str) -> bool {
        self.ghosts.contains(id)
    }

    /// Number of resolvable revisions.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl FromIterator<(RevisionId, Vec<RevisionId>)> for Ancestry {
    fn from_iter<T: IntoIterator<Item = (RevisionId, Vec<RevisionId>)>>(iter: T) -> Self {
        let mut ancestry = Ancestry::new();
        for (id, parents) in iter {
            ancestry.insert(id, parents);
        }
        ancestry
    }
}
