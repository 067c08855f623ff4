//! Dense integer view of an ancestry map.
//!
//! String ids are only touched while building; everything downstream works
//! on node indices and index lists.

use std::collections::HashMap;

use olive_source::{Ancestry, RevisionId};

use crate::LayoutError;

pub(crate) struct DagNode {
    pub id: RevisionId,
    /// Parent nodes in their original order, duplicates removed.
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    /// Stand-in for an unresolvable parent.
    pub ghost: bool,
}

pub(crate) struct RevisionDag {
    nodes: Vec<DagNode>,
    ids: HashMap<RevisionId, usize>,
    /// Node 0 is a synthetic merge of several start revisions.
    virtual_top: bool,
}

impl RevisionDag {
    /// Collect everything reachable from `starts`.
    ///
    /// With a single start, node 0 is that start. With several, node 0 is a
    /// synthetic revision whose parents are the starts in order; it never
    /// becomes anybody's child and callers drop it after sequencing.
    pub fn build(ancestry: &Ancestry, starts: &[RevisionId]) -> Result<Self, LayoutError> {
        let Some(first) = starts.first() else {
            return Err(LayoutError::InvalidOption("no start revision given".into()));
        };
        if let Some(missing) = starts.iter().find(|s| !ancestry.contains(s.as_str())) {
            return Err(LayoutError::NoSuchRevision(missing.clone()));
        }

        let mut dag = RevisionDag {
            nodes: Vec::new(),
            ids: HashMap::new(),
            virtual_top: false,
        };

        let mut next = 0;
        if starts.iter().any(|s| s != first) {
            dag.virtual_top = true;
            dag.nodes.push(DagNode {
                id: RevisionId::new(""),
                parents: Vec::new(),
                children: Vec::new(),
                ghost: false,
            });
            let mut tops = Vec::with_capacity(starts.len());
            for start in starts {
                let idx = dag.intern(start, ancestry);
                if !tops.contains(&idx) {
                    tops.push(idx);
                }
            }
            dag.nodes[0].parents = tops;
            next = 1;
        } else {
            dag.intern(first, ancestry);
        }

        // Nodes are appended as they are discovered, so walking the vector
        // by index visits each exactly once.
        while next < dag.nodes.len() {
            if let Some(parent_ids) = ancestry.parents_of(dag.nodes[next].id.as_str()) {
                let mut parents = Vec::with_capacity(parent_ids.len());
                for parent_id in parent_ids {
                    let parent = dag.intern(parent_id, ancestry);
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
                for &parent in &parents {
                    dag.nodes[parent].children.push(next);
                }
                dag.nodes[next].parents = parents;
            }
            next += 1;
        }

        let (reported, missing) = dag
            .nodes
            .iter()
            .filter(|n| n.ghost)
            .partition::<Vec<_>, _>(|n| ancestry.is_reported_ghost(n.id.as_str()));
        if !reported.is_empty() {
            log::debug!("{} ghost revision(s) reachable from {}", reported.len(), first.short());
        }
        if !missing.is_empty() {
            log::warn!(
                "{} parent(s) reachable from {} are neither in the ancestry nor reported as ghosts",
                missing.len(),
                first.short()
            );
        }
        log::debug!(
            "ancestry of {} start(s) from {}: {} revisions",
            starts.len(),
            first.short(),
            dag.nodes.len() - usize::from(dag.virtual_top)
        );
        Ok(dag)
    }

    /// Whether `idx` is the synthetic top node.
    pub fn is_virtual(&self, idx: usize) -> bool {
        self.virtual_top && idx == 0
    }

    fn intern(&mut self, id: &RevisionId, ancestry: &Ancestry) -> usize {
        if let Some(&idx) = self.ids.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(DagNode {
            id: id.clone(),
            parents: Vec::new(),
            children: Vec::new(),
            ghost: ancestry.is_ghost(id.as_str()),
        });
        self.ids.insert(id.clone(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &DagNode {
        &self.nodes[idx]
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].parents
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }
}
