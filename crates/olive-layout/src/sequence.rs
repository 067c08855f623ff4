//! Merge-sorted revision order with dotted revnos.
//!
//! Depth-first from the start revision, primary parent first, then the
//! remaining parents right to left. Emitting in reverse post-order yields a
//! descendant-first sequence in which the ancestry merged by a revision sits
//! directly below it, ahead of its primary parent, with the leftmost merged
//! parent nearest the merge.

use std::collections::HashMap;

use crate::dag::RevisionDag;
use crate::revno::DottedRevno;

/// One revision in merge-sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SequencedRevision {
    pub node: usize,
    pub revno: DottedRevno,
    /// 0 on the mainline, +1 for every non-primary parent hop.
    pub merge_depth: usize,
}

/// A pending frame of the depth-first walk.
struct Frame {
    node: usize,
    /// Whether the primary parent has been scheduled.
    primary_done: bool,
    /// Non-primary parents still to visit, popped from the back.
    pending: Vec<usize>,
    /// Whether this node was the first to claim its primary parent.
    first_child: bool,
}

struct MergeSorter<'a> {
    dag: &'a RevisionDag,
    visited: Vec<bool>,
    /// Set once some child has taken over the primary-line continuation.
    claimed: Vec<bool>,
    depth: Vec<usize>,
    revnos: Vec<Option<DottedRevno>>,
    /// Number of lines branched from each revno so far.
    branch_counts: HashMap<DottedRevno, u32>,
    roots: u32,
    stack: Vec<Frame>,
    post_order: Vec<usize>,
}

/// Sequence every node of `dag`, starting at node 0.
pub(crate) fn merge_sort(dag: &RevisionDag) -> Vec<SequencedRevision> {
    if dag.is_empty() {
        return Vec::new();
    }

    let mut sorter = MergeSorter {
        dag,
        visited: vec![false; dag.len()],
        claimed: vec![false; dag.len()],
        depth: vec![0; dag.len()],
        revnos: vec![None; dag.len()],
        branch_counts: HashMap::new(),
        roots: 0,
        stack: Vec::new(),
        post_order: Vec::with_capacity(dag.len()),
    };
    sorter.push(0, 0);
    sorter.run();

    let MergeSorter {
        post_order,
        mut revnos,
        depth,
        ..
    } = sorter;

    post_order
        .into_iter()
        .rev()
        .map(|node| SequencedRevision {
            node,
            revno: revnos[node].take().unwrap_or_else(DottedRevno::root),
            merge_depth: depth[node],
        })
        .collect()
}

impl MergeSorter<'_> {
    fn push(&mut self, node: usize, merge_depth: usize) {
        self.visited[node] = true;
        self.depth[node] = merge_depth;

        let parents = self.dag.parents(node);
        let first_child = match parents.first() {
            Some(&primary) if !self.claimed[primary] => {
                self.claimed[primary] = true;
                true
            }
            _ => false,
        };

        self.stack.push(Frame {
            node,
            primary_done: false,
            pending: parents.iter().skip(1).copied().collect(),
            first_child,
        });
    }

    fn run(&mut self) {
        while let Some(frame) = self.stack.last_mut() {
            let node = frame.node;
            let next = if !frame.primary_done {
                frame.primary_done = true;
                self.dag.parents(node).first().map(|&p| (p, 0))
            } else {
                frame.pending.pop().map(|p| (p, 1))
            };

            match next {
                Some((parent, extra_depth)) => {
                    // A parent already on the stack means a cycle; skipping it
                    // keeps the walk finite.
                    if !self.visited[parent] {
                        let merge_depth = self.depth[node] + extra_depth;
                        self.push(parent, merge_depth);
                    }
                }
                None => self.pop(),
            }
        }
    }

    fn pop(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = frame.node;

        let primary_revno = self
            .dag
            .parents(node)
            .first()
            .and_then(|&p| self.revnos[p].as_ref());

        let revno = match primary_revno {
            Some(parent_revno) if frame.first_child => parent_revno.next_in_line(),
            Some(parent_revno) => {
                let count = self.branch_counts.entry(parent_revno.clone()).or_insert(0);
                *count += 1;
                parent_revno.branch(*count)
            }
            None => {
                self.roots += 1;
                if self.roots == 1 {
                    DottedRevno::root()
                } else {
                    DottedRevno::secondary_root(self.roots - 1)
                }
            }
        };

        log::trace!("{} -> {}", self.dag.node(node).id.short(), revno);
        self.revnos[node] = Some(revno);
        self.post_order.push(node);
    }
}
