//! The layout pipeline: fetch, sequence, allocate, assemble.

use std::collections::HashMap;

use olive_source::{Ancestry, RevisionGraphSource, RevisionId, SourceError};

use crate::color::{lineage_colors, ColorAllocator, ColorScheme, LineageInput};
use crate::columns::{allocate, Allocation, AllocationInput, Node};
use crate::dag::RevisionDag;
use crate::lines::LineSegment;
use crate::options::LayoutOptions;
use crate::revno::DottedRevno;
use crate::sequence::merge_sort;
use crate::LayoutError;

/// One revision of a laid-out graph, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub revision_id: RevisionId,
    pub node: Node,
    /// Segments from this row to the next one.
    pub lines: Vec<LineSegment>,
    /// Every parent, in order, whether or not it made it into the layout.
    pub parents: Vec<RevisionId>,
    /// Children in row order.
    pub children: Vec<RevisionId>,
    pub revno: DottedRevno,
    /// 0 on the mainline, +1 per merge hop.
    pub merge_depth: usize,
    pub ghost: bool,
}

/// The full result of one layout run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub rows: Vec<LayoutRow>,
    pub index: HashMap<RevisionId, usize>,
    pub column_count: usize,
}

impl Layout {
    /// Row position of a revision.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn row_of(&self, id: &str) -> Option<&LayoutRow> {
        self.position(id).map(|row| &self.rows[row])
    }

    /// Segments entering `row` from above: the previous row's outgoing ones.
    pub fn in_lines(&self, row: usize) -> &[LineSegment] {
        match row.checked_sub(1).and_then(|prev| self.rows.get(prev)) {
            Some(prev) => &prev.lines,
            None => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutRow;
    type IntoIter = std::slice::Iter<'a, LayoutRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Lays out revision history for display.
///
/// Holds only options; every call is independent and the inputs are never
/// modified.
#[derive(Debug, Clone)]
pub struct GraphLayoutEngine {
    options: LayoutOptions,
}

impl GraphLayoutEngine {
    pub fn new(options: LayoutOptions) -> Result<Self, LayoutError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out everything reachable from `start`.
    pub fn layout<S>(&self, source: &S, start: &RevisionId) -> Result<Layout, LayoutError>
    where
        S: RevisionGraphSource + ?Sized,
    {
        self.layout_heads(source, std::slice::from_ref(start))
    }

    /// Lay out the combined history of several heads; the first heads the
    /// mainline.
    pub fn layout_heads<S>(&self, source: &S, starts: &[RevisionId]) -> Result<Layout, LayoutError>
    where
        S: RevisionGraphSource + ?Sized,
    {
        let mut ancestry = Ancestry::new();
        for start in starts {
            match source.get_ancestry(start) {
                Ok(fetched) => ancestry.merge(fetched),
                Err(SourceError::RevisionNotFound(_)) => {
                    return Err(LayoutError::NoSuchRevision(start.clone()))
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.run(&ancestry, starts, |id| {
            Ok(source.get_revision(id)?.map(|meta| meta.committer))
        })
    }

    /// Lay out an ancestry the caller already fetched.
    ///
    /// No metadata is available here, so the lineage scheme only follows
    /// single-child chains.
    pub fn layout_ancestry(
        &self,
        ancestry: &Ancestry,
        starts: &[RevisionId],
    ) -> Result<Layout, LayoutError> {
        self.run(ancestry, starts, |_| Ok(None))
    }

    fn run<F>(
        &self,
        ancestry: &Ancestry,
        starts: &[RevisionId],
        mut committer: F,
    ) -> Result<Layout, LayoutError>
    where
        F: FnMut(&RevisionId) -> Result<Option<String>, LayoutError>,
    {
        self.check_interrupt("sequencing")?;
        let dag = RevisionDag::build(ancestry, starts)?;
        let mut sequence = merge_sort(&dag);
        sequence.retain(|s| !dag.is_virtual(s.node));

        if let Some(max) = self.options.max_count {
            if sequence.len() > max {
                log::debug!("truncating {} revisions to {}", sequence.len(), max);
                sequence.truncate(max);
            }
        }
        self.check_interrupt("column allocation")?;

        let row_nodes: Vec<usize> = sequence.iter().map(|s| s.node).collect();
        let mut row_of_node: Vec<Option<usize>> = vec![None; dag.len()];
        for (row, &node) in row_nodes.iter().enumerate() {
            row_of_node[node] = Some(row);
        }

        let parent_rows: Vec<Vec<usize>> = row_nodes
            .iter()
            .map(|&node| dag.parents(node).iter().filter_map(|&p| row_of_node[p]).collect())
            .collect();
        let child_rows: Vec<Vec<usize>> = row_nodes
            .iter()
            .map(|&node| {
                let mut rows: Vec<usize> =
                    dag.children(node).iter().filter_map(|&c| row_of_node[c]).collect();
                rows.sort_unstable();
                rows
            })
            .collect();

        let colors = match self.options.color_scheme {
            ColorScheme::BranchId => None,
            ColorScheme::Lineage => {
                let committers = row_nodes
                    .iter()
                    .map(|&node| {
                        let node = dag.node(node);
                        if node.ghost {
                            Ok(None)
                        } else {
                            committer(&node.id)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let parent_counts: Vec<usize> =
                    row_nodes.iter().map(|&node| dag.parents(node).len()).collect();
                let mut allocator = ColorAllocator::new();
                let colors = lineage_colors(
                    &LineageInput {
                        children: &child_rows,
                        parent_counts: &parent_counts,
                        committers: &committers,
                    },
                    &mut allocator,
                );
                log::debug!("lineage scheme used {} colours", allocator.allocated());
                Some(colors)
            }
        };

        let revnos: Vec<DottedRevno> = sequence.iter().map(|s| s.revno.clone()).collect();
        let Allocation {
            nodes,
            lines,
            column_count,
        } = allocate(&AllocationInput {
            revnos: &revnos,
            parents: &parent_rows,
            colors: colors.as_deref(),
            broken_line_length: self.options.broken_line_length,
        });
        self.check_interrupt("assembly")?;

        let mut rows = Vec::with_capacity(sequence.len());
        let mut index = HashMap::with_capacity(sequence.len());
        for (row, ((seq, (node, lines)), children)) in sequence
            .into_iter()
            .zip(nodes.into_iter().zip(lines))
            .zip(child_rows)
            .enumerate()
        {
            let dag_node = dag.node(seq.node);
            index.insert(dag_node.id.clone(), row);
            rows.push(LayoutRow {
                revision_id: dag_node.id.clone(),
                node,
                lines,
                parents: dag
                    .parents(seq.node)
                    .iter()
                    .map(|&p| dag.node(p).id.clone())
                    .collect(),
                children: children
                    .into_iter()
                    .map(|c| dag.node(row_nodes[c]).id.clone())
                    .collect(),
                revno: seq.revno,
                merge_depth: seq.merge_depth,
                ghost: dag_node.ghost,
            });
        }

        log::debug!("laid out {} rows in {} columns", rows.len(), column_count);
        Ok(Layout {
            rows,
            index,
            column_count,
        })
    }

    fn check_interrupt(&self, next_phase: &str) -> Result<(), LayoutError> {
        match &self.options.interrupt {
            Some(interrupt) if interrupt.is_triggered() => {
                log::debug!("layout cancelled before {}", next_phase);
                Err(LayoutError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

/// One-shot layout of everything reachable from `start`.
pub fn layout<S>(source: &S, start: &RevisionId, options: LayoutOptions) -> Result<Layout, LayoutError>
where
    S: RevisionGraphSource + ?Sized,
{
    GraphLayoutEngine::new(options)?.layout(source, start)
}
