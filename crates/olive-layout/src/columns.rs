//! Column assignment for branch lines.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;

use crate::color::branch_color;
use crate::lines::{LineRouter, LineSegment};
use crate::occupancy::OccupancyGrid;
use crate::revno::DottedRevno;

/// Where a revision is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Node {
    pub column: usize,
    pub color: u32,
}

/// Row-indexed input to the allocator. Every slice has one entry per
/// retained row, in display order.
pub(crate) struct AllocationInput<'a> {
    pub revnos: &'a [DottedRevno],
    /// Retained parent rows of each row, primary first.
    pub parents: &'a [Vec<usize>],
    /// Precomputed per-row colours; `None` colours by branch id.
    pub colors: Option<&'a [u32]>,
    pub broken_line_length: Option<usize>,
}

pub(crate) struct Allocation {
    pub nodes: Vec<Node>,
    pub lines: Vec<Vec<LineSegment>>,
    pub column_count: usize,
}

/// A branch id and its member rows, ascending.
#[derive(Debug, PartialEq, Eq)]
struct BranchLine<'a> {
    branch_id: &'a [u32],
    rows: Vec<usize>,
}

/// Assign a column to every row and route every parent edge.
pub(crate) fn allocate(input: &AllocationInput<'_>) -> Allocation {
    let rows = input.revnos.len();
    let row_of: HashMap<&[u32], usize> = input
        .revnos
        .iter()
        .enumerate()
        .map(|(row, revno)| (revno.parts(), row))
        .collect();

    let branch_lines = group_branch_lines(input.revnos);
    log::debug!("{} rows in {} branch lines", rows, branch_lines.len());

    let mut grid = OccupancyGrid::new(rows);
    let mut router = LineRouter::new(input.broken_line_length);
    let mut nodes: Vec<Option<Node>> = vec![None; rows];

    for line in &branch_lines {
        let fork_row = match line.branch_id {
            [] | [_] => None,
            id => row_of.get(&id[..id.len() - 1]).copied(),
        };
        let preferred = fork_row
            .and_then(|row| nodes[row])
            .map_or(0, |node| node.column);

        let spans = line_spans(&line.rows, fork_row, input.broken_line_length);
        let column = grid.first_free_or_new(preferred..grid.column_count(), &spans);
        log::trace!(
            "branch {:?}: {} rows in column {}",
            line.branch_id,
            line.rows.len(),
            column
        );

        for span in &spans {
            grid.mark(column, span.clone());
        }
        let line_color = branch_color(line.branch_id);
        for &row in &line.rows {
            let color = input.colors.map_or(line_color, |colors| colors[row]);
            nodes[row] = Some(Node { column, color });
        }

        for (i, &row) in line.rows.iter().enumerate() {
            // The next member, or the fork below the last one, continues the
            // line through cells it already holds.
            let continuation = line.rows.get(i + 1).copied().or(fork_row);
            for (k, &parent) in input.parents[row].iter().enumerate() {
                if k == 0 && Some(parent) == continuation {
                    router.follow(&grid, row, column, parent);
                } else {
                    let parent_col = nodes[parent].map(|node| node.column);
                    router.route(&mut grid, row, column, parent, parent_col);
                }
            }
        }
    }

    // Each row belongs to exactly one branch line.
    let nodes: Vec<Node> = nodes
        .into_iter()
        .map(|node| node.expect("row left without a column"))
        .collect();
    let lines = router.emit(rows, |row| (nodes[row].column, nodes[row].color));

    log::debug!(
        "{} columns, {} broken lines",
        grid.column_count(),
        router.broken_count()
    );
    Allocation {
        nodes,
        lines,
        column_count: grid.column_count(),
    }
}

/// Group rows by branch id, in placement order: shorter ids first so a
/// line's fork is placed before it, then higher ids (newer branches) first.
fn group_branch_lines(revnos: &[DottedRevno]) -> Vec<BranchLine<'_>> {
    let mut by_id: HashMap<&[u32], Vec<usize>> = HashMap::new();
    for (row, revno) in revnos.iter().enumerate() {
        by_id.entry(revno.branch_id()).or_default().push(row);
    }

    let mut lines: Vec<BranchLine<'_>> = by_id
        .into_iter()
        .map(|(branch_id, rows)| BranchLine { branch_id, rows })
        .collect();
    lines.sort_by(|a, b| placement_order(a.branch_id, b.branch_id));
    lines
}

fn placement_order(a: &[u32], b: &[u32]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| b.cmp(a))
}

/// Rows a branch line holds in its column.
///
/// Members and the gaps between them, plus the run down to the fork row.
/// Runs longer than `broken_line_length` will be drawn as stubs, so only
/// their end rows count.
fn line_spans(
    rows: &[usize],
    fork_row: Option<usize>,
    broken_line_length: Option<usize>,
) -> Vec<Range<usize>> {
    let is_long = |gap: usize| broken_line_length.is_some_and(|limit| gap > limit);
    let mut spans = Vec::with_capacity(rows.len() * 2);

    let mut prev: Option<usize> = None;
    for &row in rows {
        if let Some(prev) = prev {
            if is_long(row - prev) {
                spans.push(prev + 1..prev + 2);
                spans.push(row - 1..row);
            } else {
                spans.push(prev + 1..row);
            }
        }
        spans.push(row..row + 1);
        prev = Some(row);
    }

    if let (Some(last), Some(fork)) = (prev, fork_row) {
        if fork > last + 1 {
            if is_long(fork - last) {
                spans.push(last + 1..last + 2);
                spans.push(fork - 1..fork);
            } else {
                spans.push(last + 1..fork);
            }
        }
    }
    spans
}
