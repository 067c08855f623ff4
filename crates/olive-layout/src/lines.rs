//! Routing of parent edges between rows.
//!
//! A branch line holds its own gap and fork-run cells from the moment it is
//! placed, and its primary edges run through them. Every other edge reserves
//! cells as soon as its child's line is placed, so later branch lines see
//! them as occupied. Segments are produced in a second pass, once every node
//! column is final.

use std::ops::Range;

use crate::occupancy::OccupancyGrid;

/// One drawable piece of an edge on a single row: from `from` on this row to
/// `to` on the next row.
///
/// `None` marks the open end of a broken-line stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub color: u32,
}

impl LineSegment {
    pub fn new(from: Option<usize>, to: Option<usize>, color: u32) -> Self {
        Self { from, to, color }
    }

    /// Whether one end is open, i.e. the segment is half of a broken line.
    pub fn is_stub(&self) -> bool {
        self.from.is_none() || self.to.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Parent in the next row.
    Direct,
    /// One reserved column for every row strictly between child and parent.
    Column(usize),
    /// Stubs at the row after the child and the row before the parent.
    Broken { child_stub: usize, parent_stub: usize },
}

#[derive(Debug, Clone, Copy)]
struct RoutedEdge {
    child_row: usize,
    child_col: usize,
    parent_row: usize,
    route: Route,
}

pub(crate) struct LineRouter {
    broken_line_length: Option<usize>,
    edges: Vec<RoutedEdge>,
    broken: usize,
}

impl LineRouter {
    pub fn new(broken_line_length: Option<usize>) -> Self {
        Self {
            broken_line_length,
            edges: Vec::new(),
            broken: 0,
        }
    }

    /// Reserve cells for the edge `child_row -> parent_row`.
    ///
    /// `parent_col` is `None` while the parent's branch line is unplaced.
    pub fn route(
        &mut self,
        grid: &mut OccupancyGrid,
        child_row: usize,
        child_col: usize,
        parent_row: usize,
        parent_col: Option<usize>,
    ) {
        debug_assert!(parent_row > child_row, "parent above child");
        let distance = parent_row - child_row;

        let route = if distance == 1 {
            Route::Direct
        } else if self.is_long(distance) {
            self.broken += 1;
            Route::Broken {
                child_stub: reserve(grid, child_col, parent_col, child_row + 1..child_row + 2),
                parent_stub: reserve(grid, child_col, parent_col, parent_row - 1..parent_row),
            }
        } else {
            Route::Column(reserve(grid, child_col, parent_col, child_row + 1..parent_row))
        };

        self.edges.push(RoutedEdge {
            child_row,
            child_col,
            parent_row,
            route,
        });
    }

    /// Record the edge `child_row -> parent_row` down `column`, through cells
    /// the child's branch line already holds.
    pub fn follow(
        &mut self,
        grid: &OccupancyGrid,
        child_row: usize,
        column: usize,
        parent_row: usize,
    ) {
        debug_assert!(parent_row > child_row, "parent above child");
        let distance = parent_row - child_row;
        let held = |row| grid.is_occupied(column, row);

        let route = if distance == 1 {
            Route::Direct
        } else if self.is_long(distance) {
            debug_assert!(held(child_row + 1) && held(parent_row - 1));
            self.broken += 1;
            Route::Broken {
                child_stub: column,
                parent_stub: column,
            }
        } else {
            debug_assert!((child_row + 1..parent_row).all(held));
            Route::Column(column)
        };

        self.edges.push(RoutedEdge {
            child_row,
            child_col: column,
            parent_row,
            route,
        });
    }

    fn is_long(&self, distance: usize) -> bool {
        self.broken_line_length.is_some_and(|limit| distance > limit)
    }

    /// Number of edges drawn as two stubs.
    pub fn broken_count(&self) -> usize {
        self.broken
    }

    /// Emit the segments of every routed edge, per row.
    ///
    /// `parent_node` gives the final `(column, colour)` of a row; an edge
    /// takes its parent's colour.
    pub fn emit(
        &self,
        rows: usize,
        parent_node: impl Fn(usize) -> (usize, u32),
    ) -> Vec<Vec<LineSegment>> {
        let mut lines: Vec<Vec<LineSegment>> = vec![Vec::new(); rows];

        for edge in &self.edges {
            let (parent_col, color) = parent_node(edge.parent_row);
            let (child, parent) = (edge.child_row, edge.parent_row);
            let seg = |from, to| LineSegment::new(from, to, color);

            match edge.route {
                Route::Direct => {
                    lines[child].push(seg(Some(edge.child_col), Some(parent_col)));
                }
                Route::Column(col) => {
                    lines[child].push(seg(Some(edge.child_col), Some(col)));
                    for row in &mut lines[child + 1..parent - 1] {
                        row.push(seg(Some(col), Some(col)));
                    }
                    lines[parent - 1].push(seg(Some(col), Some(parent_col)));
                }
                Route::Broken {
                    child_stub,
                    parent_stub,
                } => {
                    lines[child].push(seg(Some(edge.child_col), Some(child_stub)));
                    lines[child + 1].push(seg(Some(child_stub), None));
                    lines[parent - 2].push(seg(None, Some(parent_stub)));
                    lines[parent - 1].push(seg(Some(parent_stub), Some(parent_col)));
                }
            }
        }

        lines
    }
}

/// Find, mark and return a column free over `span` for an edge.
fn reserve(
    grid: &mut OccupancyGrid,
    child_col: usize,
    parent_col: Option<usize>,
    span: Range<usize>,
) -> usize {
    let order = line_search_order(grid.column_count(), child_col, parent_col);
    let col = grid.first_free_or_new(order, std::slice::from_ref(&span));
    grid.mark(col, span);
    col
}

/// Candidate columns for a routed line, best first.
///
/// The band between child and parent column comes first, walked from the
/// child's side. Then columns at growing distance outside the band, the lower
/// index first on ties.
pub(crate) fn line_search_order(
    column_count: usize,
    child_col: usize,
    parent_col: Option<usize>,
) -> Vec<usize> {
    let (lo, hi) = match parent_col {
        Some(p) => (child_col.min(p), child_col.max(p)),
        None => (child_col, child_col),
    };

    let mut order = Vec::with_capacity(column_count.max(hi + 1));
    if child_col == lo {
        order.extend(lo..=hi);
    } else {
        order.extend((lo..=hi).rev());
    }

    for step in 1.. {
        let left = lo.checked_sub(step);
        let right = Some(hi + step).filter(|&c| c < column_count);
        if left.is_none() && right.is_none() {
            break;
        }
        order.extend(left);
        order.extend(right);
    }
    order
}
