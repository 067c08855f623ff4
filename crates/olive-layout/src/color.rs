//! Colour assignment for lines of descent.
//!
//! Colours are plain indices; mapping them to RGB is up to the renderer.

use std::fmt;
use std::str::FromStr;

use crate::LayoutError;

/// How node colours are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// Sum of the branch id components; every revision on a branch line
    /// shares one colour.
    #[default]
    BranchId,
    /// Inherit from a child along the line of descent, using committer
    /// equality to pick among several children; otherwise a fresh colour.
    Lineage,
}

impl FromStr for ColorScheme {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "branch" | "branch-id" => Ok(ColorScheme::BranchId),
            "lineage" => Ok(ColorScheme::Lineage),
            other => Err(LayoutError::InvalidOption(format!(
                "unknown color scheme '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScheme::BranchId => f.write_str("branch"),
            ColorScheme::Lineage => f.write_str("lineage"),
        }
    }
}

/// Monotonic source of fresh colour indices.
#[derive(Debug, Clone, Default)]
pub struct ColorAllocator {
    next: u32,
}

impl ColorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused colour.
    pub fn next_color(&mut self) -> u32 {
        let color = self.next;
        self.next += 1;
        color
    }

    /// Number of colours handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Colour of a branch line under [`ColorScheme::BranchId`].
pub(crate) fn branch_color(branch_id: &[u32]) -> u32 {
    branch_id.iter().fold(0u32, |acc, part| acc.wrapping_add(*part))
}

/// Row-indexed inputs for the lineage scheme.
pub(crate) struct LineageInput<'a> {
    /// Children of each row, as row indices in ascending order.
    pub children: &'a [Vec<usize>],
    /// Number of parents of each row (including parents cut off by truncation).
    pub parent_counts: &'a [usize],
    pub committers: &'a [Option<String>],
}

/// Colours under [`ColorScheme::Lineage`], one per row.
///
/// Rows are visited top-down, so every child is coloured before its parents.
pub(crate) fn lineage_colors(input: &LineageInput<'_>, allocator: &mut ColorAllocator) -> Vec<u32> {
    let rows = input.children.len();
    let mut colors: Vec<u32> = Vec::with_capacity(rows);
    // A child that already passed its colour on to one parent.
    let mut handed_on = vec![false; rows];

    for row in 0..rows {
        let children = &input.children[row];

        let inherited = match children.as_slice() {
            [only] if input.parent_counts[*only] == 1 => Some(colors[*only]),
            _ => known_committer(input, row).and_then(|committer| {
                children
                    .iter()
                    .find(|&&child| {
                        !handed_on[child] && known_committer(input, child) == Some(committer)
                    })
                    .map(|&child| {
                        handed_on[child] = true;
                        colors[child]
                    })
            }),
        };

        colors.push(inherited.unwrap_or_else(|| allocator.next_color()));
    }

    colors
}

/// A blank committer is as unknown as a missing one and matches nobody.
fn known_committer<'a>(input: &LineageInput<'a>, row: usize) -> Option<&'a str> {
    let committers: &'a [Option<String>] = input.committers;
    committers[row].as_deref().filter(|name| !name.is_empty())
}
