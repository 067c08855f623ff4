//! Dotted revision numbers.

use std::fmt;
use std::str::FromStr;

use crate::LayoutError;

/// Hierarchical revision number such as `5` or `5.1.2`.
///
/// Mainline revisions have a single component. A revision that starts a side
/// line gets its primary parent's revno followed by a branch index and `1`;
/// later revisions on that line bump the last component. A parentless
/// revision other than the first root gets `n.1`, `n` counting such roots.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DottedRevno(Vec<u32>);

impl DottedRevno {
    /// Revno of the first root revision.
    pub fn root() -> Self {
        Self(vec![1])
    }

    /// Revno of the `index`th extra root (1-based).
    pub(crate) fn secondary_root(index: u32) -> Self {
        Self(vec![index, 1])
    }

    /// Build from components. Returns `None` for an empty slice or a zero
    /// component.
    pub fn from_parts(parts: &[u32]) -> Option<Self> {
        if parts.is_empty() || parts.contains(&0) {
            return None;
        }
        Some(Self(parts.to_vec()))
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a revno has at least one component.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The revno minus its last component; shared by every revision on
    /// the same branch line.
    pub fn branch_id(&self) -> &[u32] {
        &self.0[..self.0.len() - 1]
    }

    /// Revno of the next revision on the same line.
    pub(crate) fn next_in_line(&self) -> Self {
        let mut parts = self.0.clone();
        if let Some(last) = parts.last_mut() {
            *last += 1;
        }
        Self(parts)
    }

    /// Revno of the first revision of the `index`th line branched from here.
    pub(crate) fn branch(&self, index: u32) -> Self {
        let mut parts = Vec::with_capacity(self.0.len() + 2);
        parts.extend_from_slice(&self.0);
        parts.push(index);
        parts.push(1);
        Self(parts)
    }
}

impl fmt::Display for DottedRevno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DottedRevno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DottedRevno({})", self)
    }
}

impl FromStr for DottedRevno {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| LayoutError::InvalidOption(format!("bad revno '{}'", s)))?;
        Self::from_parts(&parts).ok_or_else(|| LayoutError::InvalidOption(format!("bad revno '{}'", s)))
    }
}
