//! Revision ancestry input for the olive graph layout engine.
//!
//! This crate defines the boundary between the layout engine and whatever
//! version-control library supplies history: opaque `RevisionId`s, the
//! `Ancestry` parents map, display-only `RevisionMeta`, and the
//! `RevisionGraphSource` trait. `InMemorySource` implements the trait over
//! data built in code or parsed from the text format in [`text`].

mod id;
mod ancestry;
mod meta;
mod memory;
pub mod text;

pub use id::RevisionId;
pub use ancestry::Ancestry;
pub use meta::RevisionMeta;
pub use memory::InMemorySource;
pub use text::RevisionRecord;

/// Errors produced while reading revision data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("revision not found: {0}")]
    RevisionNotFound(RevisionId),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supplier of revision history.
///
/// Implementations may take repository locks or do blocking I/O; callers
/// must not assume two calls can run concurrently on the same source unless
/// the implementation says so.
pub trait RevisionGraphSource {
    /// Parents map of everything reachable from `start`.
    ///
    /// Fails with [`SourceError::RevisionNotFound`] when `start` itself
    /// cannot be resolved. Unresolvable parents are ghosts, not errors.
    fn get_ancestry(&self, start: &RevisionId) -> Result<Ancestry, SourceError>;

    /// Display metadata for one revision, or `None` for a ghost.
    fn get_revision(&self, id: &RevisionId) -> Result<Option<RevisionMeta>, SourceError>;
}

impl<S: RevisionGraphSource + ?Sized> RevisionGraphSource for &S {
    fn get_ancestry(&self, start: &RevisionId) -> Result<Ancestry, SourceError> {
        (**self).get_ancestry(start)
    }

    fn get_revision(&self, id: &RevisionId) -> Result<Option<RevisionMeta>, SourceError> {
        (**self).get_revision(id)
    }
}
