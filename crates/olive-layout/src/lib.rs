//! Revision graph layout: merge-sorted ordering, dotted revnos, column
//! allocation, line routing, and colours for drawing history as a graph.
//!
//! The engine takes an ancestry from a [`RevisionGraphSource`] and produces
//! one [`LayoutRow`] per revision, top to bottom. Each row says which column
//! and colour the revision's node gets and which segments to draw down to
//! the next row; the previous row's segments are the current row's incoming
//! lines. Rendering is left to the caller.
//!
//! ```
//! use olive_layout::{layout, LayoutOptions};
//! use olive_source::{InMemorySource, RevisionId};
//!
//! let mut source = InMemorySource::new();
//! source.add_revision("b", vec![RevisionId::from("a")], None);
//! source.add_revision("a", vec![], None);
//!
//! let graph = layout(&source, &RevisionId::from("b"), LayoutOptions::default()).unwrap();
//! assert_eq!(graph.rows[0].revno.to_string(), "2");
//! assert_eq!(graph.column_count, 1);
//! ```

mod dag;
mod sequence;
mod revno;
mod occupancy;
mod columns;
mod lines;
mod color;
mod options;
mod interrupt;
mod engine;
mod decorate;

pub use revno::DottedRevno;
pub use columns::Node;
pub use lines::LineSegment;
pub use color::{ColorAllocator, ColorScheme};
pub use options::{
    LayoutOptions, DEFAULT_BROKEN_LINE_LENGTH, ENV_BROKEN_LINE_LENGTH, ENV_COLOR_SCHEME,
    ENV_MAX_COUNT, MIN_BROKEN_LINE_LENGTH,
};
pub use interrupt::Interrupt;
pub use engine::{layout, GraphLayoutEngine, Layout, LayoutRow};
pub use decorate::{DecoratedRow, RowDecorator, DEFAULT_DECORATION_CACHE};

pub use olive_source::{RevisionGraphSource, RevisionId, SourceError};

/// Errors produced by graph layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("no such revision: {0}")]
    NoSuchRevision(RevisionId),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("layout cancelled")]
    Cancelled,

    #[error(transparent)]
    Source(#[from] SourceError),
}
