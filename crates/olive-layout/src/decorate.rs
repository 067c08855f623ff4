//! On-demand metadata for laid-out rows.
//!
//! Layout never touches revision metadata. A viewer decorates the rows it
//! is about to show, and the LRU keeps scrolling back and forth cheap.

use std::num::NonZeroUsize;

use lru::LruCache;
use olive_source::{RevisionGraphSource, RevisionId, RevisionMeta};

use crate::engine::LayoutRow;
use crate::LayoutError;

/// Default number of revisions whose metadata is kept.
pub const DEFAULT_DECORATION_CACHE: usize = 512;

/// A row together with its metadata, when the revision has any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedRow<'a> {
    pub row: &'a LayoutRow,
    pub meta: Option<RevisionMeta>,
}

/// Fetches and caches [`RevisionMeta`] for layout rows.
pub struct RowDecorator<S> {
    source: S,
    cache: LruCache<RevisionId, Option<RevisionMeta>>,
}

impl<S: RevisionGraphSource> RowDecorator<S> {
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_DECORATION_CACHE)
    }

    /// Cache up to `capacity` revisions; zero is treated as one.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Attach metadata to `row`. Ghosts never reach the source.
    pub fn decorate<'a>(&mut self, row: &'a LayoutRow) -> Result<DecoratedRow<'a>, LayoutError> {
        let meta = if row.ghost {
            None
        } else {
            self.lookup(&row.revision_id)?
        };
        Ok(DecoratedRow { row, meta })
    }

    fn lookup(&mut self, id: &RevisionId) -> Result<Option<RevisionMeta>, LayoutError> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached.clone());
        }
        let meta = self.source.get_revision(id)?;
        self.cache.put(id.clone(), meta.clone());
        Ok(meta)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of cached revisions.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
