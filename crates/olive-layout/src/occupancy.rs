//! Column occupancy as a dense bit matrix.
//!
//! Each column owns `words_per_column` 64-bit words, one bit per row, stored
//! column-major so that checking a row range in one column touches
//! contiguous memory. Columns are only ever appended.

use std::ops::Range;

const WORD_BITS: usize = 64;

pub(crate) struct OccupancyGrid {
    rows: usize,
    columns: usize,
    words_per_column: usize,
    bits: Vec<u64>,
}

impl OccupancyGrid {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: 0,
            words_per_column: rows.div_ceil(WORD_BITS),
            bits: Vec::new(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Append an empty column and return its index.
    pub fn add_column(&mut self) -> usize {
        let col = self.columns;
        self.bits.resize(self.bits.len() + self.words_per_column, 0);
        self.columns += 1;
        col
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        debug_assert!(row < self.rows);
        let word = self.bits[col * self.words_per_column + row / WORD_BITS];
        word & (1 << (row % WORD_BITS)) != 0
    }

    /// Whether every row of every span is free in `col`.
    pub fn is_free(&self, col: usize, spans: &[Range<usize>]) -> bool {
        spans.iter().all(|span| self.span_is_free(col, span.clone()))
    }

    /// Mark every row of `span` occupied in `col`.
    ///
    /// Panics if a row is already taken: the allocator only marks cells it
    /// has just checked, so a collision is a bug in the caller.
    pub fn mark(&mut self, col: usize, span: Range<usize>) {
        for (word_idx, mask) in word_masks(span.clone()) {
            let word = &mut self.bits[col * self.words_per_column + word_idx];
            assert!(
                *word & mask == 0,
                "column {} already occupied in rows {:?}",
                col,
                span
            );
            *word |= mask;
        }
    }

    /// First column in `order` free over `spans`, appending a new column when
    /// every candidate is taken. Does not mark anything.
    pub fn first_free_or_new(
        &mut self,
        order: impl IntoIterator<Item = usize>,
        spans: &[Range<usize>],
    ) -> usize {
        match order.into_iter().find(|&col| self.is_free(col, spans)) {
            Some(col) => col,
            None => self.add_column(),
        }
    }

    fn span_is_free(&self, col: usize, span: Range<usize>) -> bool {
        debug_assert!(span.end <= self.rows);
        let base = col * self.words_per_column;
        word_masks(span).all(|(word_idx, mask)| self.bits[base + word_idx] & mask == 0)
    }
}

/// Split a row range into (word index, bit mask) pairs.
fn word_masks(span: Range<usize>) -> impl Iterator<Item = (usize, u64)> {
    let Range { start, end } = span;
    let first_word = start / WORD_BITS;
    let last_word = if end > start { (end - 1) / WORD_BITS + 1 } else { first_word };
    (first_word..last_word).map(move |word_idx| {
        let word_start = word_idx * WORD_BITS;
        let lo = start.max(word_start) - word_start;
        let hi = end.min(word_start + WORD_BITS) - word_start;
        let upper = if hi == WORD_BITS { u64::MAX } else { (1u64 << hi) - 1 };
        let lower = (1u64 << lo) - 1;
        (word_idx, upper & !lower)
    })
}
