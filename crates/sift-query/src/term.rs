//! In-memory term cursor.
//!
//! Iterates a borrowed, strictly ascending posting list. At construction
//! the list is partitioned into fixed-size chunks and a skip-block index
//! (`(max_doc, max_idx)` per chunk) is derived, so `advance` can jump over
//! irrelevant ranges: find the target block (linear scan when few blocks
//! remain, lower-bound binary search otherwise), then scan linearly inside
//! it. This matters when a cheap leading child of an intersection asks a
//! huge sibling to skip to a distant id.

use crate::{idf, DocId, Query, QueryResult, NOT_READY, NO_MORE};
use std::borrow::Cow;
use std::fmt;

/// Default number of postings per skip block.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Below this many remaining blocks a linear scan beats the binary search.
const LINEAR_BLOCK_SCAN: usize = 32;

/// One skip-block entry: the last document id in the chunk and the index
/// of the last posting in the chunk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Block {
    pub(crate) max_doc: DocId,
    pub(crate) max_idx: usize,
}

/// Build the skip-block index for `postings`, decoding each entry by
/// `freq_bits` (0 for plain doc-id lists).
pub(crate) fn build_blocks(postings: &[DocId], chunk_size: usize, freq_bits: u32) -> Vec<Block> {
    let chunk_size = chunk_size.max(1);
    let mut blocks = Vec::with_capacity(postings.len().div_ceil(chunk_size));
    let mut start = 0;
    while start < postings.len() {
        let max_idx = start.saturating_add(chunk_size - 1).min(postings.len() - 1);
        blocks.push(Block {
            max_doc: postings[max_idx] >> freq_bits,
            max_idx,
        });
        start = start.saturating_add(chunk_size);
    }
    blocks
}

/// Find the first block at or after `block_idx` whose `max_doc` can hold
/// `target`, or `None` if the target is past every block.
pub(crate) fn find_block(blocks: &[Block], block_idx: usize, target: DocId) -> Option<usize> {
    if blocks.len() - block_idx < LINEAR_BLOCK_SCAN {
        return (block_idx..blocks.len()).find(|&i| target <= blocks[i].max_doc);
    }
    let found = block_idx + blocks[block_idx..].partition_point(|b| b.max_doc < target);
    if found < blocks.len() {
        Some(found)
    } else {
        None
    }
}

/// Block-accelerated cursor over an in-memory posting list.
///
/// The posting list is borrowed and never mutated; the cursor owns only
/// its derived block index. The query is single use and not thread safe.
pub struct Term<'a> {
    term: String,
    postings: Cow<'a, [DocId]>,
    blocks: Vec<Block>,
    block_idx: usize,
    cursor: usize,
    doc: DocId,
    idf: f32,
    boost: f32,
}

impl<'a> Term<'a> {
    /// Create a term cursor with the default chunk size.
    ///
    /// `total_docs` is the number of documents in the index, used for the
    /// idf component of the score. Pass any constant `> 0` if unknown.
    /// `term` is a symbolic label used only for debug output.
    pub fn new(total_docs: usize, term: &str, postings: &'a [DocId]) -> Self {
        Self::with_chunk_size(total_docs, term, postings, DEFAULT_CHUNK_SIZE)
    }

    /// Create a term cursor with an explicit skip-block chunk size.
    pub fn with_chunk_size(
        total_docs: usize,
        term: &str,
        postings: &'a [DocId],
        chunk_size: usize,
    ) -> Self {
        Self::build(total_docs, term, Cow::Borrowed(postings), chunk_size)
    }

    /// Create a term cursor that owns its posting list, e.g. one read from
    /// disk just for this query.
    pub fn from_owned(total_docs: usize, term: &str, postings: Vec<DocId>) -> Term<'static> {
        Term::build(total_docs, term, Cow::Owned(postings), DEFAULT_CHUNK_SIZE)
    }

    fn build(
        total_docs: usize,
        term: &str,
        postings: Cow<'a, [DocId]>,
        chunk_size: usize,
    ) -> Self {
        Term {
            term: term.to_string(),
            blocks: build_blocks(&postings, chunk_size, 0),
            block_idx: 0,
            cursor: 0,
            doc: NOT_READY,
            idf: idf(total_docs, postings.len()),
            boost: 1.0,
            postings,
        }
    }

    pub(crate) fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub(crate) fn label(&self) -> &str {
        &self.term
    }

    pub(crate) fn num_postings(&self) -> usize {
        self.postings.len()
    }

    pub(crate) fn idf_weight(&self) -> f32 {
        self.idf
    }
}

impl Query for Term<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        if self.doc == NO_MORE {
            return Ok(NO_MORE);
        }
        if self.doc != NOT_READY {
            self.cursor += 1;
        }
        if self.cursor >= self.postings.len() {
            self.doc = NO_MORE;
        } else {
            self.doc = self.postings[self.cursor];
        }
        Ok(self.doc)
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        if self.doc == NO_MORE {
            return Ok(NO_MORE);
        }
        if target == NO_MORE {
            self.doc = NO_MORE;
            return Ok(NO_MORE);
        }
        if target <= self.doc {
            return Ok(self.doc);
        }

        if self.blocks.is_empty() || target > self.blocks[self.block_idx].max_doc {
            match find_block(&self.blocks, self.block_idx, target) {
                Some(i) => self.block_idx = i,
                None => {
                    self.doc = NO_MORE;
                    return Ok(NO_MORE);
                }
            }
        }

        for i in self.cursor..=self.blocks[self.block_idx].max_idx {
            if self.postings[i] >= target {
                self.cursor = i;
                self.doc = self.postings[i];
                return Ok(self.doc);
            }
        }

        // the selected block's max_doc >= target, so the scan above hits
        self.doc = NO_MORE;
        Ok(NO_MORE)
    }

    fn score(&self) -> f32 {
        self.idf * self.boost
    }

    fn cost(&self) -> usize {
        self.postings.len().saturating_sub(self.cursor)
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

impl fmt::Display for Term<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:.2}", self.term, self.idf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut dyn Query) -> Vec<DocId> {
        let mut out = Vec::new();
        while q.next_doc().unwrap() != NO_MORE {
            out.push(q.doc_id());
        }
        out
    }

    #[test]
    fn test_term_emits_postings_in_order() {
        let postings = vec![1, 5, 7, 30, 1000];
        let mut t = Term::new(10, "x", &postings);
        assert_eq!(t.doc_id(), NOT_READY);
        assert_eq!(drain(&mut t), postings);
        assert_eq!(t.doc_id(), NO_MORE);
        // exhausted is absorbing
        assert_eq!(t.next_doc().unwrap(), NO_MORE);
    }

    #[test]
    fn test_empty_term_is_exhausted_on_first_call() {
        let mut t = Term::new(10, "x", &[]);
        assert_eq!(t.next_doc().unwrap(), NO_MORE);
        assert_eq!(t.advance(5).unwrap(), NO_MORE);
        assert_eq!(t.score(), 0.0);
    }

    #[test]
    fn test_advance_lands_on_first_id_at_or_after_target() {
        let postings = vec![1, 5, 7, 30, 1000];
        let mut t = Term::new(10, "x", &postings);
        assert_eq!(t.advance(6).unwrap(), 7);
        assert_eq!(t.advance(7).unwrap(), 7);
        assert_eq!(t.advance(8).unwrap(), 30);
        assert_eq!(t.advance(1001).unwrap(), NO_MORE);
        assert_eq!(t.advance(5).unwrap(), NO_MORE);
    }

    #[test]
    fn test_advance_crosses_blocks() {
        let postings: Vec<DocId> = (0..10_000).map(|i| i * 3).collect();
        for chunk_size in [1, 2, 32, 64, 4096, usize::MAX] {
            let mut t = Term::with_chunk_size(10, "x", &postings, chunk_size);
            assert_eq!(t.advance(2).unwrap(), 3);
            assert_eq!(t.advance(14_000).unwrap(), 14_001);
            assert_eq!(t.next_doc().unwrap(), 14_004);
            assert_eq!(t.advance(29_997).unwrap(), 29_997);
            assert_eq!(t.next_doc().unwrap(), NO_MORE);
        }
    }

    #[test]
    fn test_chunk_size_does_not_change_emission() {
        let postings: Vec<DocId> = (0..500).map(|i| i * 7 + 3).collect();
        for chunk_size in [1, 2, 32, 64, 4096, usize::MAX] {
            let mut t = Term::with_chunk_size(10, "x", &postings, chunk_size);
            assert_eq!(drain(&mut t), postings, "chunk_size {}", chunk_size);
        }
    }

    #[test]
    fn test_score_is_idf_times_boost() {
        let postings = vec![1, 2, 3, 4];
        let mut t = Term::new(10, "x", &postings);
        t.next_doc().unwrap();
        assert!((t.score() - idf(10, 4)).abs() < 1e-6);
        t.set_boost(2.0);
        assert!((t.score() - 2.0 * idf(10, 4)).abs() < 1e-6);
    }

    #[test]
    fn test_cost_counts_remaining_postings() {
        let postings = vec![1, 2, 3, 4, 5];
        let mut t = Term::new(10, "x", &postings);
        assert_eq!(t.cost(), 5);
        t.advance(4).unwrap();
        assert_eq!(t.cost(), 2);
    }
}
