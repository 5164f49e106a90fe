//! Term cursor with bit-packed term frequencies.
//!
//! Each posting packs a document id and a term frequency into one `i32`:
//! the low `freq_bits` bits hold `tf - 1`, the rest hold the id, i.e.
//! document 999 with frequency 3 under 4 frequency bits is stored as
//! `(999 << 4) | 2`. Frequencies are usually the floored square root of
//! the raw count, so 3-4 bits go a long way. The skip-block index stores
//! the decoded document id maxima, so `advance` targets compare directly.

use crate::term::{build_blocks, find_block, Block, DEFAULT_CHUNK_SIZE};
use crate::{idf, DocId, Query, QueryResult, NOT_READY, NO_MORE};
use std::fmt;

/// Cursor over a posting list of `(doc_id << freq_bits) | (tf - 1)`
/// entries. Scores as `(1 + tf) * idf * boost` with `tf` the stored
/// zero-based frequency. Single use, not thread safe.
pub struct TermTF<'a> {
    term: String,
    postings: &'a [DocId],
    blocks: Vec<Block>,
    block_idx: usize,
    cursor: usize,
    doc: DocId,
    idf: f32,
    boost: f32,
    freq_bits: u32,
    freq_mask: DocId,
}

impl<'a> TermTF<'a> {
    /// Create a frequency-carrying term cursor with the default chunk
    /// size. `freq_bits` is how many low bits of each posting hold the
    /// zero-based term frequency.
    pub fn new(total_docs: usize, freq_bits: u32, term: &str, postings: &'a [DocId]) -> Self {
        Self::with_chunk_size(total_docs, freq_bits, term, postings, DEFAULT_CHUNK_SIZE)
    }

    /// Create a frequency-carrying term cursor with an explicit skip-block
    /// chunk size.
    pub fn with_chunk_size(
        total_docs: usize,
        freq_bits: u32,
        term: &str,
        postings: &'a [DocId],
        chunk_size: usize,
    ) -> Self {
        TermTF {
            term: term.to_string(),
            postings,
            blocks: build_blocks(postings, chunk_size, freq_bits),
            block_idx: 0,
            cursor: 0,
            doc: NOT_READY,
            idf: idf(total_docs, postings.len()),
            boost: 1.0,
            freq_bits,
            freq_mask: (1 << freq_bits) - 1,
        }
    }
}

impl Query for TermTF<'_> {
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
            self.doc = self.postings[self.cursor] >> self.freq_bits;
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
            let doc = self.postings[i] >> self.freq_bits;
            if doc >= target {
                self.cursor = i;
                self.doc = doc;
                return Ok(doc);
            }
        }

        // the selected block's max_doc >= target, so the scan above hits
        self.doc = NO_MORE;
        Ok(NO_MORE)
    }

    fn score(&self) -> f32 {
        if self.doc == NOT_READY || self.doc == NO_MORE {
            return 0.0;
        }
        let tf = (1 + (self.postings[self.cursor] & self.freq_mask)) as f32;
        tf * self.idf * self.boost
    }

    fn cost(&self) -> usize {
        self.postings.len().saturating_sub(self.cursor)
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

impl fmt::Display for TermTF<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:.2}", self.term, self.idf)
    }
}
