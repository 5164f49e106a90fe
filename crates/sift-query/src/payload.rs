//! Per-document payload decoding.
//!
//! A payload is a small byte buffer stored parallel to a posting list (one
//! byte per document by current convention). While iterating a query, a
//! caller can pass a [`Payload`] visitor to
//! [`Query::payload_decode`](crate::Query::payload_decode): compositors
//! push/pop so the visitor can track nesting, and payload-bearing leaves
//! positioned on the current match hand over their bytes.

use crate::term::Term;
use crate::{DocId, Query, QueryResult};
use std::fmt;

/// Visitor protocol for extracting per-match, per-term side data.
///
/// `push`/`pop` are invoked at compositor entry and exit, `consume` by
/// each payload-carrying leaf whose current document is the match. What
/// `score` aggregates is entirely up to the implementation.
pub trait Payload {
    fn push(&mut self);
    fn pop(&mut self);
    fn consume(&mut self, doc: DocId, posting_index: usize, payload: &[u8]);
    fn score(&self) -> f32;
}

/// A term cursor that carries a payload buffer parallel to its postings.
///
/// Iteration and scoring are exactly [`Term`]'s; the only addition is
/// payload decoding, which feeds `payload[cursor_index]`-addressable bytes
/// to the visitor.
pub struct PayloadTerm<'a> {
    term: Term<'a>,
    payload: &'a [u8],
}

impl<'a> PayloadTerm<'a> {
    pub fn new(total_docs: usize, term: &str, postings: &'a [DocId], payload: &'a [u8]) -> Self {
        PayloadTerm {
            term: Term::new(total_docs, term, postings),
            payload,
        }
    }
}

impl Query for PayloadTerm<'_> {
    fn doc_id(&self) -> DocId {
        self.term.doc_id()
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        self.term.next_doc()
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        self.term.advance(target)
    }

    fn score(&self) -> f32 {
        self.term.score()
    }

    fn cost(&self) -> usize {
        self.term.cost()
    }

    fn set_boost(&mut self, boost: f32) {
        self.term.set_boost(boost);
    }

    fn payload_decode(&mut self, visitor: &mut dyn Payload) {
        visitor.push();
        visitor.consume(self.term.doc_id(), self.term.cursor_index(), self.payload);
        visitor.pop();
    }
}

impl fmt::Display for PayloadTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p_{}({})/{:.2}",
            self.term.label(),
            self.term.num_postings(),
            self.term.idf_weight()
        )
    }
}
