//! Score-pinning wrapper.

use crate::{DocId, Query, QueryResult};
use std::fmt;

/// Wraps any query and replaces its computed score with a fixed value
/// (times boost). Iteration is forwarded verbatim, so the wrapped query
/// decides *which* documents match and `Constant` only decides what they
/// are worth.
pub struct Constant<'a> {
    query: Box<dyn Query + 'a>,
    value: f32,
    boost: f32,
}

impl<'a> Constant<'a> {
    pub fn new(value: f32, query: Box<dyn Query + 'a>) -> Self {
        Constant {
            query,
            value,
            boost: 1.0,
        }
    }
}

impl Query for Constant<'_> {
    fn doc_id(&self) -> DocId {
        self.query.doc_id()
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        self.query.next_doc()
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        self.query.advance(target)
    }

    fn score(&self) -> f32 {
        self.value * self.boost
    }

    fn cost(&self) -> usize {
        self.query.cost()
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

impl fmt::Display for Constant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{CONST({} {{{}}})}}", self.value, self.query)
    }
}
