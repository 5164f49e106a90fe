//! Union compositor.

use crate::payload::Payload;
use crate::{DocId, Query, QueryResult, NOT_READY, NO_MORE};
use std::fmt;

/// Union of child queries: the current document is the minimum of the
/// children's current documents.
///
/// Stepping advances every child positioned on the current document and
/// takes the new minimum, so each matching id is emitted exactly once even
/// when several children share it. The score is the sum of the children
/// participating in the current match, times boost. An `Or` with no
/// children is exhausted on first call.
pub struct Or<'a> {
    queries: Vec<Box<dyn Query + 'a>>,
    doc: DocId,
    boost: f32,
}

impl<'a> Or<'a> {
    pub fn new(queries: Vec<Box<dyn Query + 'a>>) -> Self {
        Or {
            queries,
            doc: NOT_READY,
            boost: 1.0,
        }
    }

    /// Add another child. Only meaningful before iteration starts.
    pub fn push(&mut self, query: Box<dyn Query + 'a>) {
        self.queries.push(query);
    }
}

impl Query for Or<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        let mut new_doc = NO_MORE;
        for q in self.queries.iter_mut() {
            let mut doc = q.doc_id();
            if doc == self.doc {
                doc = q.next_doc()?;
            }
            if doc < new_doc {
                new_doc = doc;
            }
        }
        self.doc = new_doc;
        Ok(new_doc)
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        let mut new_doc = NO_MORE;
        for q in self.queries.iter_mut() {
            let mut doc = q.doc_id();
            if doc < target {
                doc = q.advance(target)?;
            }
            if doc < new_doc {
                new_doc = doc;
            }
        }
        self.doc = new_doc;
        Ok(new_doc)
    }

    fn score(&self) -> f32 {
        let sum: f32 = self
            .queries
            .iter()
            .filter(|q| q.doc_id() == self.doc)
            .map(|q| q.score())
            .sum();
        sum * self.boost
    }

    fn cost(&self) -> usize {
        // optimistic: assumes the sets overlap heavily
        self.queries.iter().map(|q| q.cost()).max().unwrap_or(0)
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn payload_decode(&mut self, visitor: &mut dyn Payload) {
        visitor.push();
        let doc = self.doc;
        for q in self.queries.iter_mut() {
            if q.doc_id() == doc {
                q.payload_decode(visitor);
            }
        }
        visitor.pop();
    }
}

impl fmt::Display for Or<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, q) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, "}}")
    }
}
