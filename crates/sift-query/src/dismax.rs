//! Union with disjunction-max scoring.

use crate::{DocId, Query, QueryResult, NOT_READY, NO_MORE};
use std::fmt;

/// Union semantics with "max plus tie-breaker" scoring.
///
/// Document emission is identical to [`Or`](crate::or::Or). The score of a
/// match is the largest participating child score, plus `tie_breaker`
/// times each of the other participating scores; if several children tie
/// for the top, one counts in full and the rest through the tie-breaker.
/// `tie_breaker` 0 is a pure max, 1 degenerates into `Or`'s plain sum.
///
/// For example `DisMax(0.5, "name:amsterdam", "name:university",
/// "name:free")` with idfs amsterdam 1.3, university 2.1, free 0.2 scores
/// a document matching all three as `2.1 + 0.5*1.3 + 0.5*0.2`.
pub struct DisMax<'a> {
    queries: Vec<Box<dyn Query + 'a>>,
    tie_breaker: f32,
    doc: DocId,
    boost: f32,
}

impl<'a> DisMax<'a> {
    pub fn new(tie_breaker: f32, queries: Vec<Box<dyn Query + 'a>>) -> Self {
        DisMax {
            queries,
            tie_breaker,
            doc: NOT_READY,
            boost: 1.0,
        }
    }

    /// Add another child. Only meaningful before iteration starts.
    pub fn push(&mut self, query: Box<dyn Query + 'a>) {
        self.queries.push(query);
    }
}

impl Query for DisMax<'_> {
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
        let mut max = 0.0f32;
        let mut sum = 0.0f32;
        for q in self.queries.iter().filter(|q| q.doc_id() == self.doc) {
            let s = q.score();
            sum += s;
            if s > max {
                max = s;
            }
        }
        (max + (sum - max) * self.tie_breaker) * self.boost
    }

    fn cost(&self) -> usize {
        // optimistic: assumes the sets overlap heavily
        self.queries.iter().map(|q| q.cost()).max().unwrap_or(0)
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

impl fmt::Display for DisMax<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, q) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " DisMax ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, "}}")
    }
}
