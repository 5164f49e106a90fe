//! Intersection compositor, with optional exclusion.
//!
//! The cheapest child (by [`Query::cost`]) drives the iteration: it is
//! stepped first, and every other child is asked to catch up. Whenever a
//! sibling overshoots, the driver is re-anchored to the sibling's position
//! and the scan restarts, which gives the usual leapfrog intersection with
//! logarithmic skips on long lists.

use crate::payload::Payload;
use crate::{DocId, Query, QueryResult, NOT_READY, NO_MORE};
use std::fmt;

/// Intersection of child queries, minus an optional excluded subquery.
///
/// Children are reordered by ascending cost at construction so the
/// cheapest one leads. An `And` with no children is exhausted on first
/// call. The exclusion subquery removes documents from the result but
/// contributes nothing to the score.
pub struct And<'a> {
    queries: Vec<Box<dyn Query + 'a>>,
    not: Option<Box<dyn Query + 'a>>,
    doc: DocId,
    boost: f32,
}

impl<'a> And<'a> {
    pub fn new(mut queries: Vec<Box<dyn Query + 'a>>) -> Self {
        queries.sort_by_key(|q| q.cost());
        And {
            queries,
            not: None,
            doc: NOT_READY,
            boost: 1.0,
        }
    }

    /// Exclude every document matched by `not` from the intersection.
    pub fn exclude(mut self, not: Box<dyn Query + 'a>) -> Self {
        self.not = Some(not);
        self
    }

    /// Position every child on `target` (or move past it), or find the
    /// next id where they all agree and the exclusion does not match.
    fn next_anded_doc(&mut self, mut target: DocId) -> QueryResult<DocId> {
        let n = self.queries.len();
        loop {
            // the driver may have been left behind by an exclusion restart
            if self.queries[0].doc_id() < target {
                target = self.queries[0].advance(target)?;
            }

            let mut i = 1;
            while i < n {
                if self.queries[i].doc_id() < target {
                    self.queries[i].advance(target)?;
                }
                let doc = self.queries[i].doc_id();
                if doc != target {
                    // sibling overshot: re-anchor the driver and rescan
                    target = self.queries[0].advance(doc)?;
                    i = 1;
                    continue;
                }
                i += 1;
            }

            if target != NO_MORE {
                if let Some(not) = self.not.as_mut() {
                    if not.doc_id() != NO_MORE {
                        if not.doc_id() < target {
                            not.advance(target)?;
                        }
                        if not.doc_id() == target {
                            // excluded: move everything past it, take the
                            // highest position as the new target
                            let mut next = target + 1;
                            for q in self.queries.iter_mut() {
                                let doc = q.advance(next)?;
                                if doc > next {
                                    next = doc;
                                }
                            }
                            target = next;
                            continue;
                        }
                    }
                }
            }

            self.doc = target;
            return Ok(target);
        }
    }
}

impl Query for And<'_> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        if self.queries.is_empty() || self.doc == NO_MORE {
            self.doc = NO_MORE;
            return Ok(NO_MORE);
        }
        let target = self.queries[0].next_doc()?;
        self.next_anded_doc(target)
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        if self.queries.is_empty() || self.doc == NO_MORE {
            self.doc = NO_MORE;
            return Ok(NO_MORE);
        }
        let target = self.queries[0].advance(target)?;
        self.next_anded_doc(target)
    }

    fn score(&self) -> f32 {
        let sum: f32 = self.queries.iter().map(|q| q.score()).sum();
        sum * self.boost
    }

    fn cost(&self) -> usize {
        // the driver dominates the work
        self.queries.first().map_or(0, |q| q.cost())
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn payload_decode(&mut self, visitor: &mut dyn Payload) {
        visitor.push();
        for q in self.queries.iter_mut() {
            q.payload_decode(visitor);
        }
        visitor.pop();
    }
}

impl fmt::Display for And<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, q) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", q)?;
        }
        if let Some(not) = &self.not {
            write!(f, " -({})", not)?;
        }
        write!(f, "}}")
    }
}
