//! Boolean and scored query evaluation over sorted posting lists.
//!
//! This crate evaluates query trees over an inverted index whose posting
//! lists are strictly increasing sequences of 32-bit document ids. Leaves
//! iterate posting lists (in memory or from disk); compositors combine
//! child cursors into intersections, unions, exclusions, and
//! disjunction-max scoring. Matches are emitted in ascending document id
//! order, one pass, with a relevance score per match.
//!
//! # The cursor contract
//!
//! Every query implements [`Query`]: it reports a current document id
//! ([`NOT_READY`] before the first positioning call, [`NO_MORE`] once
//! exhausted), advances with [`Query::next_doc`], and skips forward with
//! [`Query::advance`]. Compositors drive their children exclusively
//! through this contract, so arbitrary nesting works: an `And` of `Or`s of
//! `AndNot`s of terms is evaluated without materializing any intermediate
//! id set.
//!
//! # Quick Start
//!
//! ```rust
//! use sift_query::prelude::*;
//!
//! let a = Term::new(10, "a", &[1, 2, 3, 9]);
//! let b = Term::new(10, "b", &[2, 3, 4]);
//!
//! let mut q = And::new(vec![Box::new(a), Box::new(b)]);
//! while q.next_doc()? != NO_MORE {
//!     println!("doc {} score {}", q.doc_id(), q.score());
//! }
//! # Ok::<(), sift_query::QueryError>(())
//! ```
//!
//! # Design
//!
//! - Queries are single use. Once a cursor tree is exhausted it cannot be
//!   rewound; rebuild the tree to run the query again.
//! - A single tree is not thread safe. Independent trees over the same
//!   posting lists can run concurrently.
//! - Posting lists are treated as read-only; in-memory leaves borrow them
//!   and own only their derived skip-block index.
//! - Scores compose: leaves score `idf * boost`, `And`/`Or` sum their
//!   matching children, [`dismax::DisMax`] takes max plus a tie-breaker
//!   fraction of the rest, [`constant::Constant`] pins the score of any
//!   subtree.

use std::fmt;

/// Intersection (with optional exclusion subquery).
pub mod and;

/// Score-pinning wrapper.
pub mod constant;

/// Union with max-plus-tie-breaker scoring.
pub mod dismax;

/// Error types for cursor operations.
pub mod error;

/// Cursor over a posting list stored in a file.
pub mod file_term;

/// Per-document payload decoding.
pub mod payload;

/// Union.
pub mod or;

/// In-memory term cursor with skip blocks.
pub mod term;

/// Term cursor with bit-packed term frequencies.
pub mod term_tf;

pub use error::{QueryError, QueryResult};

/// A document identifier. Valid ids are in `[0, i32::MAX - 1]`; the two
/// remaining values are the [`NOT_READY`] and [`NO_MORE`] sentinels.
pub type DocId = i32;

/// Sentinel id reported by a cursor before its first positioning call.
pub const NOT_READY: DocId = -1;

/// Sentinel id reported by an exhausted cursor. Absorbing: once a cursor
/// returns `NO_MORE` every subsequent call returns `NO_MORE`.
pub const NO_MORE: DocId = i32::MAX;

/// Inverse document frequency: `ln(1 + N/d)` for `N` total documents and a
/// posting list of length `d`, or 0 for an empty posting list.
///
/// Strictly decreasing in `d` for fixed `N`, never negative. Computed once
/// at leaf construction and cached.
pub fn idf(total_docs: usize, num_postings: usize) -> f32 {
    if num_postings == 0 {
        return 0.0;
    }
    (1.0 + total_docs as f32 / num_postings as f32).ln()
}

/// The uniform cursor contract shared by every query.
///
/// A cursor walks a monotone sequence of document ids: `doc_id` only moves
/// forward (from [`NOT_READY`] to real ids to [`NO_MORE`]), and both
/// [`next_doc`](Query::next_doc) and [`advance`](Query::advance) return the
/// id they landed on.
pub trait Query: fmt::Display {
    /// The current document id. [`NOT_READY`] before the first call to
    /// `next_doc`/`advance`, [`NO_MORE`] once exhausted. Pure observation.
    fn doc_id(&self) -> DocId;

    /// Advance to the next matching document and return its id, or
    /// [`NO_MORE`] if none remains.
    fn next_doc(&mut self) -> QueryResult<DocId>;

    /// Position the cursor on the smallest matching id `>= target` and
    /// return it, or [`NO_MORE`].
    ///
    /// `target` must be `>=` the current doc id; implementations treat a
    /// smaller target as a no-op and return the current id unchanged.
    fn advance(&mut self, target: DocId) -> QueryResult<DocId>;

    /// Relevance score for the current document. Only meaningful while
    /// `doc_id` is a real id.
    fn score(&self) -> f32;

    /// Heuristic count of remaining postings under this cursor, used to
    /// pick cheap leading children for intersections.
    fn cost(&self) -> usize;

    /// Multiply future scores by `boost`. Default boost is 1.0.
    fn set_boost(&mut self, boost: f32);

    /// Decode per-document payloads into `visitor` for the current match.
    ///
    /// # Panics
    ///
    /// Panics for queries that carry no payloads ([`term::Term`],
    /// [`file_term::FileTerm`], [`term_tf::TermTF`], [`dismax::DisMax`],
    /// [`constant::Constant`]); calling it there is a caller bug.
    fn payload_decode(&mut self, _visitor: &mut dyn payload::Payload) {
        panic!("payload decoding is not supported by {}", self);
    }
}

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::and::And;
    pub use crate::constant::Constant;
    pub use crate::dismax::DisMax;
    pub use crate::file_term::{append_postings, append_postings_path, FileTerm};
    pub use crate::or::Or;
    pub use crate::payload::{Payload, PayloadTerm};
    pub use crate::term::Term;
    pub use crate::term_tf::TermTF;
    pub use crate::{idf, DocId, Query, QueryError, QueryResult, NOT_READY, NO_MORE};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_zero_for_empty_postings() {
        assert_eq!(idf(10, 0), 0.0);
    }

    #[test]
    fn test_idf_decreases_with_document_frequency() {
        let rare = idf(1000, 2);
        let common = idf(1000, 900);
        assert!(rare > common);
        assert!(common > 0.0);
    }

    #[test]
    fn test_idf_known_value() {
        // ln(1 + 10/4)
        let got = idf(10, 4);
        assert!((got - 1.2527629).abs() < 1e-6);
    }
}
