//! In-memory index.
//!
//! Keeps postings as `field -> term -> [doc id]` maps plus a forward array
//! of the indexed documents. Document ids are assigned in insertion order,
//! so posting lists come out sorted for free.

use crate::analyzer::{default_analyzer, Analyzer};
use crate::collector::{SearchResult, TopHits};
use crate::dsl::{self, QuerySpec};
use crate::error::IndexResult;
use sift_query::prelude::*;
use std::collections::HashMap;

/// Implement this for anything you want indexed.
///
/// Values are field name to the texts to analyze for that field; one
/// field can carry several values.
pub trait Document {
    fn indexable_fields(&self) -> HashMap<String, Vec<String>>;
}

/// In-memory inverted index with a forward document store.
///
/// Indexing takes `&mut self` and searching takes `&self`, so a live
/// cursor tree keeps the index borrowed read-only for its whole lifetime.
/// Wrap the index in a lock to share it across threads.
pub struct MemIndex<D: Document> {
    per_field: HashMap<String, Analyzer>,
    fallback: Analyzer,
    postings: HashMap<String, HashMap<String, Vec<DocId>>>,
    forward: Vec<D>,
}

impl<D: Document> MemIndex<D> {
    /// Create an index with per-field analyzers; fields without an entry
    /// use the default analyzer.
    pub fn new(per_field: HashMap<String, Analyzer>) -> Self {
        MemIndex {
            per_field,
            fallback: default_analyzer(),
            postings: HashMap::new(),
            forward: Vec::new(),
        }
    }

    /// Index documents, assigning ascending document ids.
    pub fn index(&mut self, docs: impl IntoIterator<Item = D>) {
        for doc in docs {
            let id = self.forward.len() as DocId;
            for (field, values) in doc.indexable_fields() {
                let analyzer = self
                    .per_field
                    .get(&field)
                    .unwrap_or(&self.fallback);
                for value in values {
                    for token in analyzer.analyze_index(&value) {
                        add_posting(&mut self.postings, &field, &token, id);
                    }
                }
            }
            self.forward.push(doc);
        }
    }

    /// Number of indexed documents.
    pub fn total_docs(&self) -> usize {
        self.forward.len()
    }

    /// Look up a stored document by id.
    pub fn doc(&self, id: DocId) -> Option<&D> {
        self.forward.get(id as usize)
    }

    /// Build one term cursor per token the search-time analyzer produces
    /// for `text` in `field`. Unknown fields and terms yield cursors with
    /// no postings.
    pub fn terms(&self, field: &str, text: &str) -> Vec<Box<dyn Query + '_>> {
        let analyzer = self.per_field.get(field).unwrap_or(&self.fallback);
        analyzer
            .analyze_search(text)
            .iter()
            .map(|token| self.term_query(field, token))
            .collect()
    }

    fn term_query(&self, field: &str, token: &str) -> Box<dyn Query + '_> {
        const NO_POSTINGS: &[DocId] = &[];
        let postings = self
            .postings
            .get(field)
            .and_then(|by_term| by_term.get(token))
            .map(Vec::as_slice)
            .unwrap_or(NO_POSTINGS);
        let label = format!("{}:{}", field, token);
        Box::new(Term::new(self.forward.len(), &label, postings))
    }

    /// Build a cursor tree from a DSL description, resolving terms against
    /// this index (a multi-token term becomes an `Or` over its tokens).
    pub fn parse(&self, spec: &QuerySpec) -> IndexResult<Box<dyn Query + '_>> {
        dsl::parse(spec, &mut |field: &str, value: &str| {
            let mut queries = self.terms(field, value);
            Ok(if queries.len() == 1 {
                queries.remove(0)
            } else {
                Box::new(Or::new(queries))
            })
        })
    }

    /// Drain `query`, calling `cb` with each matching id, its score, and
    /// the stored document.
    pub fn for_each<F>(&self, query: &mut dyn Query, mut cb: F) -> IndexResult<()>
    where
        F: FnMut(DocId, f32, &D),
    {
        while query.next_doc()? != NO_MORE {
            let id = query.doc_id();
            cb(id, query.score(), &self.forward[id as usize]);
        }
        Ok(())
    }

    /// Drain `query` and collect the `limit` best hits, score-descending.
    ///
    /// `rescore` can replace the relevance score per document (popularity
    /// boosts, context, ...); the original score is used when it is
    /// `None`. `total` counts every match regardless of the limit.
    pub fn top_n(
        &self,
        limit: usize,
        query: &mut dyn Query,
        rescore: Option<&dyn Fn(DocId, f32, &D) -> f32>,
    ) -> IndexResult<SearchResult<'_, D>> {
        let mut total = 0;
        let mut top = TopHits::new(limit);
        while query.next_doc()? != NO_MORE {
            total += 1;
            if limit == 0 {
                continue;
            }
            let id = query.doc_id();
            let document = &self.forward[id as usize];
            let mut score = query.score();
            if let Some(cb) = rescore {
                score = cb(id, score, document);
            }
            top.offer(score, id, document);
        }
        Ok(SearchResult {
            total,
            hits: top.into_hits(),
        })
    }
}

fn add_posting(
    postings: &mut HashMap<String, HashMap<String, Vec<DocId>>>,
    field: &str,
    term: &str,
    id: DocId,
) {
    let list = postings
        .entry(field.to_string())
        .or_default()
        .entry(term.to_string())
        .or_default();
    // a token repeated within one document lands only once
    if list.last() != Some(&id) {
        list.push(id);
    }
}
