//! Search results and bounded top-N collection.

use serde::Serialize;
use sift_query::DocId;

/// One matching document with its final score.
#[derive(Debug, Serialize)]
pub struct Hit<'a, D> {
    pub score: f32,
    pub id: DocId,
    #[serde(rename = "doc")]
    pub document: &'a D,
}

/// Everything a search produced: how many documents matched in total, and
/// the top hits in descending score order.
#[derive(Debug, Serialize)]
pub struct SearchResult<'a, D> {
    pub total: usize,
    pub hits: Vec<Hit<'a, D>>,
}

/// Bounded insertion into a score-ordered buffer. With `limit` hits held,
/// an offer below the current floor is a single comparison.
pub struct TopHits<'a, D> {
    limit: usize,
    hits: Vec<Hit<'a, D>>,
}

impl<'a, D> TopHits<'a, D> {
    pub fn new(limit: usize) -> Self {
        TopHits {
            limit,
            hits: Vec::with_capacity(limit.min(1024)),
        }
    }

    /// Insert the hit if it beats the current floor (or the buffer is not
    /// full yet), keeping `hits` sorted by descending score. Equal scores
    /// keep insertion order.
    pub fn offer(&mut self, score: f32, id: DocId, document: &'a D) {
        if self.limit == 0 {
            return;
        }
        if self.hits.len() >= self.limit {
            match self.hits.last() {
                Some(last) if last.score >= score => return,
                _ => {
                    self.hits.pop();
                }
            }
        }
        let pos = self.hits.partition_point(|h| h.score >= score);
        self.hits.insert(
            pos,
            Hit {
                score,
                id,
                document,
            },
        );
    }

    pub fn into_hits(self) -> Vec<Hit<'a, D>> {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_the_best_n_in_descending_order() {
        let doc = ();
        let mut top = TopHits::new(3);
        for (score, id) in [(1.0, 1), (5.0, 2), (3.0, 3), (4.0, 4), (0.5, 5)] {
            top.offer(score, id, &doc);
        }
        let hits = top.into_hits();
        let got: Vec<(f32, DocId)> = hits.iter().map(|h| (h.score, h.id)).collect();
        assert_eq!(got, vec![(5.0, 2), (4.0, 4), (3.0, 3)]);
    }

    #[test]
    fn test_limit_zero_collects_nothing() {
        let doc = ();
        let mut top = TopHits::new(0);
        top.offer(1.0, 1, &doc);
        assert!(top.into_hits().is_empty());
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let doc = ();
        let mut top = TopHits::new(2);
        top.offer(1.0, 1, &doc);
        top.offer(1.0, 2, &doc);
        let hits = top.into_hits();
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[1].id, 2);
    }
}
