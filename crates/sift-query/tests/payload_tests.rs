//! Payload decoding through nested compositors.

use sift_query::prelude::*;

/// Sums every byte it is handed; keeps a depth counter to check the
/// push/pop pairing compositors are expected to maintain.
#[derive(Default)]
struct ByteSum {
    stack: i32,
    score: i64,
}

impl Payload for ByteSum {
    fn push(&mut self) {
        self.stack += 1;
    }

    fn pop(&mut self) {
        self.stack -= 1;
    }

    fn consume(&mut self, _doc: DocId, posting_index: usize, payload: &[u8]) {
        // one byte per document
        self.score += i64::from(payload[posting_index]);
    }

    fn score(&self) -> f32 {
        self.score as f32
    }
}

#[test]
fn test_payload_sum_through_and_or_tree() {
    let a_docs = vec![1, 2];
    let a_bytes = vec![10u8, 20];
    let b_docs = vec![3, 9];
    let b_bytes = vec![30u8, 90];
    let d_docs = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let d_bytes = vec![10u8, 20, 30, 40, 50, 60, 70, 80, 90, 100];
    let e_docs = vec![2, 4, 5, 8, 9, 10];
    let e_bytes = vec![20u8, 40, 50, 80, 90, 100];

    let left = Or::new(vec![
        Box::new(PayloadTerm::new(10, "a", &a_docs, &a_bytes)),
        Box::new(PayloadTerm::new(10, "b", &b_docs, &b_bytes)),
    ]);
    let right = And::new(vec![Box::new(Or::new(vec![
        Box::new(PayloadTerm::new(10, "d", &d_docs, &d_bytes)),
        Box::new(PayloadTerm::new(10, "e", &e_docs, &e_bytes)),
    ]))]);

    let mut q = And::new(vec![
        Box::new(left),
        Box::new(right),
    ]);

    let mut visitor = ByteSum::default();
    let mut scores = Vec::new();
    while q.next_doc().unwrap() != NO_MORE {
        q.payload_decode(&mut visitor);
        scores.push(visitor.score());
    }

    // the visitor accumulates across matches: docs 1, 2, 3, 9 contribute
    // 10+10, then 20+20+20, then 30+30, then 90+90+90
    assert_eq!(scores, vec![20.0, 80.0, 140.0, 410.0]);
    assert_eq!(visitor.stack, 0);
}

#[test]
fn test_payload_decode_skips_non_matching_or_children() {
    let a_docs = vec![1];
    let a_bytes = vec![7u8];
    let b_docs = vec![1, 2];
    let b_bytes = vec![1u8, 2];

    let mut q = Or::new(vec![
        Box::new(PayloadTerm::new(10, "a", &a_docs, &a_bytes)),
        Box::new(PayloadTerm::new(10, "b", &b_docs, &b_bytes)),
    ]);

    q.next_doc().unwrap(); // doc 1, both children
    let mut visitor = ByteSum::default();
    q.payload_decode(&mut visitor);
    assert_eq!(visitor.score(), 8.0);

    q.next_doc().unwrap(); // doc 2, only "b"
    let mut visitor = ByteSum::default();
    q.payload_decode(&mut visitor);
    assert_eq!(visitor.score(), 2.0);
}
