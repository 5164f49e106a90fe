//! Cursor iteration benchmarks: plain term walks, unions, and
//! intersections with asymmetric list sizes (where block skipping pays).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sift_query::prelude::*;

fn postings_list(n: usize) -> Vec<DocId> {
    (0..n as DocId).map(|i| i * 3).collect()
}

fn bench_term_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("term_next");

    for n in [1000usize, 100_000].iter() {
        let postings = postings_list(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &postings, |b, postings| {
            b.iter(|| {
                let mut sum: i64 = 0;
                let mut q = Term::new(10, "x", postings);
                while q.next_doc().unwrap() != NO_MORE {
                    sum += i64::from(q.doc_id());
                }
                black_box(sum);
            })
        });
    }

    group.finish();
}

fn bench_or(c: &mut Criterion) {
    let mut group = c.benchmark_group("or_next");

    for n in [1000usize, 10_000].iter() {
        let x = postings_list(*n);
        let y = postings_list(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut sum: i64 = 0;
                let mut q = Or::new(vec![
                    Box::new(Term::new(10, "x", x)),
                    Box::new(Term::new(10, "y", y)),
                ]);
                while q.next_doc().unwrap() != NO_MORE {
                    sum += i64::from(q.doc_id());
                }
                black_box(sum);
            })
        });
    }

    group.finish();
}

fn bench_and(c: &mut Criterion) {
    let mut group = c.benchmark_group("and_next");

    // the cheap list drives, the huge one gets asked to skip
    for (big, small) in [(1_000_000usize, 1000usize), (1_000_000, 10_000)].iter() {
        let x = postings_list(*big);
        let y = postings_list(*small);
        group.bench_with_input(
            BenchmarkId::new("asymmetric", format!("{}x{}", big, small)),
            &(x, y),
            |b, (x, y)| {
                b.iter(|| {
                    let mut sum: i64 = 0;
                    let mut q = And::new(vec![
                        Box::new(Term::new(10, "x", x)),
                        Box::new(Term::new(10, "y", y)),
                    ]);
                    while q.next_doc().unwrap() != NO_MORE {
                        sum += i64::from(q.doc_id());
                    }
                    black_box(sum);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_term_next, bench_or, bench_and);
criterion_main!(benches);
