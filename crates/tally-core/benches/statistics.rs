//! Benchmarks for index build, subset selection and statistics.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tally_core::{
    compute, format, select, Datum, KeySet, RateClassifier, Row, RowColumns, RowIndex,
    StatisticKind,
};

const ROWS: usize = 10_000;

fn columns() -> RowColumns {
    let mut cols = RowColumns::values((0..ROWS).map(|i| Datum::Number((i % 97) as f64)).collect());
    cols.numerator_flag = Some((0..ROWS).map(|i| i % 3 == 0).collect());
    cols.denominator_flag = Some((0..ROWS).map(|i| i % 2 == 0).collect());
    cols
}

fn bench_index_build(c: &mut Criterion) {
    c.bench_function("index_build_10k", |b| {
        b.iter(|| RowIndex::build(black_box(columns())))
    });
}

fn bench_select_intersection(c: &mut Criterion) {
    let index = RowIndex::build(columns()).expect("valid columns");
    let filter: KeySet = (0..ROWS).step_by(2).collect();
    let selection: KeySet = (0..ROWS).step_by(3).collect();

    c.bench_function("select_intersection_10k", |b| {
        b.iter(|| select(&index, black_box(Some(&filter)), black_box(Some(&selection))).len())
    });
}

fn bench_statistics(c: &mut Criterion) {
    let index = RowIndex::build(columns()).expect("valid columns");
    let subset: Vec<&Row> = index.iter().collect();

    for kind in StatisticKind::ALL {
        c.bench_function(&format!("compute_{}_10k", kind.name()), |b| {
            b.iter(|| compute(black_box(&subset), kind, Some(&RateClassifier::Flags)))
        });
    }
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_big_mark", |b| {
        b.iter(|| format(black_box(1_234_567.891), Some(2), Some(","), Some("$"), None))
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_select_intersection,
    bench_statistics,
    bench_format,
);
criterion_main!(benches);
