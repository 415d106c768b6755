use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use vdf_tree::{
    dump, dump_with_options, json, parse, parse_with_options, Document, DumpOptions, ParseOptions,
};

// Roughly `sets * (per_set + 1)` nodes, two levels deep.
fn sample_document(sets: usize, per_set: usize) -> Document {
    let mut doc = Document::new();
    for s in 0..sets {
        let mut factory = doc
            .factory()
            .dir(&format!("item_{}", s))
            .pair("name", format!("Item number {}", s));
        for p in 1..per_set {
            factory = if p % 10 == 0 {
                factory.pair_with_query(&format!("key_{}", p), p as i64, "$WIN32")
            } else {
                factory.pair(&format!("key_{}", p), format!("value_{}", p))
            };
        }
    }
    doc
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for sets in [10, 100, 1_000, 5_000].iter() {
        let text = dump(&sample_document(*sets, 10)).unwrap();

        group.bench_with_input(BenchmarkId::new("default", sets), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });

        let typed = ParseOptions::new().with_types(true);
        group.bench_with_input(BenchmarkId::new("typed", sets), &text, |b, text| {
            b.iter(|| parse_with_options(black_box(text), &typed))
        });
    }

    group.finish();
}

fn benchmark_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");

    for sets in [10, 100, 1_000, 5_000].iter() {
        let doc = sample_document(*sets, 10);

        group.bench_with_input(BenchmarkId::new("auto", sets), &doc, |b, doc| {
            b.iter(|| dump(black_box(doc)))
        });

        let strict = DumpOptions::strict();
        group.bench_with_input(BenchmarkId::new("always", sets), &doc, |b, doc| {
            b.iter(|| dump_with_options(black_box(doc), &strict))
        });
    }

    group.finish();
}

fn benchmark_json(c: &mut Criterion) {
    let text = dump(&sample_document(1_000, 10)).unwrap();
    let env = HashMap::from([("$WIN32".to_string(), false)]);

    c.bench_function("json_projection", |b| {
        b.iter(|| json(black_box(&text), &env))
    });
}

fn benchmark_lookup(c: &mut Criterion) {
    let doc = sample_document(5_000, 10);
    let root = doc.root();

    c.bench_function("lookup_last_set", |b| {
        b.iter(|| doc.dir(root, black_box("ITEM_4999")))
    });

    c.bench_function("lookup_first_set", |b| {
        b.iter(|| doc.dir(root, black_box("item_0")))
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_dump,
    benchmark_json,
    benchmark_lookup
);
criterion_main!(benches);
