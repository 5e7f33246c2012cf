use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quadstore::{Object, Quad, QuadStore, Value};
use std::hint::black_box;

/// Generate `triples_per_graph` quads in each of `n_graphs` graphs.
/// Objects mix IRIs, integers and literals with and without language tags.
fn generate_quads(n_graphs: usize, triples_per_graph: usize) -> Vec<Quad> {
    let mut quads = Vec::with_capacity(n_graphs * triples_per_graph);
    for g in 0..n_graphs {
        let graph = format!("http://example.org/graph/{g}");
        for t in 0..triples_per_graph {
            let subject = if t % 5 == 0 {
                format!("_:b{g}_{t}")
            } else {
                format!("http://example.org/s/{}", t / 4)
            };
            let predicate = format!("http://example.org/p/{}", t % 20);
            let object: Object = match t % 4 {
                0 => format!("http://example.org/o/{t}").into(),
                1 => Value::Int(t as i64).into(),
                2 => Value::Literal {
                    lex: format!("typed {t}"),
                    datatype: Some("http://www.w3.org/2001/XMLSchema#string".into()),
                    lang: None,
                }
                .into(),
                _ => Value::Literal {
                    lex: format!("hello {t}"),
                    datatype: None,
                    lang: Some("en".into()),
                }
                .into(),
            };
            quads.push(Quad::new(subject, predicate, object, graph.clone()));
        }
    }
    quads
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for n in [1_000, 10_000, 100_000] {
        let quads = generate_quads(4, n / 4);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &quads, |b, quads| {
            b.iter(|| QuadStore::from_quads(quads.iter().cloned()));
        });
    }
    group.finish();
}

fn bench_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("patterns");
    let store = QuadStore::from_quads(generate_quads(4, 25_000));
    let s = "http://example.org/s/42";
    let p = "http://example.org/p/3";
    let o = "http://example.org/o/168";
    let g = "http://example.org/graph/1";
    let shapes = [
        ("spo", s, p, o),
        ("sp_", s, p, "*"),
        ("s_o", s, "*", o),
        ("s__", s, "*", "*"),
        ("_po", "*", p, o),
        ("_p_", "*", p, "*"),
        ("__o", "*", "*", o),
    ];
    for (name, s, p, o) in shapes {
        group.bench_function(BenchmarkId::new("count", name), |b| {
            b.iter(|| black_box(store.count(s, p, o, "*")))
        });
        group.bench_function(BenchmarkId::new("for_each_in_graph", name), |b| {
            b.iter(|| {
                let mut n = 0usize;
                store.for_each_with(s, p, o, g, |_| n += 1);
                black_box(n)
            })
        });
    }
    group.bench_function("find_subjects", |b| {
        b.iter(|| black_box(store.find_subjects(p, "*", "*").len()))
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    for n in [1_000, 10_000] {
        let quads = generate_quads(4, n / 4);
        let store = QuadStore::from_quads(quads.iter().cloned());
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &store, |b, store| {
            b.iter(|| {
                let mut store = store.clone();
                for g in 0..4 {
                    store.remove("*", "*", "*", &format!("http://example.org/graph/{g}"));
                }
                assert!(store.is_empty());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add, bench_patterns, bench_remove);
criterion_main!(benches);
