use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use reify::{effect::Parallel, traverse_all, Fused, Identity};
use reify_tests::expr::{naive::balanced, Literals};

fn busy(x: i64) -> i64 {
    (0..64).fold(x, |acc, i| acc.wrapping_mul(31).wrapping_add(i))
}

fn bench_batch(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traverse a batch of expressions");

    for batch in [16, 256] {
        let sources: Vec<_> = (0..batch).map(|_| balanced(8)).collect();

        group.bench_with_input(BenchmarkId::new("fused run_batch", batch), &sources, |b, sources| {
            b.iter(|| Fused::<_, Identity>::new(&Literals).run_batch(sources.clone(), busy))
        });

        group.bench_with_input(
            BenchmarkId::new("split and join, sequential", batch),
            &sources,
            |b, sources| {
                b.iter(|| traverse_all::<Identity, _, _, _, _, _, _>(&Literals, sources.clone(), &busy))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("split and join, rayon", batch),
            &sources,
            |b, sources| {
                b.iter(|| {
                    traverse_all::<Parallel<Identity>, _, _, _, _, _, _>(&Literals, sources.clone(), &busy)
                })
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(
            PProfProfiler::new(100, Output::Flamegraph(None))
        );
    targets = bench_batch
}
criterion_main!(benches);
