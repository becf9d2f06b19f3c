use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use reify::{reify, TraversalExt};
use reify_tests::expr::{naive::balanced, Literals};

fn bench_rebuild(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("relabel expression literals");

    for depth in [6, 10, 12] {
        let expr = balanced(depth);
        let reified = reify(&Literals, expr.clone());
        let replacements: Vec<i64> = reified.holes().iter().map(|x| x + 1).collect();

        group.bench_with_input(BenchmarkId::new("direct traversal", depth), &expr, |b, expr| {
            b.iter(|| Literals.over(expr.clone(), |x: i64| x + 1))
        });

        group.bench_with_input(
            BenchmarkId::new("rebuild from reified holes", depth),
            &replacements,
            |b, replacements| b.iter(|| reified.rebuild(replacements.clone())),
        );

        group.bench_with_input(BenchmarkId::new("reify then rebuild", depth), &expr, |b, expr| {
            b.iter(|| {
                let reified = reify(&Literals, expr.clone());
                let replacements = reified.holes().iter().map(|x| x + 1).collect();
                reified.rebuild(replacements)
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(
            PProfProfiler::new(100, Output::Flamegraph(None))
        );
    targets = bench_rebuild
}
criterion_main!(benches);
