use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dbclust::cluster::{DenseDbscan, IndexedDbscan};
use dbclust::spatial::{pairwise_distances, Metric};
use ndarray::Array2;
use rand::prelude::*;

fn random_points(n: usize, d: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((d, n), |_| rng.random::<f64>() * 10.0)
}

fn bench_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_dbscan");

    let points = random_points(1000, 2, 42);
    let distances = pairwise_distances(points.view(), Metric::Euclidean);

    group.bench_function("fit_n1000_eps0.3_minpts5", |b| {
        b.iter(|| {
            let model = DenseDbscan::new(0.3, 5);
            model.fit(black_box(distances.view())).unwrap();
        })
    });

    group.finish();
}

fn bench_indexed(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_dbscan");

    let points = random_points(20_000, 3, 42);

    group.bench_function("fit_n20000_d3_r0.3", |b| {
        b.iter(|| {
            let model = IndexedDbscan::new(0.3)
                .with_min_neighbors(4)
                .with_min_cluster_size(10);
            model.fit(black_box(points.view())).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_dense, bench_indexed);
criterion_main!(benches);
