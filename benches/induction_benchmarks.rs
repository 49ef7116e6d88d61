use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gainsplit::gain::feature_gains;
use gainsplit::{predict_batch, Aggregate, Dataset, Hyperparameters, MemoryStorage, TreeInducer};
use std::time::Duration;

mod utils;
use utils::{create_data, feature_vectors};

pub fn tree_benchmarks(c: &mut Criterion) {
    let data = create_data(10_000, 8, 5);

    c.bench_function("aggregate", |b| b.iter(|| Aggregate::from_dataset(black_box(&data)).unwrap()));

    let agg = Aggregate::from_dataset(&data).unwrap();
    c.bench_function("feature_gains", |b| b.iter(|| feature_gains(black_box(&agg)).unwrap()));

    let weather = Dataset::from_csv_path("resources/weather.csv").unwrap();
    c.bench_function("induce_weather", |b| {
        b.iter(|| {
            let storage = MemoryStorage::new();
            TreeInducer::new(Hyperparameters::default(), &storage)
                .induce(black_box(&weather), "bench")
                .unwrap()
        })
    });

    let mut induce_group = c.benchmark_group("induce");
    induce_group.measurement_time(Duration::from_secs(20));
    induce_group.sample_size(10);
    induce_group.bench_function("induce_unconstrained", |b| {
        b.iter(|| {
            let storage = MemoryStorage::new();
            TreeInducer::new(Hyperparameters::default(), &storage)
                .induce(black_box(&data), "bench")
                .unwrap()
        })
    });
    induce_group.bench_function("induce_max_depth_3", |b| {
        b.iter(|| {
            let storage = MemoryStorage::new();
            TreeInducer::new(Hyperparameters::new().set_max_depth(Some(3)), &storage)
                .induce(black_box(&data), "bench")
                .unwrap()
        })
    });
    induce_group.finish();

    let storage = MemoryStorage::new();
    let tree = TreeInducer::new(Hyperparameters::default(), &storage)
        .induce(&data, "bench")
        .unwrap();
    let vectors = feature_vectors(&data);
    c.bench_function("predict_single", |b| b.iter(|| tree.predict(black_box(&vectors[0]))));
    c.bench_function("predict_batch", |b| b.iter(|| predict_batch(black_box(&tree), black_box(&vectors))));
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
