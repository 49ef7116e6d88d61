#![allow(dead_code)]
use gainsplit::{Dataset, FeatureVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// create_data
//
// Generates a categorical dataset whose class depends on the first
// two features plus noise.
pub(crate) fn create_data(n_samples: usize, n_features: usize, n_categories: usize) -> Dataset {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let mut headers: Vec<String> = (0..n_features).map(|j| format!("f{}", j)).collect();
    headers.push("class".to_string());

    let mut rows = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let codes: Vec<usize> = (0..n_features).map(|_| rng.gen_range(0..n_categories)).collect();
        let signal = codes.iter().take(2).sum::<usize>() % 3;
        let class = if rng.gen_bool(0.1) { rng.gen_range(0..3) } else { signal };

        let mut row: Vec<String> = codes.iter().map(|c| format!("c{}", c)).collect();
        row.push(format!("k{}", class));
        rows.push(row);
    }
    Dataset::new(headers, rows).unwrap()
}

// feature_vectors
//
// Keyed views of every record, class column excluded.
pub(crate) fn feature_vectors(data: &Dataset) -> Vec<FeatureVector> {
    (0..data.len())
        .map(|i| {
            let mut record = data.record(i);
            record.pop();
            record.into_iter().collect()
        })
        .collect()
}
