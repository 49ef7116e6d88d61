//! Gain
//!
//! Entropy and information gain over an [`Aggregate`].
use crate::aggregate::Aggregate;
use crate::class_map::ClassCounts;
use crate::errors::GainsplitError;

/// Contribution of one class value to the entropy of a set,
/// `-(p)·log2(p)` with `p = count / total`.
pub fn entropy(count: usize, total: usize) -> f64 {
    if count == 0 || total == 0 {
        return 0.0;
    }
    let p = count as f64 / total as f64;
    -p * p.log2()
}

/// Entropy of a class distribution.
pub fn total_entropy(class_counts: &ClassCounts) -> f64 {
    let total = class_counts.total();
    class_counts.iter().map(|(_, &n)| entropy(n, total)).sum()
}

/// Information gain of splitting the aggregated records on `feature`.
///
/// Categories without matching records are skipped. The result is the
/// total entropy minus the category-weighted conditional entropies, taken
/// literally and not clamped.
pub fn information_gain(agg: &Aggregate, feature: &str) -> Result<f64, GainsplitError> {
    let categories = agg
        .categories(feature)
        .ok_or_else(|| GainsplitError::InvalidDataset(format!("unknown feature `{}`", feature)))?;
    let total = agg.class_counts.total();
    let mut g = total_entropy(&agg.class_counts);
    for category in categories {
        let category_count = agg.category_count(feature, category);
        if category_count == 0 {
            continue;
        }
        let weight = category_count as f64 / total as f64;
        for class in agg.class_counts.classes() {
            let n = agg.cross_count(feature, category, class);
            g -= weight * entropy(n, category_count);
        }
    }
    Ok(g)
}

/// Gain for every feature, in feature order.
pub fn feature_gains(agg: &Aggregate) -> Result<Vec<(String, f64)>, GainsplitError> {
    agg.feature_names
        .iter()
        .map(|f| information_gain(agg, f).map(|g| (f.clone(), g)))
        .collect()
}

/// The first feature with the strictly greatest gain. Features whose gain is
/// not a number are never selected.
pub fn best_feature(gains: &[(String, f64)]) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    let mut best_gain = f64::NEG_INFINITY;
    for (f, g) in gains {
        if *g > best_gain {
            best_gain = *g;
            best = Some((f.as_str(), *g));
        }
    }
    best
}
