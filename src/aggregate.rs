//! Aggregate
//!
//! Single-pass tallies of a dataset: class counts, observed feature
//! categories and their counts, and the feature/category/class cross
//! tabulation information gain is computed from.
use crate::class_map::ClassCounts;
use crate::data::Dataset;
use crate::errors::GainsplitError;
use hashbrown::HashMap;

/// Counts gathered over one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Number of records counted.
    pub total: usize,
    /// Records per class value, in first-seen order.
    pub class_counts: ClassCounts,
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// Observed values per feature, in first-seen order.
    pub feature_categories: HashMap<String, Vec<String>>,
    /// Records per feature value.
    pub feature_category_counts: HashMap<String, HashMap<String, usize>>,
    /// Records per feature value and class.
    pub cross_counts: HashMap<String, HashMap<String, ClassCounts>>,
}

#[derive(Default)]
struct FeatureTally {
    categories: Vec<String>,
    counts: HashMap<String, usize>,
    cross: HashMap<String, ClassCounts>,
}

impl Aggregate {
    /// Count a non-empty dataset in one pass.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, GainsplitError> {
        if dataset.is_empty() {
            return Err(GainsplitError::InvalidDataset("no records to aggregate".to_string()));
        }
        let ci = dataset.class_index();
        let feature_names = dataset.feature_names().to_vec();
        let mut tallies: Vec<FeatureTally> = feature_names.iter().map(|_| FeatureTally::default()).collect();
        let mut class_counts = ClassCounts::new();

        for row in dataset.rows() {
            let class = &row[ci];
            class_counts.increment(class);
            for (tally, value) in tallies.iter_mut().zip(row.iter()) {
                match tally.counts.get_mut(value) {
                    Some(n) => *n += 1,
                    None => {
                        tally.categories.push(value.clone());
                        tally.counts.insert(value.clone(), 1);
                    }
                }
                tally.cross.entry(value.clone()).or_default().increment(class);
            }
        }

        let mut feature_categories = HashMap::with_capacity(feature_names.len());
        let mut feature_category_counts = HashMap::with_capacity(feature_names.len());
        let mut cross_counts = HashMap::with_capacity(feature_names.len());
        for (name, tally) in feature_names.iter().zip(tallies) {
            feature_categories.insert(name.clone(), tally.categories);
            feature_category_counts.insert(name.clone(), tally.counts);
            cross_counts.insert(name.clone(), tally.cross);
        }

        Ok(Aggregate {
            total: dataset.len(),
            class_counts,
            feature_names,
            feature_categories,
            feature_category_counts,
            cross_counts,
        })
    }

    /// Observed values of `feature`, in first-seen order.
    pub fn categories(&self, feature: &str) -> Option<&[String]> {
        self.feature_categories.get(feature).map(|c| c.as_slice())
    }

    pub fn category_count(&self, feature: &str, value: &str) -> usize {
        self.feature_category_counts
            .get(feature)
            .and_then(|c| c.get(value))
            .copied()
            .unwrap_or(0)
    }

    pub fn cross_count(&self, feature: &str, value: &str, class: &str) -> usize {
        self.cross_counts
            .get(feature)
            .and_then(|c| c.get(value))
            .map(|c| c.count(class))
            .unwrap_or(0)
    }

    /// Class values in first-seen order.
    pub fn class_categories(&self) -> Vec<String> {
        self.class_counts.classes().map(|c| c.to_string()).collect()
    }
}
