use crate::aggregate::Aggregate;
use crate::config::Hyperparameters;
use crate::data::Dataset;
use crate::errors::GainsplitError;
use crate::gain::{best_feature, feature_gains};
use crate::node::{Branch, Node};
use crate::storage::{Storage, StorageHint};
use log::{debug, info};

/// Grows a tree greedily by information gain, one feature per level.
pub struct TreeInducer<'a> {
    hyperparameters: Hyperparameters,
    storage: &'a dyn Storage,
}

impl<'a> TreeInducer<'a> {
    pub fn new(hyperparameters: Hyperparameters, storage: &'a dyn Storage) -> Self {
        TreeInducer {
            hyperparameters,
            storage,
        }
    }

    /// Induce a tree over `dataset`.
    ///
    /// Every split subset is written to the storage under `run_id` as it is
    /// produced. The tree snapshot is written once, after the whole tree is
    /// complete.
    ///
    /// * `dataset` - Non-empty training records, last column is the class.
    /// * `run_id` - Identifier scoping every write of this run.
    pub fn induce(&self, dataset: &Dataset, run_id: &str) -> Result<Node, GainsplitError> {
        self.hyperparameters.validate()?;
        if dataset.is_empty() {
            return Err(GainsplitError::InvalidDataset("no records to induce from".to_string()));
        }
        info!(
            "Inducing tree {} from {} records, {} features, class column `{}`.",
            run_id,
            dataset.len(),
            dataset.feature_names().len(),
            dataset.class_column()
        );

        let root = StorageHint::root(run_id);
        let tree = self.grow(dataset, 0, &root)?;
        self.storage.write_tree_snapshot(&root, &tree)?;

        info!(
            "Finished tree {}: depth {}, {} leaves, {} nodes.",
            run_id,
            tree.depth(),
            tree.n_leaves(),
            tree.n_nodes()
        );
        Ok(tree)
    }

    fn grow(&self, subset: &Dataset, depth: usize, hint: &StorageHint) -> Result<Node, GainsplitError> {
        let agg = Aggregate::from_dataset(subset)?;

        if subset.is_pure()
            || subset.feature_names().is_empty()
            || self.hyperparameters.stops_at(depth, subset.len())
        {
            return Ok(leaf(subset, agg));
        }

        let gains = feature_gains(&agg)?;
        let (feature, gain) = match best_feature(&gains) {
            Some((f, g)) => (f.to_string(), g),
            None => {
                return Err(GainsplitError::InvalidFeatureSelection(format!(
                    "none of {:?} yields a gain at {}",
                    subset.feature_names(),
                    hint
                )))
            }
        };
        if self.hyperparameters.below_min_gain(gain) {
            debug!("Stopping at {}: best gain {:.4} on `{}` is below min_gain.", hint, gain, feature);
            return Ok(leaf(subset, agg));
        }

        let column = subset.column_index(&feature).ok_or_else(|| {
            GainsplitError::InvalidFeatureSelection(format!("`{}` is not a column at {}", feature, hint))
        })?;
        let categories = agg.categories(&feature).ok_or_else(|| {
            GainsplitError::InvalidFeatureSelection(format!("`{}` was not aggregated at {}", feature, hint))
        })?;
        debug!(
            "Splitting {} records at {} on `{}` (gain {:.4}) into {} categories.",
            subset.len(),
            hint,
            feature,
            gain,
            categories.len()
        );

        let mut children = Vec::with_capacity(categories.len());
        for value in categories {
            let matching = subset.filter_eq(column, value);
            if matching.is_empty() {
                continue;
            }
            let child_hint = hint.child(&feature, value);
            // The stored subset still carries the split column.
            self.storage
                .write_table(&child_hint, matching.headers(), matching.rows())?;
            let subtree = self.grow(&matching.without_column(column), depth + 1, &child_hint)?;
            children.push(Branch {
                value: value.clone(),
                subtree,
            });
        }

        Ok(Node::Split {
            feature,
            gain,
            class_counts: agg.class_counts,
            children,
        })
    }
}

/// Leaf labelled with the class of the subset's first record.
fn leaf(subset: &Dataset, agg: Aggregate) -> Node {
    Node::Leaf {
        class: subset.class_of(0).to_string(),
        count: subset.len(),
        class_counts: agg.class_counts,
    }
}
