mod induce;
mod predict;

pub use induce::TreeInducer;
pub use predict::{predict, predict_batch, NodeType, Prediction};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hyperparameters;
    use crate::data::{Dataset, FeatureVector};
    use crate::errors::GainsplitError;
    use crate::node::Node;
    use crate::storage::{MemoryStorage, StorageHint};

    fn weather() -> Dataset {
        Dataset::from_csv_path("resources/weather.csv").unwrap()
    }

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|v| v.to_string()).collect()).collect(),
        )
        .unwrap()
    }

    fn scenario() -> Dataset {
        dataset(
            &["A", "C"],
            &[&["x", "yes"], &["x", "no"], &["y", "no"], &["y", "no"]],
        )
    }

    fn features(pairs: &[(&str, &str)]) -> FeatureVector {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn induce(ds: &Dataset, hp: Hyperparameters) -> Node {
        let storage = MemoryStorage::new();
        TreeInducer::new(hp, &storage).induce(ds, "test").unwrap()
    }

    #[test]
    fn test_single_class_is_a_leaf() {
        let ds = dataset(&["A", "B", "C"], &[&["x", "p", "yes"], &["y", "q", "yes"], &["z", "p", "yes"]]);
        match induce(&ds, Hyperparameters::default()) {
            Node::Leaf {
                class,
                count,
                class_counts,
            } => {
                assert_eq!(class, "yes");
                assert_eq!(count, 3);
                assert_eq!(class_counts.len(), 1);
            }
            n => panic!("expected a leaf, got {}", n),
        }
    }

    #[test]
    fn test_scenario_tree() {
        let storage = MemoryStorage::new();
        let tree = TreeInducer::new(Hyperparameters::default(), &storage)
            .induce(&scenario(), "scenario")
            .unwrap();

        let Node::Split { feature, children, .. } = &tree else {
            panic!("expected a split, got {}", tree);
        };
        assert_eq!(feature, "A");
        assert_eq!(children.len(), 2);

        // Impure, but no feature left: labelled by its first record.
        let x = tree.child("x").unwrap();
        assert!(x.is_leaf());
        let Node::Leaf { class, class_counts, .. } = x else { unreachable!() };
        assert_eq!(class, "yes");
        assert_eq!(class_counts.count("yes"), 1);
        assert_eq!(class_counts.count("no"), 1);

        let y = tree.child("y").unwrap();
        let Node::Leaf { class, class_counts, .. } = y else { unreachable!() };
        assert_eq!(class, "no");
        assert_eq!(class_counts.len(), 1);
        assert_eq!(class_counts.count("no"), 2);

        let p = predict(Some(&tree), &features(&[("A", "y")])).unwrap();
        assert_eq!(p.node_type, NodeType::Leaf);
        assert_eq!(p.probabilities.len(), 1);
        assert_eq!(p.probabilities.get("no"), Some(&1.0));
        assert_eq!(p.most_likely.as_deref(), Some("no"));

        assert_eq!(storage.snapshot("scenario").unwrap(), tree);
        let tables = storage.tables("scenario");
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].0, StorageHint::root("scenario").child("A", "x"));
        assert_eq!(tables[0].1.headers, vec!["A", "C"]);
        assert_eq!(tables[1].1.rows, vec![vec!["y", "no"], vec!["y", "no"]]);
    }

    #[test]
    fn test_weather_tree() {
        let tree = induce(&weather(), Hyperparameters::default());
        let Node::Split { feature, children, .. } = &tree else {
            panic!("expected a split, got {}", tree);
        };
        assert_eq!(feature, "Outlook");
        let values: Vec<&str> = children.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["Sunny", "Overcast", "Rain"]);
        assert!(matches!(tree.child("Sunny"), Some(Node::Split { feature, .. }) if feature == "Humidity"));
        assert!(matches!(tree.child("Rain"), Some(Node::Split { feature, .. }) if feature == "Wind"));
        assert!(tree.child("Overcast").unwrap().is_leaf());
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 5);
        assert_eq!(tree.class_counts().count("Yes"), 9);
    }

    #[test]
    fn test_matching_path_reaches_matching_records() {
        let ds = weather();
        let tree = induce(&ds, Hyperparameters::default());
        let x = features(&[("Outlook", "Rain"), ("Wind", "Weak"), ("Temperature", "Hot")]);
        let node = tree.route(&x);
        let expected = ds
            .rows()
            .iter()
            .filter(|r| r[0] == "Rain" && r[3] == "Weak")
            .count();
        assert_eq!(node.class_counts().total(), expected);
        let p = tree.predict(&x);
        assert_eq!(p.class.as_deref(), Some("Yes"));
        assert_eq!(p.probabilities.get("Yes"), Some(&1.0));
    }

    #[test]
    fn test_unseen_value_stops_at_root() {
        let tree = induce(&weather(), Hyperparameters::default());
        let p = tree.predict(&features(&[("Outlook", "Foggy"), ("Humidity", "High")]));
        assert_eq!(p.node_type, NodeType::Node);
        assert_eq!(p.class, None);
        assert_eq!(p.probabilities.get("No"), Some(&(5.0 / 14.0)));
        assert_eq!(p.probabilities.get("Yes"), Some(&(9.0 / 14.0)));
        assert_eq!(p.most_likely.as_deref(), Some("Yes"));
    }

    #[test]
    fn test_missing_key_stops_at_split() {
        let tree = induce(&weather(), Hyperparameters::default());
        let p = tree.predict(&features(&[("Outlook", "Sunny")]));
        assert_eq!(p.node_type, NodeType::Node);
        assert_eq!(p.probabilities.get("No"), Some(&0.6));
        assert_eq!(p.probabilities.get("Yes"), Some(&0.4));
        assert_eq!(p.most_likely.as_deref(), Some("No"));
    }

    #[test]
    fn test_serialized_tree_predicts_the_same() {
        let tree = induce(&weather(), Hyperparameters::default());
        let json = serde_json::to_string(&tree).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        let vectors = vec![
            features(&[("Outlook", "Sunny"), ("Humidity", "High")]),
            features(&[("Outlook", "Rain"), ("Wind", "Strong")]),
            features(&[("Outlook", "Overcast")]),
            features(&[("Outlook", "Snow")]),
            features(&[]),
        ];
        for x in &vectors {
            assert_eq!(tree.predict(x), back.predict(x));
        }
        assert_eq!(predict_batch(&back, &vectors), vectors.iter().map(|x| tree.predict(x)).collect::<Vec<_>>());
    }

    #[test]
    fn test_max_depth_and_min_samples_split() {
        let by_depth = induce(&weather(), Hyperparameters::new().set_max_depth(Some(1)));
        let by_samples = induce(&weather(), Hyperparameters::new().set_min_samples_split(Some(6)));
        assert_eq!(by_depth, by_samples);
        assert_eq!(by_depth.depth(), 1);

        let Some(Node::Leaf { class, count, class_counts }) = by_depth.child("Rain") else {
            panic!("expected a leaf for Rain");
        };
        assert_eq!(class, "Yes");
        assert_eq!(*count, 5);
        assert_eq!(class_counts.classes().collect::<Vec<_>>(), vec!["Yes", "No"]);

        let Some(Node::Leaf { class, .. }) = by_depth.child("Sunny") else {
            panic!("expected a leaf for Sunny");
        };
        assert_eq!(class, "No");
    }

    #[test]
    fn test_min_gain_stops_at_root() {
        let tree = induce(&weather(), Hyperparameters::new().set_min_gain(Some(0.5)));
        let Node::Leaf { class, count, .. } = &tree else {
            panic!("expected a leaf, got {}", tree);
        };
        assert_eq!(class, "No");
        assert_eq!(*count, 14);

        let tree = induce(&weather(), Hyperparameters::new().set_min_gain(Some(0.2)));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_class_column_only() {
        let ds = dataset(&["C"], &[&["b"], &["a"], &["b"]]);
        let tree = induce(&ds, Hyperparameters::default());
        assert!(matches!(&tree, Node::Leaf { class, count: 3, .. } if class == "b"));
    }

    #[test]
    fn test_induce_errors() {
        let storage = MemoryStorage::new();
        let empty = dataset(&["A", "C"], &[]);
        let res = TreeInducer::new(Hyperparameters::default(), &storage).induce(&empty, "e");
        assert!(matches!(res, Err(GainsplitError::InvalidDataset(_))));

        let res = TreeInducer::new(Hyperparameters::new().set_min_gain(Some(-1.0)), &storage).induce(&scenario(), "e");
        assert!(matches!(res, Err(GainsplitError::InvalidParameter(..))));
        assert!(storage.snapshot("e").is_none());
    }

    #[test]
    fn test_predict_without_tree() {
        let res = predict(None, &features(&[("A", "x")]));
        assert!(matches!(res, Err(GainsplitError::PredictionUnavailable)));
    }
}
