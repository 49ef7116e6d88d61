use crate::class_map::ClassProbabilities;
use crate::data::FeatureVector;
use crate::errors::GainsplitError;
use crate::node::Node;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of node a prediction stopped at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Leaf,
    Node,
}

/// Class distribution at the node a feature vector reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub node_type: NodeType,
    /// Class of the leaf reached, `None` when traversal stopped at a split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub probabilities: ClassProbabilities,
    /// First class with the highest probability.
    pub most_likely: Option<String>,
}

impl Node {
    /// Follow the branches matching `features` as far as they go. Traversal
    /// stops at a split whose feature is missing from `features`, or whose
    /// value has no branch.
    pub fn route(&self, features: &FeatureVector) -> &Node {
        let mut node = self;
        while let Node::Split { feature, .. } = node {
            match features.get(feature.as_str()).and_then(|v| node.child(v)) {
                Some(child) => node = child,
                None => {
                    debug!("Stopping at split on `{}`, no branch for {:?}.", feature, features.get(feature.as_str()));
                    break;
                }
            }
        }
        node
    }

    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let node = self.route(features);
        let probabilities = node.class_counts().probabilities();
        let most_likely = probabilities.argmax().map(str::to_string);
        let (node_type, class) = match node {
            Node::Leaf { class, .. } => (NodeType::Leaf, Some(class.clone())),
            Node::Split { .. } => (NodeType::Node, None),
        };
        Prediction {
            node_type,
            class,
            probabilities,
            most_likely,
        }
    }
}

/// Predict with a tree that may not exist.
pub fn predict(root: Option<&Node>, features: &FeatureVector) -> Result<Prediction, GainsplitError> {
    root.map(|n| n.predict(features))
        .ok_or(GainsplitError::PredictionUnavailable)
}

/// Predict many feature vectors against one tree in parallel.
pub fn predict_batch(root: &Node, rows: &[FeatureVector]) -> Vec<Prediction> {
    rows.par_iter().map(|features| root.predict(features)).collect()
}
