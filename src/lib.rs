//! Categorical decision trees induced greedily by information gain.
//!
//! A [`Dataset`] of string-valued records, whose last column is the class,
//! is grown into a [`Node`] tree by [`TreeInducer`], persisted through a
//! [`Storage`], and later traversed to produce class probabilities.

// Modules
pub mod aggregate;
pub mod class_map;
pub mod config;
pub mod data;
pub mod errors;
pub mod gain;
pub mod model;
pub mod node;
pub mod storage;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use aggregate::Aggregate;
pub use class_map::{ClassCounts, ClassProbabilities};
pub use config::Hyperparameters;
pub use data::{Dataset, FeatureVector, Record};
pub use errors::GainsplitError;
pub use model::{default_model_name, latest_model_id, list_models, predict_with_model, train, Model, ModelIO, ModelMeta};
pub use node::{Branch, Node};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageHint};
pub use tree::{predict, predict_batch, NodeType, Prediction, TreeInducer};
