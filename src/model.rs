//! Model
//!
//! The immutable result of one induction run, and the run lifecycle around
//! it: training into a storage, listing finished models, and predicting
//! against a stored tree.
use crate::aggregate::Aggregate;
use crate::config::Hyperparameters;
use crate::data::{Dataset, FeatureVector};
use crate::errors::GainsplitError;
use crate::node::Node;
use crate::storage::Storage;
use crate::tree::{predict, Prediction, TreeInducer};
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// IO
pub trait ModelIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GainsplitError> {
        fs::write(path, self.json_dump()?).map_err(|e| GainsplitError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object.
    fn json_dump(&self) -> Result<String, GainsplitError> {
        serde_json::to_string(self).map_err(|e| GainsplitError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, GainsplitError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| GainsplitError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, GainsplitError> {
        let json_str = fs::read_to_string(path).map_err(|e| GainsplitError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

/// A decision tree together with what it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    pub tree: Node,
    /// Feature columns in order, without the class column.
    pub feature_names: Vec<String>,
    /// Observed values per feature, in first-seen order.
    pub feature_categories: HashMap<String, Vec<String>>,
    pub class_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub hyperparameters: Hyperparameters,
    pub total_records: usize,
}

/// Listing summary of a stored model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub feature_count: usize,
    pub class_count: usize,
    pub total_records: usize,
}

impl ModelIO for Model {}
impl ModelIO for ModelMeta {}
impl ModelIO for Hyperparameters {}

impl Model {
    pub fn meta(&self) -> ModelMeta {
        ModelMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            feature_count: self.feature_names.len(),
            class_count: self.class_categories.len(),
            total_records: self.total_records,
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        self.tree.predict(features)
    }
}

/// Name given to a model when the caller supplies none.
pub fn default_model_name(created_at: &DateTime<Utc>) -> String {
    format!("Model_{}", created_at.format("%Y-%m-%d"))
}

/// Induce a tree over `dataset` and store it as model `run_id`.
///
/// The model is only written, and so only listed, once induction has
/// succeeded. Subset tables and the snapshot of a failed run may remain in
/// the storage.
///
/// * `dataset` - Training records, last column is the class.
/// * `hyperparameters` - Stopping thresholds.
/// * `run_id` - Identifier scoping every write of this run.
/// * `name` - Display name, defaults to `Model_<date>`.
/// * `storage` - Where tables, snapshot and model go.
pub fn train(
    dataset: &Dataset,
    hyperparameters: Hyperparameters,
    run_id: &str,
    name: Option<&str>,
    storage: &dyn Storage,
) -> Result<Model, GainsplitError> {
    let aggregate = Aggregate::from_dataset(dataset)?;
    let tree = TreeInducer::new(hyperparameters, storage).induce(dataset, run_id)?;

    let created_at = Utc::now();
    let model = Model {
        id: run_id.to_string(),
        name: name.map(str::to_string).unwrap_or_else(|| default_model_name(&created_at)),
        tree,
        feature_names: aggregate.feature_names.clone(),
        class_categories: aggregate.class_categories(),
        feature_categories: aggregate.feature_categories,
        created_at,
        hyperparameters,
        total_records: aggregate.total,
    };
    storage.write_model(&model)?;
    info!(
        "Stored model {} ({}) with {} nodes.",
        model.id,
        model.name,
        model.tree.n_nodes()
    );
    Ok(model)
}

/// Finished models, newest first.
pub fn list_models(storage: &dyn Storage) -> Result<Vec<ModelMeta>, GainsplitError> {
    let mut metas = storage.list_models()?;
    metas.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    Ok(metas)
}

/// Id of the newest finished model.
pub fn latest_model_id(storage: &dyn Storage) -> Result<String, GainsplitError> {
    list_models(storage)?
        .into_iter()
        .next()
        .map(|m| m.id)
        .ok_or_else(|| GainsplitError::ModelNotFound("latest".to_string()))
}

/// Predict with a stored tree. A requested id that is not a finished model
/// falls back to the newest model. Returns the id actually used.
pub fn predict_with_model(
    storage: &dyn Storage,
    id: Option<&str>,
    features: &FeatureVector,
) -> Result<(String, Prediction), GainsplitError> {
    let metas = list_models(storage)?;
    let chosen = match id {
        Some(id) if metas.iter().any(|m| m.id == id) => id.to_string(),
        _ => metas
            .first()
            .map(|m| m.id.clone())
            .ok_or_else(|| GainsplitError::ModelNotFound(id.unwrap_or("latest").to_string()))?,
    };
    let tree = storage.read_tree(&chosen)?;
    let prediction = predict(Some(&tree), features)?;
    Ok((chosen, prediction))
}
