//! Errors
//!
//! Custom error types used throughout the `gainsplit` crate.
use thiserror::Error;

/// Errors that can occur while building or using a decision tree.
#[derive(Debug, Error)]
pub enum GainsplitError {
    /// Empty input, missing class column, or inconsistent record schema.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    /// No split feature could be chosen for a node that still needed one.
    #[error("Unable to select a split feature: {0}")]
    InvalidFeatureSelection(String),
    /// No tree was supplied to predict with.
    #[error("No tree is available to predict with.")]
    PredictionUnavailable,
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to persist a table, snapshot or model.
    #[error("Unable to write {0}")]
    UnableToWrite(String),
    /// Unable to read a persisted tree or model.
    #[error("Unable to read {0}")]
    UnableToRead(String),
    /// No persisted model with the given id.
    #[error("Model {0} not found.")]
    ModelNotFound(String),
    /// Malformed CSV input.
    #[error("Unable to parse csv: {0}")]
    Csv(#[from] csv::Error),
}
