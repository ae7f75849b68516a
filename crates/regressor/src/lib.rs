//! Tree-Ensemble Regression
//!
//! CART regression trees, bagged forests, a weighted voting ensemble,
//! evaluation metrics, k-fold cross-validation, grid search, and binary
//! model persistence.

mod ensemble;
mod forest;
mod metrics;
mod model;
mod search;
mod tree;
mod validation;

pub use ensemble::VotingRegressor;
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use metrics::{evaluate, mean_absolute_error, r2_score, root_mean_squared_error, Evaluation};
pub use model::{matrix_from_rows, ShelfLifeModel};
pub use search::{ForestGrid, GridSearch, SearchResult};
pub use tree::RegressionTree;
pub use validation::{cross_validate, CvScores};

use thiserror::Error;

/// Errors during training, prediction, or persistence
#[derive(Debug, Error)]
pub enum RegressorError {
    #[error("Model is not fitted")]
    NotFitted,
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("No candidates in search grid")]
    EmptyGrid,
    #[error("Model file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Model codec error: {0}")]
    Codec(#[from] postcard::Error),
}
