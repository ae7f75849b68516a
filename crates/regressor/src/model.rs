//! Trained Model Artifact

use crate::forest::{ForestParams, RandomForest};
use crate::RegressorError;
use feature_engine::{FeatureEngineer, FeatureRow, FEATURE_DIMENSION};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A fitted forest together with the feature contract it was trained
/// against. This is the artifact the serving layer loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfLifeModel {
    /// Fitted forest
    pub forest: RandomForest,
    /// Column names the forest expects, in order
    pub feature_names: Vec<String>,
    /// Hyperparameters the forest was fitted with
    pub params: ForestParams,
}

impl ShelfLifeModel {
    /// Wrap a fitted forest with the engine's feature contract
    pub fn new(forest: RandomForest) -> Self {
        let params = forest.params;
        Self {
            forest,
            feature_names: FeatureEngineer::feature_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            params,
        }
    }

    /// Predict remaining shelf life for engineered rows
    pub fn predict_rows(&self, rows: &[FeatureRow]) -> Result<Array1<f64>, RegressorError> {
        self.forest.predict(&matrix_from_rows(rows))
    }

    /// Serialize to a binary artifact file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RegressorError> {
        let bytes = postcard::to_allocvec(self)?;
        fs::write(&path, bytes)?;
        info!("Saved model to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a binary artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegressorError> {
        let bytes = fs::read(&path)?;
        let model: Self = postcard::from_bytes(&bytes)?;
        info!(
            "Loaded model ({} trees) from {}",
            model.forest.n_trees(),
            path.as_ref().display()
        );
        Ok(model)
    }
}

/// Stack engineered rows into a model input matrix
pub fn matrix_from_rows(rows: &[FeatureRow]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), FEATURE_DIMENSION));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.as_vector().into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::MaxFeatures;
    use feature_engine::ShelfRecord;

    fn engineered_rows() -> Vec<FeatureRow> {
        let mut engineer = FeatureEngineer::new();
        let records: Vec<ShelfRecord> = (0..12)
            .map(|i| {
                ShelfRecord::with_labels(
                    if i % 2 == 0 { "dairy" } else { "seafood" },
                    "refrigerator",
                    4.0 + i as f64,
                    60.0,
                    i as f64,
                )
            })
            .collect();
        engineer.transform(&records)
    }

    fn fitted_model() -> ShelfLifeModel {
        let rows = engineered_rows();
        let x = matrix_from_rows(&rows);
        let y = Array1::from_shape_fn(rows.len(), |i| 7.0 - i as f64 * 0.5);

        let mut forest = RandomForest::new(ForestParams {
            n_estimators: 10,
            max_features: MaxFeatures::All,
            ..ForestParams::default()
        })
        .with_seed(42);
        forest.fit(&x, &y).unwrap();
        ShelfLifeModel::new(forest)
    }

    #[test]
    fn test_feature_contract_recorded() {
        let model = fitted_model();
        assert_eq!(model.feature_names.len(), FEATURE_DIMENSION);
        assert_eq!(model.feature_names[0], "food_type");
        assert_eq!(model.feature_names[17], "storage_days_ratio");
    }

    #[test]
    fn test_save_load_round_trip() {
        let model = fitted_model();
        let rows = engineered_rows();
        let before = model.predict_rows(&rows).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf_life.model");
        model.save(&path).unwrap();

        let loaded = ShelfLifeModel::load(&path).unwrap();
        let after = loaded.predict_rows(&rows).unwrap();

        assert_eq!(before, after);
        assert_eq!(loaded.params, model.params);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(matches!(
            ShelfLifeModel::load("/nonexistent/shelf_life.model"),
            Err(RegressorError::Io(_))
        ));
    }

    #[test]
    fn test_matrix_shape() {
        let rows = engineered_rows();
        let matrix = matrix_from_rows(&rows);
        assert_eq!(matrix.nrows(), rows.len());
        assert_eq!(matrix.ncols(), FEATURE_DIMENSION);
    }
}
