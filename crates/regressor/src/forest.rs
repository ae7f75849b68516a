//! Bagged Random Forest Regressor

use crate::tree::RegressionTree;
use crate::RegressorError;
use ndarray::{Array1, Array2};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Features considered per split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Square root of the feature count
    Sqrt,
    /// Log2 of the feature count
    Log2,
    /// Every feature
    All,
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil() as usize,
            MaxFeatures::All => n_features,
        };
        k.clamp(1, n_features)
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: Some(10),
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
        }
    }
}

/// Random forest: bootstrap-bagged regression trees with mean aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    /// Hyperparameters used for fitting
    pub params: ForestParams,
    /// RNG seed for bootstrap and feature subsampling
    pub seed: u64,
    n_features: usize,
    feature_importances: Option<Vec<f64>>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl RandomForest {
    /// Create an unfitted forest
    pub fn new(params: ForestParams) -> Self {
        Self {
            trees: Vec::new(),
            params,
            seed: 42,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit all trees, in parallel. Each tree gets its own seed derived from
    /// the forest seed so refits are reproducible.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self, RegressorError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 || n_features == 0 {
            return Err(RegressorError::EmptyTrainingSet);
        }
        if n_samples != y.len() {
            return Err(RegressorError::ShapeMismatch {
                expected: format!("{} targets", n_samples),
                actual: format!("{} targets", y.len()),
            });
        }

        self.n_features = n_features;
        let features_per_split = self.params.max_features.resolve(n_features);
        debug!(
            "Fitting forest: {} trees, {} features per split",
            self.params.n_estimators, features_per_split
        );

        let params = self.params;
        let base_seed = self.seed;

        let trees: Result<Vec<RegressionTree>, RegressorError> = (0..params.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = if params.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(ndarray::Axis(0), &sample_indices);
                let y_boot =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = RegressionTree::new()
                    .with_min_samples_split(params.min_samples_split)
                    .with_min_samples_leaf(params.min_samples_leaf);
                if let Some(depth) = params.max_depth {
                    tree = tree.with_max_depth(depth);
                }

                tree.fit_subsampled(&x_boot, &y_boot, features_per_split, &mut rng)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.feature_importances = Some(self.aggregate_importances());

        Ok(self)
    }

    fn aggregate_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (total, &val) in totals.iter_mut().zip(imp.iter()) {
                    *total += val;
                }
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for total in &mut totals {
                *total /= sum;
            }
        }
        totals
    }

    /// Predict by averaging all trees
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressorError> {
        if self.trees.is_empty() {
            return Err(RegressorError::NotFitted);
        }

        let per_tree: Result<Vec<Array1<f64>>, RegressorError> =
            self.trees.par_iter().map(|tree| tree.predict(x)).collect();
        let per_tree = per_tree?;

        let n_samples = x.nrows();
        let predictions: Vec<f64> = (0..n_samples)
            .map(|i| per_tree.iter().map(|p| p[i]).sum::<f64>() / per_tree.len() as f64)
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Mean normalized feature importances across trees
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_data() -> (Array2<f64>, Array1<f64>) {
        // target is a step in the first feature, noise-free
        let x = array![
            [1.0, 5.0],
            [2.0, 4.0],
            [3.0, 6.0],
            [4.0, 5.0],
            [10.0, 4.0],
            [11.0, 6.0],
            [12.0, 5.0],
            [13.0, 4.0],
        ];
        let y = array![2.0, 2.0, 2.0, 2.0, 8.0, 8.0, 8.0, 8.0];
        (x, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = toy_data();
        let mut forest = RandomForest::new(ForestParams {
            n_estimators: 25,
            ..ForestParams::default()
        })
        .with_seed(42);

        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);

        let predictions = forest.predict(&x).unwrap();
        for (pred, actual) in predictions.iter().zip(y.iter()) {
            assert!((pred - actual).abs() < 2.5, "pred {pred} vs {actual}");
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = toy_data();
        let params = ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        };

        let mut a = RandomForest::new(params).with_seed(7);
        let mut b = RandomForest::new(params).with_seed(7);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (x, y) = toy_data();
        let mut forest = RandomForest::new(ForestParams {
            n_estimators: 10,
            max_features: MaxFeatures::All,
            ..ForestParams::default()
        });
        forest.fit(&x, &y).unwrap();

        let importances = forest.feature_importances().unwrap();
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        // step lives in the first feature
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_unfitted_forest_fails() {
        let forest = RandomForest::default();
        assert!(matches!(
            forest.predict(&array![[1.0, 2.0]]),
            Err(RegressorError::NotFitted)
        ));
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(18), 5);
        assert_eq!(MaxFeatures::Log2.resolve(18), 5);
        assert_eq!(MaxFeatures::All.resolve(18), 18);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
    }
}
