//! Grid Search over Forest Hyperparameters

use crate::forest::{ForestParams, MaxFeatures};
use crate::validation::cross_validate;
use crate::RegressorError;
use ndarray::{Array1, Array2};
use tracing::{debug, info};

/// Hyperparameter grid for a random forest
#[derive(Debug, Clone)]
pub struct ForestGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
    pub max_features: Vec<MaxFeatures>,
}

impl Default for ForestGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![50, 100, 200],
            max_depth: vec![Some(5), Some(10), Some(15), Some(20)],
            min_samples_split: vec![2, 5, 10],
            min_samples_leaf: vec![1, 2, 4],
            max_features: vec![MaxFeatures::Sqrt],
        }
    }
}

impl ForestGrid {
    /// A small grid for quick runs and tests
    pub fn quick() -> Self {
        Self {
            n_estimators: vec![25, 50],
            max_depth: vec![Some(5), Some(10)],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1],
            max_features: vec![MaxFeatures::Sqrt],
        }
    }

    fn candidates(&self) -> Vec<ForestParams> {
        let mut params = Vec::new();
        for &n_estimators in &self.n_estimators {
            for &max_depth in &self.max_depth {
                for &min_samples_split in &self.min_samples_split {
                    for &min_samples_leaf in &self.min_samples_leaf {
                        for &max_features in &self.max_features {
                            params.push(ForestParams {
                                n_estimators,
                                max_depth,
                                min_samples_split,
                                min_samples_leaf,
                                max_features,
                                bootstrap: true,
                            });
                        }
                    }
                }
            }
        }
        params
    }
}

/// Outcome of a grid search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best-scoring configuration
    pub best_params: ForestParams,
    /// Cross-validated MAE of the best configuration
    pub best_mae: f64,
    /// Number of configurations evaluated
    pub n_candidates: usize,
}

/// Exhaustive grid search scored by k-fold cross-validated MAE
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: ForestGrid,
    cv_splits: usize,
    seed: u64,
}

impl GridSearch {
    /// Create a search over the given grid
    pub fn new(grid: ForestGrid) -> Self {
        Self {
            grid,
            cv_splits: 5,
            seed: 42,
        }
    }

    /// Set the number of CV folds
    pub fn with_cv_splits(mut self, n_splits: usize) -> Self {
        self.cv_splits = n_splits.max(2);
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Evaluate every candidate and return the best by mean MAE
    pub fn run(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<SearchResult, RegressorError> {
        let candidates = self.grid.candidates();
        if candidates.is_empty() {
            return Err(RegressorError::EmptyGrid);
        }

        info!(
            "Grid search: {} candidates, {}-fold CV",
            candidates.len(),
            self.cv_splits
        );

        let mut best: Option<(ForestParams, f64)> = None;
        for (idx, params) in candidates.iter().enumerate() {
            let scores = cross_validate(*params, x, y, self.cv_splits, self.seed)?;
            debug!(
                "Candidate {}/{}: MAE {:.4} ± {:.4} ({:?})",
                idx + 1,
                candidates.len(),
                scores.mean_mae,
                scores.std_mae,
                params
            );

            if best.as_ref().map_or(true, |(_, mae)| scores.mean_mae < *mae) {
                best = Some((*params, scores.mean_mae));
            }
        }

        let (best_params, best_mae) = best.ok_or(RegressorError::EmptyGrid)?;
        info!("Best candidate: MAE {:.4} ({:?})", best_mae, best_params);

        Ok(SearchResult {
            best_params,
            best_mae,
            n_candidates: candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_count() {
        let grid = ForestGrid::default();
        assert_eq!(grid.candidates().len(), 3 * 4 * 3 * 3);
    }

    #[test]
    fn test_search_picks_a_candidate() {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| (i * (j + 1)) as f64);
        let y = Array1::from_shape_fn(40, |i| (i / 10) as f64 * 5.0);

        let grid = ForestGrid {
            n_estimators: vec![5, 10],
            max_depth: vec![Some(3)],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1],
            max_features: vec![MaxFeatures::All],
        };

        let result = GridSearch::new(grid)
            .with_cv_splits(4)
            .with_seed(42)
            .run(&x, &y)
            .unwrap();

        assert_eq!(result.n_candidates, 2);
        assert!(result.best_mae >= 0.0);
        assert!([5, 10].contains(&result.best_params.n_estimators));
    }

    #[test]
    fn test_empty_grid_is_an_error() {
        let grid = ForestGrid {
            n_estimators: vec![],
            max_depth: vec![],
            min_samples_split: vec![],
            min_samples_leaf: vec![],
            max_features: vec![],
        };
        let x = Array2::zeros((10, 2));
        let y = Array1::zeros(10);
        assert!(matches!(
            GridSearch::new(grid).run(&x, &y),
            Err(RegressorError::EmptyGrid)
        ));
    }
}
