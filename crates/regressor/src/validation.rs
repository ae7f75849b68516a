//! K-Fold Cross-Validation

use crate::forest::{ForestParams, RandomForest};
use crate::metrics::mean_absolute_error;
use crate::RegressorError;
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Per-fold and aggregate MAE scores
#[derive(Debug, Clone)]
pub struct CvScores {
    /// MAE per fold
    pub fold_mae: Vec<f64>,
    /// Mean of fold MAEs
    pub mean_mae: f64,
    /// Standard deviation of fold MAEs
    pub std_mae: f64,
}

/// Shuffled k-fold cross-validation of a forest configuration, scored by
/// MAE. Deterministic for a given seed.
pub fn cross_validate(
    params: ForestParams,
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_splits: usize,
    seed: u64,
) -> Result<CvScores, RegressorError> {
    let n_samples = x.nrows();
    if n_samples < n_splits || n_splits < 2 {
        return Err(RegressorError::ShapeMismatch {
            expected: format!("at least {} samples for {} folds", n_splits.max(2), n_splits),
            actual: format!("{} samples", n_samples),
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut fold_mae = Vec::with_capacity(n_splits);

    for fold in 0..n_splits {
        let test_idx: Vec<usize> = indices
            .iter()
            .skip(fold)
            .step_by(n_splits)
            .copied()
            .collect();
        let train_idx: Vec<usize> = indices
            .iter()
            .enumerate()
            .filter(|(pos, _)| pos % n_splits != fold)
            .map(|(_, &i)| i)
            .collect();

        let x_train = x.select(Axis(0), &train_idx);
        let y_train = Array1::from_vec(train_idx.iter().map(|&i| y[i]).collect());
        let x_test = x.select(Axis(0), &test_idx);
        let y_test = Array1::from_vec(test_idx.iter().map(|&i| y[i]).collect());

        let mut forest = RandomForest::new(params).with_seed(seed.wrapping_add(fold as u64));
        forest.fit(&x_train, &y_train)?;
        let predictions = forest.predict(&x_test)?;

        let mae = mean_absolute_error(&y_test, &predictions);
        debug!("Fold {}/{}: MAE {:.4}", fold + 1, n_splits, mae);
        fold_mae.push(mae);
    }

    let mean_mae = fold_mae.iter().sum::<f64>() / fold_mae.len() as f64;
    let variance = fold_mae
        .iter()
        .map(|m| (m - mean_mae).powi(2))
        .sum::<f64>()
        / fold_mae.len() as f64;

    Ok(CvScores {
        fold_mae,
        mean_mae,
        std_mae: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::MaxFeatures;

    fn linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                (i % 3) as f64
            }
        });
        let y = Array1::from_shape_fn(n, |i| 2.0 * i as f64);
        (x, y)
    }

    #[test]
    fn test_fold_count_and_determinism() {
        let (x, y) = linear_data(30);
        let params = ForestParams {
            n_estimators: 5,
            max_features: MaxFeatures::All,
            ..ForestParams::default()
        };

        let a = cross_validate(params, &x, &y, 5, 42).unwrap();
        let b = cross_validate(params, &x, &y, 5, 42).unwrap();

        assert_eq!(a.fold_mae.len(), 5);
        assert_eq!(a.fold_mae, b.fold_mae);
        assert!(a.mean_mae >= 0.0);
        assert!(a.std_mae >= 0.0);
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let (x, y) = linear_data(3);
        let params = ForestParams::default();
        assert!(cross_validate(params, &x, &y, 5, 42).is_err());
    }
}
